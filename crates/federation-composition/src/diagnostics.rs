use crate::{CompositionError, CompositionWarning};

/// Warnings and errors produced by composition, in the order they were found.
#[derive(Default, Debug, Clone)]
pub struct Diagnostics(Vec<Diagnostic>);

/// A composition diagnostic.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// A composition failure.
    Error(CompositionError),
    Warning(CompositionWarning),
}

impl Diagnostic {
    pub fn is_fatal(&self) -> bool {
        matches!(self, Diagnostic::Error(_))
    }

    pub fn message(&self) -> String {
        match self {
            Diagnostic::Error(error) => error.to_string(),
            Diagnostic::Warning(warning) => warning.to_string(),
        }
    }
}

impl Diagnostics {
    /// Is any of the diagnostics fatal, i.e. a hard error?
    pub fn any_fatal(&self) -> bool {
        self.0.iter().any(Diagnostic::is_fatal)
    }

    /// Is there any diagnostic warning or error
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Diagnostic> {
        self.0.iter()
    }

    /// Iterate fatal diagnostics.
    pub fn iter_errors(&self) -> impl Iterator<Item = &CompositionError> {
        self.0.iter().filter_map(|diagnostic| match diagnostic {
            Diagnostic::Error(error) => Some(error),
            Diagnostic::Warning(_) => None,
        })
    }

    /// Iterate non-fatal diagnostics.
    pub fn iter_warnings(&self) -> impl Iterator<Item = &CompositionWarning> {
        self.0.iter().filter_map(|diagnostic| match diagnostic {
            Diagnostic::Warning(warning) => Some(warning),
            Diagnostic::Error(_) => None,
        })
    }

    /// Iterate over all diagnostic messages.
    pub fn iter_messages(&self) -> impl Iterator<Item = String> + '_ {
        self.0.iter().map(Diagnostic::message)
    }

    pub(crate) fn push_fatal(&mut self, error: CompositionError) {
        self.0.push(Diagnostic::Error(error));
    }

    pub(crate) fn push_warning(&mut self, warning: CompositionWarning) {
        self.0.push(Diagnostic::Warning(warning));
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
