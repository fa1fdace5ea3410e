use super::Subgraphs;
use indexmap::IndexSet;

/// Interned strings of all subgraphs.
#[derive(Default)]
pub(crate) struct Strings {
    strings: IndexSet<Box<str>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct StringId(usize);

impl Strings {
    pub(crate) fn intern(&mut self, string: impl AsRef<str>) -> StringId {
        let string = string.as_ref();

        if let Some(idx) = self.strings.get_index_of(string) {
            return StringId(idx);
        }

        let (idx, _) = self.strings.insert_full(Box::from(string));
        StringId(idx)
    }

    pub(crate) fn lookup(&self, string: &str) -> Option<StringId> {
        self.strings.get_index_of(string).map(StringId)
    }
}

impl std::ops::Index<StringId> for Subgraphs {
    type Output = str;

    fn index(&self, index: StringId) -> &str {
        &self.strings.strings[index.0]
    }
}
