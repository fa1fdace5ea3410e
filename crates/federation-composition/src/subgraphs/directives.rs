use super::*;

bitflags::bitflags! {
    /// Boolean directives, on a field or on a type definition block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub(crate) struct Markers: u16 {
        const SHAREABLE = 1;
        const EXTERNAL = 1 << 1;
        const REQUIRE_FETCH_REASONS = 1 << 2;
        const INTERFACE_OBJECT = 1 << 3;
        const INACCESSIBLE = 1 << 4;
        const AUTHENTICATED = 1 << 5;
        const EXTENDS = 1 << 6;

        /// Markers that a type definition block passes down to the fields it declares.
        const PROPAGATED = Self::SHAREABLE.bits() | Self::EXTERNAL.bits() | Self::REQUIRE_FETCH_REASONS.bits();
    }
}

impl Default for Markers {
    fn default() -> Self {
        Markers::empty()
    }
}

/// The federation-relevant directives at one location.
#[derive(Default)]
pub(crate) struct DirectiveSiteRecord {
    pub(crate) markers: Markers,
    pub(crate) r#override: Option<OverrideDirective>,
    pub(crate) provides: Option<FieldSet>,
    pub(crate) requires: Option<FieldSet>,
    /// `Some(None)` is a `@deprecated` without reason.
    pub(crate) deprecated: Option<Option<StringId>>,
    pub(crate) requires_scopes: Vec<Vec<StringId>>,
    pub(crate) tags: Vec<StringId>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct OverrideDirective {
    /// The name of the subgraph the field is taken over from.
    pub(crate) from: StringId,
}

impl DirectiveSiteRecord {
    pub(crate) fn has(&self, marker: Markers) -> bool {
        self.markers.contains(marker)
    }
}
