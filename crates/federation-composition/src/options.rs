/// Settings for [`compose_with_options()`](crate::compose_with_options()).
#[derive(Clone, Debug, Default, PartialEq, serde::Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CompositionOptions {
    /// How the types of a field defined in multiple subgraphs are merged.
    pub field_type_merge: FieldTypeMergePolicy,
    /// Fail composition when any warning is emitted.
    pub warnings_are_fatal: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTypeMergePolicy {
    /// Named types and list depths must match. Output fields get the least required nullability
    /// at each level, arguments and input fields the most required.
    #[default]
    Nullability,
    /// The types must be identical in every subgraph.
    Exact,
}

#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("Invalid composition options: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CompositionOptions {
    /// Read options from a TOML document. Missing keys take their default value.
    ///
    /// ```toml
    /// field_type_merge = "exact"
    /// warnings_are_fatal = true
    /// ```
    pub fn from_toml(input: &str) -> Result<Self, OptionsError> {
        Ok(toml::from_str(input)?)
    }

    pub(crate) fn exact_field_types(&self) -> bool {
        self.field_type_merge == FieldTypeMergePolicy::Exact
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let options = CompositionOptions::from_toml("").unwrap();

        assert_eq!(options, CompositionOptions::default());
        assert_eq!(options.field_type_merge, FieldTypeMergePolicy::Nullability);
        assert!(!options.warnings_are_fatal);
    }

    #[test]
    fn all_options() {
        let options = CompositionOptions::from_toml(
            r#"
            field_type_merge = "exact"
            warnings_are_fatal = true
            "#,
        )
        .unwrap();

        assert_eq!(options.field_type_merge, FieldTypeMergePolicy::Exact);
        assert!(options.warnings_are_fatal);
        assert!(options.exact_field_types());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let error = CompositionOptions::from_toml("strict = true").unwrap_err();

        assert!(error.to_string().contains("unknown field `strict`"), "{error}");
    }

    #[test]
    fn unknown_policy_is_rejected() {
        assert!(CompositionOptions::from_toml(r#"field_type_merge = "loose""#).is_err());
    }
}
