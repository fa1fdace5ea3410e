use super::*;
use itertools::{EitherOrBoth, Itertools};
use wrapping::{ListWrapping, Wrapping};

/// The type of a field or argument, e.g. `[String!]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FieldType {
    pub(crate) name: StringId,
    pub(crate) wrapping: Wrapping,
}

/// How two occurrences of the same field relate.
pub(crate) enum FieldTypeComparison {
    /// The named types differ: `String` and `Int`.
    DifferentNamedTypes,
    /// Same named type, but different list structures, or different nullability where the
    /// merge policy requires exact matches.
    Incompatible,
    /// The types can be merged, into this one.
    Compatible(FieldType),
}

impl FieldType {
    /// Compare two occurrences of an output field type. The merged type is the least required.
    pub(crate) fn compose_for_output(self, other: FieldType, exact: bool) -> FieldTypeComparison {
        self.compose(other, exact, |a, b| a && b)
    }

    /// Compare two occurrences of an argument or input field type. The merged type is the most
    /// required.
    pub(crate) fn compose_for_input(self, other: FieldType, exact: bool) -> FieldTypeComparison {
        self.compose(other, exact, |a, b| a || b)
    }

    /// `required` decides whether a level of the merged type is required, from whether it is
    /// required in each of the two types.
    fn compose(self, other: FieldType, exact: bool, required: fn(bool, bool) -> bool) -> FieldTypeComparison {
        if self.name != other.name {
            return FieldTypeComparison::DifferentNamedTypes;
        }

        if self.wrapping == other.wrapping {
            return FieldTypeComparison::Compatible(self);
        }

        if exact {
            return FieldTypeComparison::Incompatible;
        }

        let mut wrapping = if required(self.wrapping.inner_is_required(), other.wrapping.inner_is_required()) {
            Wrapping::default().non_null()
        } else {
            Wrapping::default()
        };

        // From the innermost list to the outermost.
        for pair in self
            .wrapping
            .list_wrappings()
            .zip_longest(other.wrapping.list_wrappings())
        {
            let EitherOrBoth::Both(ours, theirs) = pair else {
                return FieldTypeComparison::Incompatible;
            };

            wrapping = if required(
                matches!(ours, ListWrapping::ListNonNull),
                matches!(theirs, ListWrapping::ListNonNull),
            ) {
                wrapping.list_non_null()
            } else {
                wrapping.list()
            };
        }

        FieldTypeComparison::Compatible(FieldType {
            name: self.name,
            wrapping,
        })
    }
}

impl Subgraphs {
    pub(crate) fn display_field_type(&self, field_type: FieldType) -> String {
        field_type.wrapping.type_display(&self[field_type.name]).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_type(subgraphs: &mut Subgraphs, wrapping: Wrapping) -> FieldType {
        FieldType {
            name: subgraphs.strings.intern("Int"),
            wrapping,
        }
    }

    fn merged(subgraphs: &Subgraphs, comparison: FieldTypeComparison) -> Option<String> {
        match comparison {
            FieldTypeComparison::Compatible(field_type) => Some(subgraphs.display_field_type(field_type)),
            _ => None,
        }
    }

    #[test]
    fn outputs_take_the_least_required_layer_and_inputs_the_most() {
        let mut subgraphs = Subgraphs::default();
        let required = field_type(&mut subgraphs, Wrapping::default().non_null().list_non_null());
        let nullable_inner = field_type(&mut subgraphs, Wrapping::default().list_non_null());

        assert_eq!(
            merged(&subgraphs, required.compose_for_output(nullable_inner, false)).as_deref(),
            Some("[Int]!")
        );
        assert_eq!(
            merged(&subgraphs, required.compose_for_input(nullable_inner, false)).as_deref(),
            Some("[Int!]!")
        );
        assert_eq!(merged(&subgraphs, required.compose_for_output(nullable_inner, true)), None);
    }

    #[test]
    fn different_list_depths_do_not_merge() {
        let mut subgraphs = Subgraphs::default();
        let list = field_type(&mut subgraphs, Wrapping::default().list());
        let nested = field_type(&mut subgraphs, Wrapping::default().list().list());
        let scalar = field_type(&mut subgraphs, Wrapping::default());

        assert_eq!(merged(&subgraphs, list.compose_for_output(scalar, false)), None);
        assert_eq!(merged(&subgraphs, nested.compose_for_input(list, false)), None);
    }
}
