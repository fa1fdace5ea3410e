//! Objects and interfaces must define every field of the interfaces they implement, with a type
//! at least as specific and the same arguments.

use crate::{
    CompositionError, Diagnostics, InvalidFieldImplementation,
    federated_graph::{CompositeType, FederatedGraph, TypeDefinition},
};
use itertools::{EitherOrBoth, Itertools};
use std::fmt;
use wrapping::{ListWrapping, Wrapping};

/// A field as seen by the implementation check, whether it comes from a subgraph or from the
/// federated graph.
pub(crate) struct FieldShape<'a> {
    pub(crate) name: &'a str,
    pub(crate) r#type: TypeShape<'a>,
    pub(crate) arguments: Vec<(&'a str, TypeShape<'a>)>,
}

#[derive(Clone, Copy, PartialEq)]
pub(crate) struct TypeShape<'a> {
    pub(crate) name: &'a str,
    pub(crate) wrapping: Wrapping,
}

impl fmt::Display for TypeShape<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.wrapping.type_display(self.name), f)
    }
}

#[derive(Default)]
pub(crate) struct ImplementationErrors {
    pub(crate) missing_fields: Vec<String>,
    pub(crate) invalid_fields: Vec<InvalidFieldImplementation>,
}

/// Compare an implementation with one of its interfaces. `is_possible_type(abstract_name,
/// concrete_name)` tells whether `concrete_name` implements the interface, or is a member of
/// the union, `abstract_name`.
pub(crate) fn check_implementation(
    interface_fields: &[FieldShape<'_>],
    implementation_fields: &[FieldShape<'_>],
    is_possible_type: impl Fn(&str, &str) -> bool,
) -> Option<ImplementationErrors> {
    let mut errors = ImplementationErrors::default();

    for interface_field in interface_fields {
        let Some(field) = implementation_fields
            .iter()
            .find(|field| field.name == interface_field.name)
        else {
            errors.missing_fields.push(interface_field.name.to_owned());
            continue;
        };

        let mut invalid = InvalidFieldImplementation {
            field_name: field.name.to_owned(),
            expected_type: interface_field.r#type.to_string(),
            invalid_type: None,
            missing_arguments: Vec::new(),
            invalid_arguments: Vec::new(),
            required_additional_arguments: Vec::new(),
        };

        if !is_valid_implementation_type(interface_field.r#type, field.r#type, &is_possible_type) {
            invalid.invalid_type = Some(field.r#type.to_string());
        }

        for (argument_name, argument_type) in &interface_field.arguments {
            match field.arguments.iter().find(|(name, _)| name == argument_name) {
                None => invalid.missing_arguments.push((*argument_name).to_owned()),
                Some((_, implemented_type)) if implemented_type != argument_type => {
                    invalid.invalid_arguments.push((*argument_name).to_owned())
                }
                Some(_) => (),
            }
        }

        for (argument_name, argument_type) in &field.arguments {
            let is_additional = !interface_field
                .arguments
                .iter()
                .any(|(name, _)| name == argument_name);

            if is_additional && argument_type.wrapping.is_non_null() {
                invalid.required_additional_arguments.push((*argument_name).to_owned());
            }
        }

        let is_invalid = invalid.invalid_type.is_some()
            || !invalid.missing_arguments.is_empty()
            || !invalid.invalid_arguments.is_empty()
            || !invalid.required_additional_arguments.is_empty();

        if is_invalid {
            errors.invalid_fields.push(invalid);
        }
    }

    if errors.missing_fields.is_empty() && errors.invalid_fields.is_empty() {
        None
    } else {
        Some(errors)
    }
}

/// The implementation may make any level required, but not the other way around. The list
/// structure must be the same.
fn is_valid_implementation_type(
    expected: TypeShape<'_>,
    found: TypeShape<'_>,
    is_possible_type: &impl Fn(&str, &str) -> bool,
) -> bool {
    if expected.name != found.name && !is_possible_type(expected.name, found.name) {
        return false;
    }

    if expected.wrapping.inner_is_required() && !found.wrapping.inner_is_required() {
        return false;
    }

    expected
        .wrapping
        .list_wrappings()
        .zip_longest(found.wrapping.list_wrappings())
        .all(|pair| match pair {
            EitherOrBoth::Both(ListWrapping::ListNonNull, ListWrapping::List) => false,
            EitherOrBoth::Both(_, _) => true,
            EitherOrBoth::Left(_) | EitherOrBoth::Right(_) => false,
        })
}

/// Check the implementations in the federated graph. Fields from different subgraphs only meet
/// here.
pub(crate) fn validate_federated_graph(graph: &FederatedGraph, diagnostics: &mut Diagnostics) {
    for definition in &graph.type_definitions {
        let (TypeDefinition::Object(composite) | TypeDefinition::Interface(composite)) = definition else {
            continue;
        };

        let fields = composite_field_shapes(composite);

        for interface_name in &composite.implements_interfaces {
            let Some(TypeDefinition::Interface(interface)) = graph.definition(interface_name) else {
                continue;
            };

            let errors = check_implementation(
                &composite_field_shapes(interface),
                &fields,
                |abstract_name, concrete_name| is_possible_type(graph, abstract_name, concrete_name),
            );

            if let Some(errors) = errors {
                diagnostics.push_fatal(CompositionError::InvalidInterfaceImplementation {
                    type_name: composite.name.clone(),
                    interface_name: interface_name.clone(),
                    missing_fields: errors.missing_fields,
                    invalid_fields: errors.invalid_fields,
                });
            }
        }
    }
}

fn composite_field_shapes(composite: &CompositeType) -> Vec<FieldShape<'_>> {
    composite
        .fields
        .iter()
        .map(|field| FieldShape {
            name: &field.name,
            r#type: TypeShape {
                name: &field.r#type.name,
                wrapping: field.r#type.wrapping,
            },
            arguments: field
                .arguments
                .iter()
                .map(|argument| {
                    let r#type = TypeShape {
                        name: &argument.r#type.name,
                        wrapping: argument.r#type.wrapping,
                    };

                    (argument.name.as_str(), r#type)
                })
                .collect(),
        })
        .collect()
}

fn is_possible_type(graph: &FederatedGraph, abstract_name: &str, concrete_name: &str) -> bool {
    match graph.definition(abstract_name) {
        Some(TypeDefinition::Union(union)) => union.members.iter().any(|member| member == concrete_name),
        Some(TypeDefinition::Interface(_)) => graph
            .composite_type(concrete_name)
            .is_some_and(|concrete| concrete.implements_interfaces.iter().any(|name| name == abstract_name)),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape<'a>(name: &'a str, type_name: &'a str, wrapping: Wrapping) -> FieldShape<'a> {
        FieldShape {
            name,
            r#type: TypeShape {
                name: type_name,
                wrapping,
            },
            arguments: Vec::new(),
        }
    }

    fn no_possible_types(_: &str, _: &str) -> bool {
        false
    }

    #[test]
    fn implementations_may_be_more_required() {
        let interface = [shape("tags", "String", Wrapping::default().list())];
        let implementation = [shape("tags", "String", Wrapping::default().non_null().list_non_null())];

        assert!(check_implementation(&interface, &implementation, no_possible_types).is_none());
        assert!(check_implementation(&implementation, &interface, no_possible_types).is_some());
    }

    #[test]
    fn list_structure_must_match() {
        let interface = [shape("tags", "String", Wrapping::default().list())];
        let implementation = [shape("tags", "String", Wrapping::default().non_null())];

        let errors = check_implementation(&interface, &implementation, no_possible_types).unwrap();

        assert!(errors.missing_fields.is_empty());
        assert_eq!(errors.invalid_fields[0].invalid_type.as_deref(), Some("String!"));
        assert_eq!(errors.invalid_fields[0].expected_type, "[String]");
    }

    #[test]
    fn named_types_may_be_possible_types() {
        let interface = [shape("node", "Node", Wrapping::default())];
        let implementation = [shape("node", "User", Wrapping::default())];

        let possible = |abstract_name: &str, concrete_name: &str| abstract_name == "Node" && concrete_name == "User";

        assert!(check_implementation(&interface, &implementation, possible).is_none());
        assert!(check_implementation(&interface, &implementation, no_possible_types).is_some());
    }

    #[test]
    fn arguments_are_checked() {
        let int = TypeShape {
            name: "Int",
            wrapping: Wrapping::default(),
        };
        let required_int = TypeShape {
            name: "Int",
            wrapping: Wrapping::default().non_null(),
        };

        let mut interface = shape("items", "String", Wrapping::default());
        interface.arguments = vec![("first", int), ("after", int)];

        let mut implementation = shape("items", "String", Wrapping::default());
        implementation.arguments = vec![("first", required_int), ("filter", required_int)];

        let errors = check_implementation(&[interface], &[implementation], no_possible_types).unwrap();
        let invalid = &errors.invalid_fields[0];

        assert_eq!(invalid.invalid_type, None);
        assert_eq!(invalid.missing_arguments, ["after"]);
        assert_eq!(invalid.invalid_arguments, ["first"]);
        assert_eq!(invalid.required_additional_arguments, ["filter"]);
    }
}
