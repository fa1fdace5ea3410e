//! Checks that need the whole subgraph to be ingested.

use super::{field_sets::resolve_field_set, *};
use crate::{
    interface_implementations::{FieldShape, TypeShape, check_implementation},
    subgraphs::{DefinitionWalker, FieldId, FieldType},
};
use std::collections::BTreeSet;

const BUILTIN_SCALARS: &[&str] = &["Int", "Float", "String", "Boolean", "ID"];

pub(super) fn validate_subgraph(ctx: &mut Context<'_>) {
    let subgraph = ctx.subgraphs.walk(ctx.subgraph_id);
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    // Fields selected by a @key, @provides or @requires.
    let mut used_fields = BTreeSet::new();

    for definition in subgraph.definitions() {
        validate_type_references(definition, &mut errors);
        validate_field_sets(definition, &mut errors, &mut used_fields);
        validate_interface_object(definition, &mut errors);
        validate_interface_implementations(definition, &mut errors);
    }

    for definition in subgraph.definitions() {
        if definition.kind() != DefinitionKind::Object {
            continue;
        }

        for field in definition.fields() {
            if field.is_external() && !used_fields.contains(&field.id) {
                warnings.push(CompositionWarning::UnusedExternalField {
                    subgraph_name: subgraph.name().to_owned(),
                    coordinate: field.coordinate(),
                });
            }
        }
    }

    for error in errors {
        ctx.push_error(error);
    }

    for warning in warnings {
        ctx.subgraphs.push_ingestion_warning(warning);
    }
}

fn is_defined(definition: DefinitionWalker<'_>, type_name: &str) -> bool {
    BUILTIN_SCALARS.contains(&type_name)
        || FEDERATION_PLUMBING_TYPES.contains(&type_name)
        || definition.subgraph().definition_by_name(type_name).is_some()
}

fn validate_type_references(definition: DefinitionWalker<'_>, errors: &mut Vec<SubgraphError>) {
    let subgraphs = definition.subgraphs;

    for field in definition.fields() {
        if !is_defined(definition, field.type_name()) {
            errors.push(SubgraphError::UndefinedType {
                type_name: field.type_name().to_owned(),
                coordinate: field.coordinate(),
            });
        }

        for argument in field.arguments() {
            let type_name = &subgraphs[argument.r#type.name];

            if !is_defined(definition, type_name) {
                errors.push(SubgraphError::UndefinedType {
                    type_name: type_name.to_owned(),
                    coordinate: format!("{}({}:)", field.coordinate(), &subgraphs[argument.name]),
                });
            }
        }
    }

    for interface_name in definition.implements_interfaces() {
        let is_interface = definition
            .subgraph()
            .definition_by_name(interface_name)
            .is_some_and(|interface| interface.kind() == DefinitionKind::Interface);

        if !is_interface {
            errors.push(SubgraphError::InvalidImplementedType {
                type_name: definition.name().to_owned(),
                interface_name: interface_name.to_owned(),
            });
        }
    }

    for member in &definition.record().union_members {
        let member = &subgraphs[*member];
        let is_object = definition
            .subgraph()
            .definition_by_name(member)
            .is_some_and(|member| member.kind() == DefinitionKind::Object);

        if !is_object {
            errors.push(SubgraphError::InvalidUnionMember {
                union_name: definition.name().to_owned(),
                member: member.to_owned(),
            });
        }
    }
}

fn validate_field_sets(
    definition: DefinitionWalker<'_>,
    errors: &mut Vec<SubgraphError>,
    used_fields: &mut BTreeSet<FieldId>,
) {
    let subgraphs = definition.subgraphs;
    let mut selected = Vec::new();

    for key in definition.keys() {
        selected.clear();

        match resolve_field_set(subgraphs, definition.id, &key.view().selection_set, &mut selected) {
            Ok(()) => used_fields.extend(selected.iter().copied()),
            Err(reason) => errors.push(SubgraphError::InvalidFieldSet {
                directive: "key",
                coordinate: definition.name().to_owned(),
                reason,
            }),
        }
    }

    for field in definition.fields() {
        let directives = field.directives();

        if let Some(requires) = &directives.requires {
            selected.clear();

            match resolve_field_set(subgraphs, definition.id, requires, &mut selected) {
                Ok(()) => used_fields.extend(selected.iter().copied()),
                Err(reason) => errors.push(SubgraphError::InvalidFieldSet {
                    directive: "requires",
                    coordinate: field.coordinate(),
                    reason,
                }),
            }
        }

        if let Some(provides) = &directives.provides {
            selected.clear();

            let provided_type = definition
                .subgraph()
                .definition_by_name(field.type_name())
                .filter(|provided_type| provided_type.kind().has_output_fields());

            let result = match provided_type {
                Some(provided_type) => resolve_field_set(subgraphs, provided_type.id, provides, &mut selected),
                None => Err(format!(
                    "the field type \"{}\" is not an object or interface",
                    field.type_name()
                )),
            };

            match result {
                Ok(()) => used_fields.extend(selected.iter().copied()),
                Err(reason) => errors.push(SubgraphError::InvalidFieldSet {
                    directive: "provides",
                    coordinate: field.coordinate(),
                    reason,
                }),
            }
        }
    }
}

fn validate_interface_object(definition: DefinitionWalker<'_>, errors: &mut Vec<SubgraphError>) {
    if !definition.markers().contains(Markers::INTERFACE_OBJECT) {
        return;
    }

    let reason = if definition.kind() != DefinitionKind::Object {
        "only object types can be declared with @interfaceObject"
    } else if !definition.is_entity() {
        "an interface object must have at least one @key"
    } else {
        return;
    };

    errors.push(SubgraphError::InvalidInterfaceObject {
        type_name: definition.name().to_owned(),
        reason,
    });
}

fn validate_interface_implementations(definition: DefinitionWalker<'_>, errors: &mut Vec<SubgraphError>) {
    if !definition.kind().has_output_fields() {
        return;
    }

    let fields = field_shapes(definition);

    for interface_name in definition.implements_interfaces() {
        let Some(interface) = definition
            .subgraph()
            .definition_by_name(interface_name)
            .filter(|interface| interface.kind() == DefinitionKind::Interface)
        else {
            // Reported as an invalid implemented type.
            continue;
        };

        let errors_found = check_implementation(&field_shapes(interface), &fields, |abstract_name, concrete_name| {
            is_possible_type(definition, abstract_name, concrete_name)
        });

        if let Some(found) = errors_found {
            errors.push(SubgraphError::InvalidInterfaceImplementation {
                type_name: definition.name().to_owned(),
                interface_name: interface_name.to_owned(),
                missing_fields: found.missing_fields,
                invalid_fields: found.invalid_fields,
            });
        }
    }
}

fn field_shapes(definition: DefinitionWalker<'_>) -> Vec<FieldShape<'_>> {
    let subgraphs = definition.subgraphs;
    let shape = |field_type: FieldType| TypeShape {
        name: &subgraphs[field_type.name],
        wrapping: field_type.wrapping,
    };

    definition
        .fields()
        .map(|field| FieldShape {
            name: field.name(),
            r#type: shape(field.r#type()),
            arguments: field
                .arguments()
                .iter()
                .map(|argument| (&subgraphs[argument.name], shape(argument.r#type)))
                .collect(),
        })
        .collect()
}

fn is_possible_type(definition: DefinitionWalker<'_>, abstract_name: &str, concrete_name: &str) -> bool {
    let subgraph = definition.subgraph();
    let subgraphs = definition.subgraphs;

    let Some(abstract_type) = subgraph.definition_by_name(abstract_name) else {
        return false;
    };

    match abstract_type.kind() {
        DefinitionKind::Union => abstract_type
            .record()
            .union_members
            .iter()
            .any(|member| &subgraphs[*member] == concrete_name),
        DefinitionKind::Interface => subgraph
            .definition_by_name(concrete_name)
            .is_some_and(|concrete| concrete.implements_interfaces().any(|name| name == abstract_name)),
        _ => false,
    }
}
