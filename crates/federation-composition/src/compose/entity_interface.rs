//! Entity interfaces (interfaces with `@key`) and the `@interfaceObject` types standing for them
//! in subgraphs that do not know the implementations.

use super::{Context, directives::compose_directives, fields::compose_arguments};
use crate::{
    CompositionError, DefinitionKind, Diagnostics,
    composition_ir::FieldIr,
    subgraphs::{DefinitionId, DefinitionWalker, StringId, SubgraphId, Subgraphs},
};
use indexmap::{IndexMap, IndexSet};

/// Federation data for each entity interface, by interface name.
#[derive(Default)]
pub(crate) struct EntityInterfaces {
    by_name: IndexMap<StringId, EntityInterfaceFederationData>,
}

#[derive(Default)]
pub(crate) struct EntityInterfaceFederationData {
    /// The implementations of the interface in all subgraphs, in subgraph order.
    pub(crate) concrete_type_names: IndexSet<StringId>,
    /// Fields of the interface itself. Every implementation declares them already.
    pub(crate) interface_field_names: IndexSet<StringId>,
    pub(crate) interface_object_field_names: IndexSet<StringId>,
    pub(crate) subgraph_data: IndexMap<SubgraphId, EntityInterfaceSubgraphData>,
}

pub(crate) struct EntityInterfaceSubgraphData {
    pub(crate) definition_id: DefinitionId,
    /// The implementations this subgraph defines. Empty for an interface object.
    pub(crate) defined_concrete_type_names: IndexSet<StringId>,
    pub(crate) is_interface_object: bool,
    pub(crate) resolvable: bool,
}

impl EntityInterfaces {
    pub(crate) fn get(&self, interface_name: StringId) -> Option<&EntityInterfaceFederationData> {
        self.by_name.get(&interface_name)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (StringId, &EntityInterfaceFederationData)> {
        self.by_name.iter().map(|(name, data)| (*name, data))
    }
}

/// Collect the entity interfaces of all subgraphs, and check that each subgraph declaring an
/// entity interface with a resolvable key defines all of its implementations.
pub(crate) fn collect_entity_interfaces(subgraphs: &Subgraphs, diagnostics: &mut Diagnostics) -> EntityInterfaces {
    let mut entity_interfaces = EntityInterfaces::default();

    for definition in subgraphs.iter_definitions() {
        let is_entity_interface = definition.kind() == DefinitionKind::Interface && definition.is_entity();
        let is_interface_object = definition.is_interface_object();

        if !is_entity_interface && !is_interface_object {
            continue;
        }

        let data = entity_interfaces.by_name.entry(definition.name_id()).or_default();
        let field_names = definition.fields().map(|field| field.name_id());

        let defined_concrete_type_names = if is_interface_object {
            data.interface_object_field_names.extend(field_names);
            IndexSet::new()
        } else {
            data.interface_field_names.extend(field_names);
            let implementers: IndexSet<StringId> = local_implementers(definition).collect();
            data.concrete_type_names.extend(implementers.iter().copied());
            implementers
        };

        data.subgraph_data.insert(
            definition.subgraph().id,
            EntityInterfaceSubgraphData {
                definition_id: definition.id,
                defined_concrete_type_names,
                is_interface_object,
                resolvable: definition.has_resolvable_key(),
            },
        );
    }

    // Interface objects without any interface are reported when merging. Interface objects for
    // an interface without @key are reported here.
    entity_interfaces.by_name.retain(|name, data| {
        let has_entity_interface = data.subgraph_data.values().any(|subgraph| !subgraph.is_interface_object);

        if !has_entity_interface {
            report_non_entity_interfaces(subgraphs, *name, diagnostics);
        }

        has_entity_interface
    });

    for (interface_name, data) in &entity_interfaces.by_name {
        check_completeness(subgraphs, *interface_name, data, diagnostics);
    }

    entity_interfaces
}

fn report_non_entity_interfaces(subgraphs: &Subgraphs, name: StringId, diagnostics: &mut Diagnostics) {
    let interfaces = subgraphs
        .iter_definitions()
        .filter(|definition| definition.name_id() == name && definition.kind() == DefinitionKind::Interface);

    for interface in interfaces {
        diagnostics.push_fatal(CompositionError::InterfaceObjectForNonEntityInterface {
            type_name: interface.name().to_owned(),
            subgraph_name: interface.subgraph().name().to_owned(),
        });
    }
}

/// The objects of the subgraph implementing the interface, in declaration order.
fn local_implementers(interface: DefinitionWalker<'_>) -> impl Iterator<Item = StringId> + '_ {
    interface
        .subgraph()
        .definitions()
        .filter(move |definition| {
            definition.kind() == DefinitionKind::Object && definition.implements_interface(interface.name_id())
        })
        .map(|definition| definition.name_id())
}

fn check_completeness(
    subgraphs: &Subgraphs,
    interface_name: StringId,
    data: &EntityInterfaceFederationData,
    diagnostics: &mut Diagnostics,
) {
    let names = |ids: &mut dyn Iterator<Item = StringId>| -> Vec<String> {
        ids.map(|id| subgraphs[id].to_owned()).collect()
    };

    for (subgraph_id, subgraph_data) in &data.subgraph_data {
        let subgraph = subgraphs.walk(*subgraph_id);

        if subgraph_data.is_interface_object {
            let defined_implementations = names(&mut data.concrete_type_names.iter().copied().filter(|name| {
                subgraphs
                    .definition_by_name_id(*subgraph_id, *name)
                    .is_some_and(|definition| subgraphs.walk(definition).kind() == DefinitionKind::Object)
            }));

            if !defined_implementations.is_empty() {
                diagnostics.push_fatal(CompositionError::InvalidInterfaceObjectImplementationDefinitions {
                    interface_name: subgraphs[interface_name].to_owned(),
                    subgraph_name: subgraph.name().to_owned(),
                    type_names: defined_implementations,
                });
            }

            continue;
        }

        if !subgraph_data.resolvable {
            continue;
        }

        let missing = names(
            &mut data
                .concrete_type_names
                .difference(&subgraph_data.defined_concrete_type_names)
                .copied(),
        );

        if missing.is_empty() {
            continue;
        }

        diagnostics.push_fatal(CompositionError::UndefinedEntityInterfaceImplementations {
            interface_name: subgraphs[interface_name].to_owned(),
            subgraph_name: subgraph.name().to_owned(),
            defined_concrete_type_names: names(&mut subgraph_data.defined_concrete_type_names.iter().copied()),
            required_concrete_type_names: names(&mut data.concrete_type_names.iter().copied()),
            missing_concrete_type_names: missing,
        });
    }
}

/// Copy the fields of each interface object into every implementation of the interface that
/// lacks them. The copies resolve in the interface object's subgraph.
pub(super) fn fan_out_interface_object_fields(
    ctx: &mut Context<'_>,
    entity_interfaces: &EntityInterfaces,
    groups: &IndexMap<StringId, Vec<DefinitionWalker<'_>>>,
) {
    for (_, data) in entity_interfaces.iter() {
        for (subgraph_id, subgraph_data) in &data.subgraph_data {
            if !subgraph_data.is_interface_object {
                continue;
            }

            let interface_object = ctx.subgraphs.walk(subgraph_data.definition_id);

            for concrete_type_name in &data.concrete_type_names {
                let Some(implementations) = groups.get(concrete_type_name) else {
                    continue;
                };

                for field_name in data.interface_object_field_names.difference(&data.interface_field_names) {
                    let Some(field) = interface_object.find_field(*field_name) else {
                        continue;
                    };

                    let defined_by_implementation = implementations
                        .iter()
                        .any(|implementation| implementation.find_field(field.name_id()).is_some());

                    if defined_by_implementation {
                        continue;
                    }

                    let coordinate = format!("{}.{}", &ctx.subgraphs[*concrete_type_name], field.name());
                    let arguments = compose_arguments(ctx, &[field], &coordinate);

                    ctx.insert_interface_object_field(
                        *concrete_type_name,
                        FieldIr {
                            name: field.name_id(),
                            r#type: field.r#type(),
                            description: field.record().description,
                            arguments,
                            join_fields: vec![(*subgraph_id, field.id)],
                            directives: compose_directives(std::iter::once(field.directives())),
                        },
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(sdls: &[(&str, &str)]) -> (Subgraphs, Diagnostics, Vec<(String, Vec<String>)>) {
        let mut subgraphs = Subgraphs::default();

        for (name, sdl) in sdls {
            subgraphs.ingest_str(sdl, name, "http://example.com");
        }

        let mut diagnostics = Diagnostics::default();
        let entity_interfaces = collect_entity_interfaces(&subgraphs, &mut diagnostics);

        let concrete_types = entity_interfaces
            .iter()
            .map(|(name, data)| {
                (
                    subgraphs[name].to_owned(),
                    data.concrete_type_names
                        .iter()
                        .map(|name| subgraphs[*name].to_owned())
                        .collect(),
                )
            })
            .collect();

        (subgraphs, diagnostics, concrete_types)
    }

    #[test]
    fn concrete_type_names_accumulate_in_subgraph_order() {
        let a = r#"
            type Query { a: Node }
            interface Node @key(fields: "id") { id: ID! }
            type B implements Node @key(fields: "id") { id: ID! }
            type A implements Node @key(fields: "id") { id: ID! }
        "#;

        let b = r#"
            interface Node @key(fields: "id", resolvable: false) { id: ID! }
            type C implements Node @key(fields: "id") { id: ID! }
        "#;

        let (_, diagnostics, concrete_types) = collect(&[("a", a), ("b", b)]);

        assert_eq!(
            concrete_types,
            [("Node".to_owned(), vec!["B".to_owned(), "A".to_owned(), "C".to_owned()])]
        );

        // "a" is resolvable and misses C, "b" is exempt.
        let errors: Vec<_> = diagnostics.iter_errors().collect();
        assert_eq!(errors.len(), 1);
        assert!(matches!(
            errors[0],
            CompositionError::UndefinedEntityInterfaceImplementations { subgraph_name, missing_concrete_type_names, .. }
                if subgraph_name == "a" && missing_concrete_type_names == &["C".to_owned()]
        ));
    }

    #[test]
    fn interface_object_must_not_define_implementations() {
        let a = r#"
            type Query { a: Node }
            interface Node @key(fields: "id") { id: ID! }
            type A implements Node @key(fields: "id") { id: ID! }
        "#;

        let b = r#"
            type Node @key(fields: "id") @interfaceObject { id: ID! name: String }
            type A @key(fields: "id") { id: ID! }
        "#;

        let (_, diagnostics, _) = collect(&[("a", a), ("b", b)]);

        let errors: Vec<_> = diagnostics.iter_errors().cloned().collect();
        assert_eq!(
            errors,
            [CompositionError::InvalidInterfaceObjectImplementationDefinitions {
                interface_name: "Node".to_owned(),
                subgraph_name: "b".to_owned(),
                type_names: vec!["A".to_owned()],
            }]
        );
    }

    #[test]
    fn interface_objects_alone_are_not_entity_interfaces() {
        let a = r#"
            type Query { a: Node }
            type Node @key(fields: "id") @interfaceObject { id: ID! }
        "#;

        let (_, diagnostics, concrete_types) = collect(&[("a", a)]);

        assert!(concrete_types.is_empty());
        assert!(diagnostics.is_empty());
    }
}
