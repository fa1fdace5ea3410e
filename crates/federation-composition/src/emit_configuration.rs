//! The routing configuration of each subgraph, and of the fields of the federated graph.

mod render_subgraph_sdl;

use crate::{
    DefinitionKind, Subgraphs,
    compose::{entity_interface::EntityInterfaces, overrides::Overrides},
    federated_graph::{Directive, FederatedGraph, TypeDefinition},
    propagation::marked_field_names,
    result::{ConfigurationData, FieldConfiguration, FieldSetConfiguration, KeyConfiguration, SubgraphConfig},
    subgraphs::{DefinitionWalker, Markers, SubgraphWalker},
};
use indexmap::IndexMap;

pub(crate) fn emit_subgraph_configs(
    subgraphs: &Subgraphs,
    entity_interfaces: &EntityInterfaces,
    overrides: &Overrides,
) -> IndexMap<String, SubgraphConfig> {
    subgraphs
        .iter_subgraphs()
        .map(|subgraph| {
            let config = SubgraphConfig {
                schema: render_subgraph_sdl::render_subgraph_sdl(subgraph),
                configuration_data_by_type_name: emit_configuration_data(subgraph, entity_interfaces, overrides),
            };

            (subgraph.name().to_owned(), config)
        })
        .collect()
}

fn emit_configuration_data(
    subgraph: SubgraphWalker<'_>,
    entity_interfaces: &EntityInterfaces,
    overrides: &Overrides,
) -> IndexMap<String, ConfigurationData> {
    let mut configuration_data_by_type_name = IndexMap::new();

    for definition in subgraph.definitions() {
        if !definition.kind().has_output_fields() {
            continue;
        }

        if let Some(configuration_data) = definition_configuration_data(definition, entity_interfaces, overrides) {
            configuration_data_by_type_name.insert(definition.name().to_owned(), configuration_data);
        }
    }

    fan_out_interface_object_configuration(subgraph, entity_interfaces, &mut configuration_data_by_type_name);

    configuration_data_by_type_name
}

/// `None` when every field of the definition was overridden by other subgraphs.
fn definition_configuration_data(
    definition: DefinitionWalker<'_>,
    entity_interfaces: &EntityInterfaces,
    overrides: &Overrides,
) -> Option<ConfigurationData> {
    let subgraphs = definition.subgraphs;
    let is_root_node = definition.is_root_type() || definition.is_entity();
    let mut data = ConfigurationData::new(definition.name().to_owned(), is_root_node);
    let mut any_overridden = false;

    for field in definition.fields() {
        let directives = field.directives();

        if field.is_external() {
            data.external_field_names.insert(field.name().to_owned());
        } else if overrides.is_overridden(field) {
            any_overridden = true;
        } else {
            data.field_names.insert(field.name().to_owned());
        }

        if let Some(provides) = &directives.provides {
            data.provides.push(FieldSetConfiguration {
                field_name: field.name().to_owned(),
                selection_set: subgraphs.render_field_set(provides),
            });
        }

        if let Some(requires) = &directives.requires {
            data.requires.push(FieldSetConfiguration {
                field_name: field.name().to_owned(),
                selection_set: subgraphs.render_field_set(requires),
            });
        }
    }

    if any_overridden && data.field_names.is_empty() {
        return None;
    }

    for key in definition.keys() {
        let selection_set = key.render_selection_set();

        if data.keys.iter().any(|existing| existing.selection_set == selection_set) {
            continue;
        }

        data.keys.push(KeyConfiguration {
            selection_set,
            disable_entity_resolver: !key.view().resolvable,
        });
    }

    let entity_interface = entity_interfaces.get(definition.name_id());

    if definition.is_interface_object() {
        data.is_interface_object = true;
        data.entity_interface_concrete_type_names = entity_interface.map(|entity_interface| {
            entity_interface
                .concrete_type_names
                .iter()
                .map(|name| subgraphs[*name].to_owned())
                .collect()
        });
    } else if definition.kind() == DefinitionKind::Interface {
        data.entity_interface_concrete_type_names = entity_interface
            .and_then(|entity_interface| entity_interface.subgraph_data.get(&definition.subgraph().id))
            .map(|subgraph_data| {
                subgraph_data
                    .defined_concrete_type_names
                    .iter()
                    .map(|name| subgraphs[*name].to_owned())
                    .collect()
            });
    }

    if definition.kind() == DefinitionKind::Object {
        let require_fetch_reasons = marked_field_names(definition, Markers::REQUIRE_FETCH_REASONS);

        if !require_fetch_reasons.is_empty() {
            data.require_fetch_reasons_field_names = Some(require_fetch_reasons);
        }
    }

    Some(data)
}

/// The subgraph of an interface object resolves the interface object's fields on every
/// implementation of the interface, through the interface object's keys.
fn fan_out_interface_object_configuration(
    subgraph: SubgraphWalker<'_>,
    entity_interfaces: &EntityInterfaces,
    configuration_data_by_type_name: &mut IndexMap<String, ConfigurationData>,
) {
    let subgraphs = subgraph.subgraphs;

    for (interface_name, entity_interface) in entity_interfaces.iter() {
        let is_interface_object = entity_interface
            .subgraph_data
            .get(&subgraph.id)
            .is_some_and(|subgraph_data| subgraph_data.is_interface_object);

        if !is_interface_object {
            continue;
        }

        let Some(interface_object) = configuration_data_by_type_name.get(&subgraphs[interface_name]) else {
            continue;
        };

        let field_names = interface_object.field_names.clone();
        let keys = interface_object.keys.clone();

        for concrete_type_name in &entity_interface.concrete_type_names {
            let concrete_type_name = &subgraphs[*concrete_type_name];

            if configuration_data_by_type_name.contains_key(concrete_type_name) {
                continue;
            }

            let mut data = ConfigurationData::new(concrete_type_name.to_owned(), true);
            data.field_names = field_names.clone();
            data.keys = keys.clone();

            configuration_data_by_type_name.insert(concrete_type_name.to_owned(), data);
        }
    }
}

/// The fields a router needs to know about beyond their join directives: fields with arguments,
/// and fields with authorization requirements.
pub(crate) fn emit_field_configurations(graph: &FederatedGraph) -> Vec<FieldConfiguration> {
    let mut field_configurations = Vec::new();

    for definition in &graph.type_definitions {
        let (TypeDefinition::Object(composite) | TypeDefinition::Interface(composite)) = definition else {
            continue;
        };

        for field in &composite.fields {
            let mut requires_authentication = false;
            let mut required_scopes: Vec<Vec<String>> = Vec::new();

            for directive in &field.directives {
                match directive {
                    Directive::Authenticated => requires_authentication = true,
                    Directive::RequiresScopes(scopes) => required_scopes.extend(scopes.iter().cloned()),
                    _ => (),
                }
            }

            if field.arguments.is_empty() && !requires_authentication && required_scopes.is_empty() {
                continue;
            }

            field_configurations.push(FieldConfiguration {
                type_name: composite.name.clone(),
                field_name: field.name.clone(),
                argument_names: field.arguments.iter().map(|argument| argument.name.clone()).collect(),
                requires_authentication,
                required_scopes,
            });
        }
    }

    field_configurations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Diagnostics, compose::entity_interface::collect_entity_interfaces};

    fn configuration(sdls: &[(&str, &str)]) -> IndexMap<String, SubgraphConfig> {
        let mut subgraphs = Subgraphs::default();

        for (name, sdl) in sdls {
            subgraphs.ingest_str(sdl, name, "http://example.com");
        }

        let mut diagnostics = Diagnostics::default();
        let entity_interfaces = collect_entity_interfaces(&subgraphs, &mut diagnostics);
        let overrides = Overrides::collect(&subgraphs, &mut diagnostics);
        assert!(diagnostics.is_empty(), "{:?}", diagnostics);

        emit_subgraph_configs(&subgraphs, &entity_interfaces, &overrides)
    }

    #[test]
    fn external_and_overridden_fields_are_not_resolved() {
        let a = r#"
            type Query { user: User }
            type User @key(fields: "id") @key(fields: "id") {
                id: ID!
                name: String
                email: String @external
                greeting: String @requires(fields: "email")
            }
        "#;

        let b = r#"
            type User @key(fields: "id", resolvable: false) {
                id: ID!
                name: String @override(from: "a")
            }
        "#;

        let configs = configuration(&[("a", a), ("b", b)]);

        let user_in_a = &configs["a"].configuration_data_by_type_name["User"];
        assert!(user_in_a.is_root_node);
        assert_eq!(
            user_in_a.field_names.iter().collect::<Vec<_>>(),
            ["id", "greeting"]
        );
        assert_eq!(user_in_a.external_field_names.iter().collect::<Vec<_>>(), ["email"]);
        assert_eq!(
            user_in_a.keys,
            [KeyConfiguration {
                selection_set: "id".to_owned(),
                disable_entity_resolver: false,
            }]
        );
        assert_eq!(
            user_in_a.requires,
            [FieldSetConfiguration {
                field_name: "greeting".to_owned(),
                selection_set: "email".to_owned(),
            }]
        );

        let user_in_b = &configs["b"].configuration_data_by_type_name["User"];
        assert_eq!(user_in_b.field_names.iter().collect::<Vec<_>>(), ["id", "name"]);
        assert!(user_in_b.keys[0].disable_entity_resolver);
    }

    #[test]
    fn fully_overridden_definitions_are_dropped() {
        let a = r#"
            type Query { product: Product @shareable }
            type Product @key(fields: "id") { id: ID! }
        "#;

        let b = r#"
            type Query { product: Product @shareable @override(from: "a") }
        "#;

        let configs = configuration(&[("a", a), ("b", b)]);

        assert!(!configs["a"].configuration_data_by_type_name.contains_key("Query"));
        assert!(configs["a"].configuration_data_by_type_name.contains_key("Product"));
        assert!(configs["b"].configuration_data_by_type_name["Query"].is_root_node);
    }

    #[test]
    fn require_fetch_reasons_only_on_objects() {
        let a = r#"
            type Query @openfed__requireFetchReasons { a: String }
            extend type Query { b: String }
            interface Node { id: ID! @openfed__requireFetchReasons }
        "#;

        let configs = configuration(&[("a", a)]);
        let data = &configs["a"].configuration_data_by_type_name;

        assert_eq!(data["Query"].require_fetch_reasons_field_names, Some(vec!["a".to_owned()]));
        assert_eq!(data["Node"].require_fetch_reasons_field_names, None);
        assert!(!data["Node"].is_root_node);
    }
}
