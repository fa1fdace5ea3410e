#![allow(unused_crate_dependencies)]

use federation_composition::{CompositionError, CompositionResult, Subgraphs, compose};
use pretty_assertions::assert_eq;

fn compose_sdls(sdls: &[(&str, &str)]) -> CompositionResult {
    let mut subgraphs = Subgraphs::default();

    for (name, sdl) in sdls {
        subgraphs.ingest_str(sdl, name, &format!("http://{name}.example.com"));
    }

    compose(&subgraphs)
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_owned()).collect()
}

fn entity_interface_subgraphs(resolvable: bool) -> [(&'static str, String); 2] {
    let key = if resolvable {
        r#"@key(fields: "id")"#
    } else {
        r#"@key(fields: "id", resolvable: false)"#
    };

    let e = format!(
        r#"
        type Query {{ entities: [Interface!]! }}
        interface Interface {key} {{ id: ID! }}
        type EntityOne implements Interface @key(fields: "id") {{ id: ID! }}
        type EntityTwo implements Interface @key(fields: "id") {{ id: ID! }}
        "#
    );

    let f = format!(
        r#"
        interface Interface {key} {{ id: ID! }}
        type EntityOne implements Interface @key(fields: "id") {{ id: ID! }}
        type EntityThree implements Interface @key(fields: "id") {{ id: ID! }}
        "#
    );

    [("e", e), ("f", f)]
}

#[test]
fn every_subgraph_must_define_every_implementation() {
    let [(e_name, e), (f_name, f)] = entity_interface_subgraphs(true);
    let result = compose_sdls(&[(e_name, e.as_str()), (f_name, f.as_str())]);

    let errors: Vec<CompositionError> = result.diagnostics().iter_errors().cloned().collect();

    assert_eq!(
        errors,
        [
            CompositionError::UndefinedEntityInterfaceImplementations {
                interface_name: "Interface".to_owned(),
                subgraph_name: "e".to_owned(),
                defined_concrete_type_names: owned(&["EntityOne", "EntityTwo"]),
                required_concrete_type_names: owned(&["EntityOne", "EntityTwo", "EntityThree"]),
                missing_concrete_type_names: owned(&["EntityThree"]),
            },
            CompositionError::UndefinedEntityInterfaceImplementations {
                interface_name: "Interface".to_owned(),
                subgraph_name: "f".to_owned(),
                defined_concrete_type_names: owned(&["EntityOne", "EntityThree"]),
                required_concrete_type_names: owned(&["EntityOne", "EntityTwo", "EntityThree"]),
                missing_concrete_type_names: owned(&["EntityTwo"]),
            },
        ]
    );

    assert!(errors[0].to_string().contains("The entity interface \"Interface\""));
}

#[test]
fn unresolvable_entity_interfaces_are_exempt() {
    let [(e_name, e), (f_name, f)] = entity_interface_subgraphs(false);
    let federation = compose_sdls(&[(e_name, e.as_str()), (f_name, f.as_str())]).into_result().unwrap();

    assert!(federation.warnings.is_empty());

    let interface_in_e = &federation.subgraph_configs["e"].configuration_data_by_type_name["Interface"];
    assert_eq!(
        interface_in_e
            .entity_interface_concrete_type_names
            .as_ref()
            .map(|names| names.iter().map(String::as_str).collect::<Vec<_>>()),
        Some(vec!["EntityOne", "EntityTwo"])
    );
    assert!(interface_in_e.keys[0].disable_entity_resolver);
}

#[test]
fn complete_entity_interfaces_compose() {
    let g = r#"
        type Query { entities: [Interface!]! }
        interface Interface @key(fields: "id") { id: ID! name: String }
        type EntityOne implements Interface @key(fields: "id") { id: ID! name: String @shareable }
        type EntityTwo implements Interface @key(fields: "id") { id: ID! name: String @shareable }
    "#;

    let h = r#"
        interface Interface @key(fields: "id") { id: ID! age: Int }
        type EntityOne implements Interface @key(fields: "id") { id: ID! name: String @shareable age: Int }
        type EntityTwo implements Interface @key(fields: "id") { id: ID! age: Int }
    "#;

    let federation = compose_sdls(&[("g", g), ("h", h)]).into_result().unwrap();
    let graph = &federation.federated_graph;

    assert!(federation.warnings.is_empty());

    let interface = graph.composite_type("Interface").unwrap();
    let fields: Vec<&str> = interface.fields.iter().map(|field| field.name.as_str()).collect();
    assert_eq!(fields, ["id", "name", "age"]);

    let entity_one = graph.composite_type("EntityOne").unwrap();
    assert_eq!(entity_one.implements_interfaces, ["Interface"]);
    assert_eq!(entity_one.join_implements.len(), 2);
}

const ANIMALS: &str = r#"
    type Query { animals: [Animal!]! }

    interface Animal @key(fields: "id") {
        id: ID!
    }

    type Dog implements Animal @key(fields: "id") {
        id: ID!
        barks: Boolean!
    }

    type Cat implements Animal @key(fields: "id") {
        id: ID!
        meows: Boolean!
    }
"#;

const ANIMAL_DETAILS: &str = r#"
    type Animal @key(fields: "id") @interfaceObject {
        id: ID!
        name: String!
        age: Int!
    }
"#;

#[test]
fn interface_object_fields_are_added_to_every_implementation() {
    let federation = compose_sdls(&[("animals", ANIMALS), ("details", ANIMAL_DETAILS)])
        .into_result()
        .unwrap();
    let graph = &federation.federated_graph;

    for type_name in ["Dog", "Cat"] {
        for field_name in ["name", "age"] {
            let field = graph
                .field(type_name, field_name)
                .unwrap_or_else(|| unreachable!("{type_name}.{field_name} is missing"));

            assert_eq!(field.join_fields.len(), 1);
            assert_eq!(graph.subgraph(field.join_fields[0].subgraph_id).name, "details");
        }
    }

    let animal = graph.composite_type("Animal").unwrap();
    assert!(animal.join_types.iter().any(|join_type| join_type.is_interface_object));
    assert!(graph.field("Animal", "age").is_some());
}

#[test]
fn interface_object_configuration() {
    let federation = compose_sdls(&[("animals", ANIMALS), ("details", ANIMAL_DETAILS)])
        .into_result()
        .unwrap();

    let details = &federation.subgraph_configs["details"].configuration_data_by_type_name;

    assert_eq!(
        serde_json::to_value(&details["Animal"]).unwrap(),
        serde_json::json!({
            "typeName": "Animal",
            "isRootNode": true,
            "fieldNames": ["id", "name", "age"],
            "keys": [{ "selectionSet": "id" }],
            "isInterfaceObject": true,
            "entityInterfaceConcreteTypeNames": ["Dog", "Cat"],
        })
    );

    assert_eq!(
        serde_json::to_value(&details["Dog"]).unwrap(),
        serde_json::json!({
            "typeName": "Dog",
            "isRootNode": true,
            "fieldNames": ["id", "name", "age"],
            "keys": [{ "selectionSet": "id" }],
        })
    );
    assert!(details.contains_key("Cat"));

    let animal_in_animals = &federation.subgraph_configs["animals"].configuration_data_by_type_name["Animal"];
    assert!(!animal_in_animals.is_interface_object);
    assert_eq!(
        animal_in_animals
            .entity_interface_concrete_type_names
            .as_ref()
            .map(|names| names.len()),
        Some(2)
    );
}

#[test]
fn interface_objects_need_an_interface() {
    let a = r#"
        type Query { animal: Animal }
        type Animal @key(fields: "id") @interfaceObject { id: ID! }
    "#;

    let result = compose_sdls(&[("a", a)]);

    assert_eq!(
        result.diagnostics().iter_errors().cloned().collect::<Vec<_>>(),
        [CompositionError::InterfaceObjectWithoutInterface {
            type_name: "Animal".to_owned()
        }]
    );
}

#[test]
fn interface_objects_need_an_entity_interface() {
    let a = r#"
        type Query { animals: [Animal!]! }
        interface Animal { id: ID! }
        type User implements Animal @key(fields: "id") { id: ID! }
        type Dog implements Animal @key(fields: "id") { id: ID! }
    "#;

    let b = r#"
        type Animal @key(fields: "id") @interfaceObject { id: ID! name: String }
    "#;

    let result = compose_sdls(&[("a", a), ("b", b)]);

    assert_eq!(
        result.diagnostics().iter_errors().cloned().collect::<Vec<_>>(),
        [CompositionError::InterfaceObjectForNonEntityInterface {
            type_name: "Animal".to_owned(),
            subgraph_name: "a".to_owned(),
        }]
    );
    assert!(result.into_result().is_err());
}
