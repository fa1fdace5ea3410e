#![allow(unused_crate_dependencies)]

use federation_composition::{
    CompositionError, CompositionOptions, CompositionResult, CompositionWarning, DefinitionKind, FieldShareability,
    FieldTypeMergePolicy, InvalidFieldImplementation, SubgraphError, Subgraphs, compose, compose_with_options,
    federated_graph::TypeDefinition, render_federated_sdl,
};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::collections::BTreeSet;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

fn subgraphs(sdls: &[(&str, &str)]) -> Subgraphs {
    init_tracing();

    let mut subgraphs = Subgraphs::default();

    for (name, sdl) in sdls {
        subgraphs.ingest_str(sdl, name, &format!("http://{name}.example.com"));
    }

    subgraphs
}

fn compose_sdls(sdls: &[(&str, &str)]) -> CompositionResult {
    compose(&subgraphs(sdls))
}

fn errors(result: &CompositionResult) -> Vec<CompositionError> {
    result.diagnostics().iter_errors().cloned().collect()
}

const ACCOUNTS: &str = r#"
    type Query {
        me: User
    }

    type User @key(fields: "id") {
        id: ID!
        name: String
    }
"#;

const REVIEWS: &str = r#"
    type User @key(fields: "id") {
        id: ID!
        reviews: [Review!]!
    }

    type Review {
        body: String!
        rating: Int @deprecated(reason: "no more stars")
    }
"#;

const PRODUCTS: &str = r#"
    type Query {
        topProducts(first: Int = 5): [Product!]!
    }

    type Product @key(fields: "upc") {
        upc: String!
        name: String
        price: Int
    }
"#;

#[test]
fn composition_is_deterministic() {
    let sdls = [("accounts", ACCOUNTS), ("reviews", REVIEWS), ("products", PRODUCTS)];

    let first = compose_sdls(&sdls).into_result().unwrap();
    let second = compose_sdls(&sdls).into_result().unwrap();

    assert_eq!(
        render_federated_sdl(&first.federated_graph),
        render_federated_sdl(&second.federated_graph)
    );
    assert_eq!(first.subgraph_configs, second.subgraph_configs);
    assert_eq!(first.field_configurations, second.field_configurations);
}

#[test]
fn field_sets_do_not_depend_on_subgraph_order() {
    let fields = |sdls: &[(&str, &str)]| -> BTreeSet<(String, String)> {
        let federation = compose_sdls(sdls).into_result().unwrap();

        federation
            .federated_graph
            .type_definitions
            .iter()
            .filter_map(|definition| match definition {
                TypeDefinition::Object(composite) | TypeDefinition::Interface(composite) => Some(composite),
                _ => None,
            })
            .flat_map(|composite| {
                composite
                    .fields
                    .iter()
                    .map(|field| (composite.name.clone(), field.name.clone()))
            })
            .collect()
    };

    let forward = fields(&[("accounts", ACCOUNTS), ("reviews", REVIEWS), ("products", PRODUCTS)]);
    let backward = fields(&[("products", PRODUCTS), ("reviews", REVIEWS), ("accounts", ACCOUNTS)]);

    assert_eq!(forward, backward);
    assert!(forward.contains(&("User".to_owned(), "reviews".to_owned())));
}

#[test]
fn type_definitions_are_sorted_by_name() {
    let federation = compose_sdls(&[("reviews", REVIEWS), ("accounts", ACCOUNTS)])
        .into_result()
        .unwrap();

    let names: Vec<&str> = federation
        .federated_graph
        .type_definitions
        .iter()
        .map(TypeDefinition::name)
        .collect();

    assert_eq!(names, ["Query", "Review", "User"]);
    assert_eq!(federation.federated_graph.subgraphs[0].name, "reviews");
}

#[rstest]
#[case::interface_first(true)]
#[case::object_first(false)]
fn incompatible_kinds_fail_in_both_orders(#[case] interface_first: bool) {
    let with_interface = r#"
        type Query { foo: Foo }
        interface Foo { id: ID! }
    "#;

    let with_object = r#"
        type Foo { id: ID! }
    "#;

    let sdls = if interface_first {
        [("interfaces", with_interface), ("objects", with_object)]
    } else {
        [("objects", with_object), ("interfaces", with_interface)]
    };

    let result = compose_sdls(&sdls);
    let errors = errors(&result);

    assert_eq!(errors.len(), 1, "{errors:#?}");
    let CompositionError::IncompatibleParentKindMerge {
        type_name,
        existing_kind,
        existing_subgraph,
        incoming_kind,
        incoming_subgraph,
    } = &errors[0]
    else {
        unreachable!("unexpected error: {errors:?}");
    };

    let (expected_existing, expected_incoming) = if interface_first {
        (DefinitionKind::Interface, DefinitionKind::Object)
    } else {
        (DefinitionKind::Object, DefinitionKind::Interface)
    };

    assert_eq!(type_name, "Foo");
    assert_eq!(*existing_kind, expected_existing);
    assert_eq!(existing_subgraph, sdls[0].0);
    assert_eq!(*incoming_kind, expected_incoming);
    assert_eq!(incoming_subgraph, sdls[1].0);

    let message = errors[0].to_string();
    assert!(message.contains("\"interfaces\"") && message.contains("\"objects\""), "{message}");
    assert!(result.into_result().is_err());
}

#[test]
fn interface_objects_merge_as_interfaces() {
    let a = r#"
        type Query { animal: Animal }
        type Animal @key(fields: "id") @interfaceObject { id: ID! }
    "#;

    let b = r#"
        interface Animal @key(fields: "id") { id: ID! }
    "#;

    let c = r#"
        type Animal @key(fields: "id") { id: ID! }
    "#;

    let result = compose_sdls(&[("a", a), ("b", b), ("c", c)]);

    assert_eq!(
        errors(&result),
        [CompositionError::IncompatibleParentKindMerge {
            type_name: "Animal".to_owned(),
            existing_kind: DefinitionKind::Interface,
            existing_subgraph: "a".to_owned(),
            incoming_kind: DefinitionKind::Object,
            incoming_subgraph: "c".to_owned(),
        }]
    );
}

#[test]
fn fields_are_defined_once_across_extensions() {
    let a = r#"
        type Query { a: ID }
        extend type Query { a: ID }
    "#;

    let result = compose_sdls(&[("a", a)]);
    let errors = errors(&result);

    assert_eq!(
        errors,
        [CompositionError::Subgraph {
            subgraph_name: "a".to_owned(),
            error: SubgraphError::DuplicateFieldDefinition {
                kind: DefinitionKind::Object,
                type_name: "Query".to_owned(),
                field_name: "a".to_owned(),
            },
        }]
    );

    let CompositionError::Subgraph { error, .. } = &errors[0] else {
        unreachable!("unexpected error: {errors:?}");
    };

    assert_eq!(
        error.to_string(),
        "The object \"Query\" must only define the field definition \"a\" once."
    );
}

#[test]
fn external_fields_can_be_declared_again() {
    let a = r#"
        type Query { t: T }
        type T @key(fields: "id") { id: ID! x: String @external }
        extend type T { x: String }
    "#;

    let federation = compose_sdls(&[("a", a)]).into_result().unwrap();
    let t = &federation.subgraph_configs["a"].configuration_data_by_type_name["T"];

    assert_eq!(t.field_names.iter().collect::<Vec<_>>(), ["id", "x"]);
    assert!(federation.federated_graph.field("T", "x").is_some());
}

#[test]
fn implementations_must_define_the_fields_of_every_subgraph() {
    let a = r#"
        type Query { node: Node }
        interface Node { id: ID! }
        type User implements Node { id: ID! }
    "#;

    let b = r#"
        interface Node { id: ID! createdAt: String! }
    "#;

    let result = compose_sdls(&[("a", a), ("b", b)]);

    assert_eq!(
        errors(&result),
        [CompositionError::InvalidInterfaceImplementation {
            type_name: "User".to_owned(),
            interface_name: "Node".to_owned(),
            missing_fields: vec!["createdAt".to_owned()],
            invalid_fields: vec![],
        }]
    );
}

#[test]
fn implementations_are_checked_in_each_subgraph() {
    let a = r#"
        type Query { node: Node }
        interface Node { id: ID! name: String }
        type User implements Node { id: ID! }
    "#;

    let result = compose_sdls(&[("a", a)]);
    let errors = errors(&result);

    assert_eq!(
        errors,
        [CompositionError::Subgraph {
            subgraph_name: "a".to_owned(),
            error: SubgraphError::InvalidInterfaceImplementation {
                type_name: "User".to_owned(),
                interface_name: "Node".to_owned(),
                missing_fields: vec!["name".to_owned()],
                invalid_fields: vec![],
            },
        }]
    );

    assert!(errors[0].to_string().contains("The following fields are not implemented: \"name\"."));
}

#[test]
fn implementation_field_types_must_be_covariant() {
    let a = r#"
        type Query { node: Node }
        interface Node { id: ID! friends: [Node!] }
        type User implements Node { id: ID friends: [User!]! }
    "#;

    let result = compose_sdls(&[("a", a)]);

    assert_eq!(
        errors(&result),
        [CompositionError::Subgraph {
            subgraph_name: "a".to_owned(),
            error: SubgraphError::InvalidInterfaceImplementation {
                type_name: "User".to_owned(),
                interface_name: "Node".to_owned(),
                missing_fields: vec![],
                invalid_fields: vec![InvalidFieldImplementation {
                    field_name: "id".to_owned(),
                    expected_type: "ID!".to_owned(),
                    invalid_type: Some("ID".to_owned()),
                    missing_arguments: vec![],
                    invalid_arguments: vec![],
                    required_additional_arguments: vec![],
                }],
            },
        }]
    );
}

#[test]
fn non_shareable_fields_can_not_be_resolved_twice() {
    let a = r#"
        type Query { me: String, version: String @shareable }
    "#;

    let b = r#"
        type Query @shareable { me: String version: String }
        extend type Query { other: String }
    "#;

    let c = r#"
        type Query { other: String }
    "#;

    let result = compose_sdls(&[("a", a), ("b", b), ("c", c)]);

    assert_eq!(
        errors(&result),
        [CompositionError::InvalidFieldShareability {
            type_name: "Query".to_owned(),
            fields: vec![
                FieldShareability {
                    field_name: "me".to_owned(),
                    shareable_in: vec!["b".to_owned()],
                    non_shareable_in: vec!["a".to_owned()],
                },
                FieldShareability {
                    field_name: "other".to_owned(),
                    shareable_in: vec![],
                    non_shareable_in: vec!["b".to_owned(), "c".to_owned()],
                },
            ],
        }]
    );
}

#[test]
fn key_and_external_fields_need_no_shareable() {
    let a = r#"
        type Query { product: Product }
        type Product @key(fields: "id") { id: ID! weight: Int }
    "#;

    let b = r#"
        type Product @key(fields: "id") {
            id: ID!
            weight: Int @external
            shippingCost: Int @requires(fields: "weight")
        }
    "#;

    let federation = compose_sdls(&[("a", a), ("b", b)]).into_result().unwrap();
    let weight = federation.federated_graph.field("Product", "weight").unwrap();

    assert_eq!(weight.join_fields.len(), 2);
    assert!(weight.join_fields[1].external);

    let shipping_cost = federation.federated_graph.field("Product", "shippingCost").unwrap();
    assert_eq!(shipping_cost.join_fields[0].requires.as_deref(), Some("weight"));
    assert!(federation.warnings.is_empty());
}

#[test]
fn output_types_merge_to_the_least_required() {
    let a = r#"type Query { name: String @shareable, tags: [String!]! @shareable }"#;
    let b = r#"type Query { name: String! @shareable, tags: [String]! @shareable }"#;

    let federation = compose_sdls(&[("a", a), ("b", b)]).into_result().unwrap();
    let graph = &federation.federated_graph;

    assert_eq!(graph.field("Query", "name").unwrap().r#type.to_string(), "String");
    assert_eq!(graph.field("Query", "tags").unwrap().r#type.to_string(), "[String]!");

    let join_fields = &graph.field("Query", "name").unwrap().join_fields;
    assert_eq!(join_fields[0].r#type, None);
    assert_eq!(
        join_fields[1].r#type.as_ref().map(ToString::to_string).as_deref(),
        Some("String!")
    );
}

#[test]
fn argument_types_merge_to_the_most_required() {
    let a = r#"type Query { user(id: ID!, verbose: Boolean): String @shareable }"#;
    let b = r#"type Query { user(id: ID): String @shareable }"#;

    let federation = compose_sdls(&[("a", a), ("b", b)]).into_result().unwrap();
    let user = federation.federated_graph.field("Query", "user").unwrap();

    let arguments: Vec<String> = user
        .arguments
        .iter()
        .map(|argument| format!("{}: {}", argument.name, argument.r#type))
        .collect();

    assert_eq!(arguments, ["id: ID!"]);
}

#[test]
fn exact_policy_rejects_nullability_differences() {
    let a = r#"type Query { name: String @shareable }"#;
    let b = r#"type Query { name: String! @shareable }"#;

    let options = CompositionOptions {
        field_type_merge: FieldTypeMergePolicy::Exact,
        ..Default::default()
    };

    let result = compose_with_options(&subgraphs(&[("a", a), ("b", b)]), &options);

    assert_eq!(
        errors(&result),
        [CompositionError::IncompatibleFieldTypes {
            coordinate: "Query.name".to_owned(),
            first_type: "String".to_owned(),
            first_subgraph: "a".to_owned(),
            second_type: "String!".to_owned(),
            second_subgraph: "b".to_owned(),
        }]
    );
}

#[test]
fn different_named_types_never_merge() {
    let a = r#"type Query { count: Int @shareable }"#;
    let b = r#"type Query { count: [String] @shareable }"#;

    let result = compose_sdls(&[("a", a), ("b", b)]);

    assert_eq!(
        errors(&result),
        [CompositionError::IncompatibleFieldNamedTypes {
            coordinate: "Query.count".to_owned(),
            first_type: "Int".to_owned(),
            first_subgraph: "a".to_owned(),
            second_type: "[String]".to_owned(),
            second_subgraph: "b".to_owned(),
        }]
    );
}

#[test]
fn malformed_subgraphs_are_reported_with_the_other_errors() {
    let broken = r#"type Query { name: String "#;
    let duplicated = r#"
        type Query { a: String }
        type Query { b: String }
    "#;

    let result = compose_sdls(&[("broken", broken), ("duplicated", duplicated), ("fine", ACCOUNTS)]);
    let errors = errors(&result);

    assert_eq!(errors.len(), 2, "{errors:#?}");
    assert!(matches!(
        &errors[0],
        CompositionError::Subgraph { subgraph_name, error: SubgraphError::InvalidSyntax(_) } if subgraph_name == "broken"
    ));
    assert_eq!(
        errors[1],
        CompositionError::Subgraph {
            subgraph_name: "duplicated".to_owned(),
            error: SubgraphError::DuplicateTypeDefinition {
                type_name: "Query".to_owned()
            },
        }
    );
    assert!(
        errors[0]
            .to_string()
            .starts_with("The subgraph \"broken\" could not be federated for the following reason(s):")
    );
}

#[test]
fn overridden_fields_move_to_the_overriding_subgraph() {
    let a = r#"
        type Query { product: Product }
        type Product @key(fields: "id") { id: ID! price: Int }
    "#;

    let b = r#"
        type Product @key(fields: "id") { id: ID! price: Int @override(from: "a") }
    "#;

    let federation = compose_sdls(&[("a", a), ("b", b)]).into_result().unwrap();
    let price = federation.federated_graph.field("Product", "price").unwrap();

    assert_eq!(price.join_fields.len(), 1);
    assert_eq!(price.join_fields[0].r#override.as_deref(), Some("a"));
    assert_eq!(
        federation.federated_graph.subgraph(price.join_fields[0].subgraph_id).name,
        "b"
    );

    let product_in_a = &federation.subgraph_configs["a"].configuration_data_by_type_name["Product"];
    assert_eq!(product_in_a.field_names.iter().collect::<Vec<_>>(), ["id"]);
}

#[test]
fn override_errors_and_warnings() {
    let a = r#"
        type Query { product: Product }
        type Product @key(fields: "id") { id: ID! price: Int @override(from: "a") }
    "#;
    let b = r#"
        type Product @key(fields: "id") { id: ID! name: String @override(from: "c") }
    "#;
    let c = r#"
        type Product @key(fields: "id") { id: ID! name: String @override(from: "b") }
    "#;

    let result = compose_sdls(&[("a", a), ("b", b), ("c", c)]);

    assert_eq!(
        errors(&result),
        [
            CompositionError::EquivalentSourceAndTargetOverride {
                coordinate: "Product.price".to_owned(),
                subgraph_name: "a".to_owned(),
            },
            CompositionError::DuplicateOverriddenField {
                coordinate: "Product.name".to_owned(),
                subgraphs: vec!["b".to_owned(), "c".to_owned()],
            },
        ]
    );

    let a = r#"
        type Query { product: Product }
        type Product @key(fields: "id") { id: ID! price: Int @shareable }
    "#;
    let b = r#"
        type Product @key(fields: "id") { id: ID! price: Int @shareable @override(from: "pricing") }
    "#;

    let federation = compose_sdls(&[("a", a), ("b", b)]).into_result().unwrap();

    assert_eq!(
        federation.warnings,
        [CompositionWarning::OverrideSourceNotFound {
            subgraph_name: "b".to_owned(),
            coordinate: "Product.price".to_owned(),
            source_subgraph: "pricing".to_owned(),
        }]
    );
}

fn enum_values(result: CompositionResult, name: &str) -> Vec<String> {
    let federation = result.into_result().unwrap();

    match federation.federated_graph.definition(name) {
        Some(TypeDefinition::Enum(r#enum)) => r#enum.values.iter().map(|value| value.name.clone()).collect(),
        other => unreachable!("{name} is not an enum: {other:?}"),
    }
}

#[test]
fn output_enums_take_the_union_of_values() {
    let a = r#"type Query { status: Status } enum Status { ACTIVE INACTIVE }"#;
    let b = r#"type Query { legacyStatus: Status } enum Status { ACTIVE ARCHIVED }"#;

    assert_eq!(
        enum_values(compose_sdls(&[("a", a), ("b", b)]), "Status"),
        ["ACTIVE", "INACTIVE", "ARCHIVED"]
    );
}

#[test]
fn input_enums_take_the_intersection_of_values() {
    let a = r#"type Query { users(role: Role): [String] } enum Role { ADMIN USER }"#;
    let b = r#"type Query { admins(role: Role): [String] } enum Role { GUEST ADMIN }"#;

    assert_eq!(enum_values(compose_sdls(&[("a", a), ("b", b)]), "Role"), ["ADMIN"]);
}

#[test]
fn enums_in_both_positions_must_be_identical() {
    let a = r#"type Query { a(mode: Mode): Mode } enum Mode { X Y }"#;
    let b = r#"type Query { b: Mode } enum Mode { X }"#;

    let result = compose_sdls(&[("a", a), ("b", b)]);

    assert_eq!(
        errors(&result),
        [CompositionError::IncompatibleSharedEnum {
            enum_name: "Mode".to_owned()
        }]
    );
}

#[test]
fn input_objects_keep_common_fields() {
    let a = r#"
        type Query { search(input: Search): [String] }
        input Search { term: String limit: Int = 10 }
    "#;
    let b = r#"
        type Query { find(input: Search): [String] }
        input Search { limit: Int! }
    "#;

    let federation = compose_sdls(&[("a", a), ("b", b)]).into_result().unwrap();

    let Some(TypeDefinition::InputObject(search)) = federation.federated_graph.definition("Search") else {
        unreachable!()
    };

    let fields: Vec<String> = search
        .fields
        .iter()
        .map(|field| match &field.default_value {
            Some(default) => format!("{}: {} = {default}", field.name, field.r#type),
            None => format!("{}: {}", field.name, field.r#type),
        })
        .collect();

    assert_eq!(fields, ["limit: Int! = 10"]);
}

#[test]
fn required_input_fields_must_be_everywhere() {
    let a = r#"
        type Query { search(input: Search): [String] }
        input Search { term: String! limit: Int }
    "#;
    let b = r#"
        type Query { find(input: Search): [String] }
        input Search { limit: Int }
    "#;

    let result = compose_sdls(&[("a", a), ("b", b)]);

    assert_eq!(
        errors(&result),
        [CompositionError::InvalidRequiredInputValue {
            what: "input field",
            coordinate: "Search.term".to_owned(),
            missing_from: vec!["b".to_owned()],
        }]
    );
}

#[test]
fn subgraph_names_must_be_unique_and_not_empty() {
    assert_eq!(
        errors(&compose(&Subgraphs::default())),
        [CompositionError::MinimumSubgraphRequirement]
    );

    let result = compose_sdls(&[("a", ACCOUNTS), ("", REVIEWS), ("a", PRODUCTS)]);

    assert_eq!(
        errors(&result),
        [CompositionError::InvalidSubgraphNames {
            names: vec!["".to_owned(), "a".to_owned()]
        }]
    );
}

#[test]
fn a_query_root_type_is_required() {
    let result = compose_sdls(&[("a", "type User { id: ID }")]);

    assert_eq!(errors(&result), [CompositionError::NoQueryRootType]);
}

#[test]
fn custom_root_type_names_are_normalized() {
    let a = r#"
        schema { query: RootQuery mutation: RootMutation }
        type RootQuery { me: String }
        type RootMutation { logout: Boolean }
    "#;

    let federation = compose_sdls(&[("a", a)]).into_result().unwrap();
    let roots = &federation.federated_graph.root_operation_types;

    assert_eq!(roots.query, "Query");
    assert_eq!(roots.mutation.as_deref(), Some("Mutation"));
    assert_eq!(roots.subscription, None);
    assert!(federation.federated_graph.field("Mutation", "logout").is_some());
}

#[test]
fn warnings_can_be_made_fatal() {
    let a = r#"
        type Query { me: User }
        type User @extends @key(fields: "id") { id: ID! }
    "#;

    let federation = compose_sdls(&[("a", a)]).into_result().unwrap();
    assert_eq!(
        federation.warnings,
        [CompositionWarning::ExtendsDirectiveUsed {
            subgraph_name: "a".to_owned(),
            type_name: "User".to_owned(),
        }]
    );

    let options = CompositionOptions::from_toml("warnings_are_fatal = true").unwrap();
    let diagnostics = compose_with_options(&subgraphs(&[("a", a)]), &options)
        .into_result()
        .unwrap_err();

    assert!(!diagnostics.any_fatal());
    assert_eq!(diagnostics.iter_warnings().count(), 1);
}

#[test]
fn directive_markers_are_scoped_to_their_block() {
    let a = r#"
        type Query @openfed__requireFetchReasons { a: String }
        extend type Query { b: String }
        extend type Query @openfed__requireFetchReasons { c: String d: String }
    "#;

    let federation = compose_sdls(&[("a", a)]).into_result().unwrap();
    let query = &federation.subgraph_configs["a"].configuration_data_by_type_name["Query"];

    assert_eq!(
        query.require_fetch_reasons_field_names.as_deref(),
        Some(&["a".to_owned(), "c".to_owned(), "d".to_owned()][..])
    );
    assert_eq!(query.field_names.len(), 4);
}

#[test]
fn field_configurations_list_arguments_and_authorization() {
    let a = r#"
        type Query {
            topProducts(first: Int = 5): [String!]!
            me: String @authenticated
            secret: String @requiresScopes(scopes: [["read:secret"], ["admin"]])
            plain: String
        }
    "#;

    let federation = compose_sdls(&[("a", a)]).into_result().unwrap();
    let configurations = serde_json::to_value(&federation.field_configurations).unwrap();

    assert_eq!(
        configurations,
        serde_json::json!([
            { "typeName": "Query", "fieldName": "topProducts", "argumentNames": ["first"] },
            { "typeName": "Query", "fieldName": "me", "argumentNames": [], "requiresAuthentication": true },
            {
                "typeName": "Query",
                "fieldName": "secret",
                "argumentNames": [],
                "requiredScopes": [["read:secret"], ["admin"]]
            },
        ])
    );
}
