#![allow(unused_crate_dependencies)]

use federation_composition::{FederatedGraph, Subgraphs, compose, render_api_sdl, render_federated_sdl};

const ACCOUNTS: &str = r#"
    type Query {
        me: User
    }

    type User @key(fields: "id") {
        id: ID!
        name: String
        secret: String @inaccessible
    }
"#;

const REVIEWS: &str = r#"
    type User @key(fields: "id") {
        id: ID!
        reviews: [Review!]!
    }

    "A review of a product."
    type Review {
        body: String!
        rating: Int @deprecated(reason: "no more stars")
    }
"#;

fn federated_graph() -> FederatedGraph {
    let mut subgraphs = Subgraphs::default();
    subgraphs.ingest_str(ACCOUNTS, "accounts", "http://accounts.example.com");
    subgraphs.ingest_str(REVIEWS, "reviews", "http://reviews.example.com");

    compose(&subgraphs).into_result().unwrap().federated_graph
}

#[test]
fn federated_sdl() {
    let sdl = render_federated_sdl(&federated_graph());
    let (prelude, definitions) = sdl.split_once("scalar join__FieldSet\n\n").unwrap();

    assert!(prelude.starts_with("directive @join__type("));

    insta::assert_snapshot!(definitions, @r#"
    schema {
        query: Query
    }

    enum join__Graph {
        ACCOUNTS @join__graph(name: "accounts", url: "http://accounts.example.com")
        REVIEWS @join__graph(name: "reviews", url: "http://reviews.example.com")
    }

    type Query
        @join__type(graph: ACCOUNTS)
    {
        me: User
    }

    """
    A review of a product.
    """
    type Review
        @join__type(graph: REVIEWS)
    {
        body: String!
        rating: Int @deprecated(reason: "no more stars")
    }

    type User
        @join__type(graph: ACCOUNTS, key: "id")
        @join__type(graph: REVIEWS, key: "id")
    {
        id: ID!
        name: String @join__field(graph: ACCOUNTS)
        secret: String @join__field(graph: ACCOUNTS) @inaccessible
        reviews: [Review!]! @join__field(graph: REVIEWS)
    }
    "#);
}

#[test]
fn api_sdl() {
    let sdl = render_api_sdl(&federated_graph());

    insta::assert_snapshot!(sdl, @r#"
    type Query {
        me: User
    }

    """
    A review of a product.
    """
    type Review {
        body: String!
        rating: Int @deprecated(reason: "no more stars")
    }

    type User {
        id: ID!
        name: String
        reviews: [Review!]!
    }
    "#);
}

#[test]
fn rendering_is_deterministic() {
    assert_eq!(
        render_federated_sdl(&federated_graph()),
        render_federated_sdl(&federated_graph())
    );
}
