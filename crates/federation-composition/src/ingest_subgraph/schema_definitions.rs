use super::*;
use cynic_parser::common::OperationType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RootOperation {
    Query,
    Mutation,
    Subscription,
}

impl RootOperation {
    pub(super) fn as_str(self) -> &'static str {
        match self {
            RootOperation::Query => "query",
            RootOperation::Mutation => "mutation",
            RootOperation::Subscription => "subscription",
        }
    }

    fn default_type_name(self) -> &'static str {
        match self {
            RootOperation::Query => "Query",
            RootOperation::Mutation => "Mutation",
            RootOperation::Subscription => "Subscription",
        }
    }

    const ALL: [RootOperation; 3] = [RootOperation::Query, RootOperation::Mutation, RootOperation::Subscription];
}

pub(super) enum RootTypeMatch {
    Root(RootOperation),
    /// The type is called `Query`, but the schema definition makes another type the query root.
    NotRootButHasDefaultRootName(&'static str),
    NotRoot,
}

/// The root types declared in `schema { .. }` and `extend schema { .. }`.
#[derive(Default)]
pub(super) struct RootTypes<'a> {
    query: Option<&'a str>,
    mutation: Option<&'a str>,
    subscription: Option<&'a str>,
}

impl<'a> RootTypes<'a> {
    fn declared(&self, operation: RootOperation) -> Option<&'a str> {
        match operation {
            RootOperation::Query => self.query,
            RootOperation::Mutation => self.mutation,
            RootOperation::Subscription => self.subscription,
        }
    }

    pub(super) fn match_name(&self, name: &str) -> RootTypeMatch {
        for operation in RootOperation::ALL {
            match self.declared(operation) {
                Some(declared) if declared == name => return RootTypeMatch::Root(operation),
                Some(_) if name == operation.default_type_name() => {
                    return RootTypeMatch::NotRootButHasDefaultRootName(operation.as_str());
                }
                None if name == operation.default_type_name() => return RootTypeMatch::Root(operation),
                _ => (),
            }
        }

        RootTypeMatch::NotRoot
    }

    /// Root types get their default name (`Query`, `Mutation`, `Subscription`) in the federated
    /// graph, whatever they are called in the subgraph.
    pub(super) fn rename<'b>(&self, name: &'b str) -> &'b str {
        RootOperation::ALL
            .into_iter()
            .find(|operation| self.declared(*operation) == Some(name))
            .map(|operation| operation.default_type_name())
            .unwrap_or(name)
    }
}

pub(super) fn ingest_schema_definitions(ctx: &mut Context<'_>) {
    let document = ctx.document;

    for definition in document.definitions() {
        match definition {
            ast::Definition::Schema(schema_definition) | ast::Definition::SchemaExtension(schema_definition) => {
                for root_operation in schema_definition.root_operations() {
                    let named_type = root_operation.named_type();

                    match root_operation.operation_type() {
                        OperationType::Query => ctx.root_types.query = Some(named_type),
                        OperationType::Mutation => ctx.root_types.mutation = Some(named_type),
                        OperationType::Subscription => ctx.root_types.subscription = Some(named_type),
                    }
                }
            }
            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn custom_root_names_are_renamed() {
        let root_types = RootTypes {
            query: Some("MyQuery"),
            mutation: None,
            subscription: None,
        };

        assert_eq!(root_types.rename("MyQuery"), "Query");
        assert_eq!(root_types.rename("User"), "User");
        assert!(matches!(
            root_types.match_name("MyQuery"),
            RootTypeMatch::Root(RootOperation::Query)
        ));
        assert!(matches!(
            root_types.match_name("Query"),
            RootTypeMatch::NotRootButHasDefaultRootName("query")
        ));
        assert!(matches!(
            root_types.match_name("Mutation"),
            RootTypeMatch::Root(RootOperation::Mutation)
        ));
        assert!(matches!(root_types.match_name("User"), RootTypeMatch::NotRoot));
    }
}
