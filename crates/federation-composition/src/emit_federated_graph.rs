use crate::{
    DefinitionKind, Subgraphs,
    composition_ir::{CompositionIr, DefinitionIr, DirectivesIr, FieldIr, InputValueIr, JoinTypeIr},
    federated_graph as federated,
    subgraphs::{self, FieldType, StringId, SubgraphId},
};
use itertools::Itertools;

/// This can't fail. All the relevant, correct information should already be in the CompositionIr.
pub(crate) fn emit_federated_graph(ir: CompositionIr, subgraphs: &Subgraphs) -> federated::FederatedGraph {
    let ctx = Context { subgraphs };

    let root_type = |name: &str| -> Option<String> {
        let name_id = subgraphs.strings.lookup(name)?;
        ir.definitions.contains_key(&name_id).then(|| name.to_owned())
    };

    let root_operation_types = federated::RootOperationTypes {
        query: "Query".to_owned(),
        mutation: root_type("Mutation"),
        subscription: root_type("Subscription"),
    };

    let type_definitions = ir
        .definitions
        .into_values()
        .sorted_by(|a, b| subgraphs[a.name].cmp(&subgraphs[b.name]))
        .map(|definition| ctx.emit_definition(definition))
        .collect();

    federated::FederatedGraph {
        subgraphs: subgraphs
            .iter_subgraphs()
            .map(|subgraph| federated::Subgraph {
                name: subgraph.name().to_owned(),
                url: subgraph.url().to_owned(),
            })
            .collect(),
        root_operation_types,
        type_definitions,
    }
}

#[derive(Clone, Copy)]
struct Context<'a> {
    subgraphs: &'a Subgraphs,
}

impl Context<'_> {
    fn string(self, id: StringId) -> String {
        self.subgraphs[id].to_owned()
    }

    fn opt_string(self, id: Option<StringId>) -> Option<String> {
        id.map(|id| self.string(id))
    }

    fn r#type(self, field_type: FieldType) -> federated::Type {
        federated::Type {
            name: self.string(field_type.name),
            wrapping: field_type.wrapping,
        }
    }

    fn emit_definition(self, definition: DefinitionIr) -> federated::TypeDefinition {
        let name = self.string(definition.name);
        let description = self.opt_string(definition.description);
        let directives = self.emit_directives(&definition.directives);
        let join_types = definition
            .join_types
            .iter()
            .map(|join_type| self.emit_join_type(join_type))
            .collect();

        match definition.kind {
            DefinitionKind::Object | DefinitionKind::Interface => {
                let composite = federated::CompositeType {
                    name,
                    description,
                    implements_interfaces: definition
                        .join_implements
                        .iter()
                        .map(|(_, interface)| self.string(*interface))
                        .unique()
                        .collect(),
                    join_implements: definition
                        .join_implements
                        .iter()
                        .map(|(subgraph_id, interface)| federated::JoinImplements {
                            subgraph_id: federated_subgraph_id(*subgraph_id),
                            interface: self.string(*interface),
                        })
                        .collect(),
                    join_types,
                    directives,
                    fields: definition
                        .fields
                        .into_values()
                        .map(|field| self.emit_field(field))
                        .collect(),
                };

                if definition.kind == DefinitionKind::Object {
                    federated::TypeDefinition::Object(composite)
                } else {
                    federated::TypeDefinition::Interface(composite)
                }
            }
            DefinitionKind::Union => federated::TypeDefinition::Union(federated::Union {
                name,
                description,
                members: definition
                    .join_union_members
                    .iter()
                    .map(|(_, member)| self.string(*member))
                    .unique()
                    .collect(),
                join_members: definition
                    .join_union_members
                    .iter()
                    .map(|(subgraph_id, member)| federated::JoinUnionMember {
                        subgraph_id: federated_subgraph_id(*subgraph_id),
                        member: self.string(*member),
                    })
                    .collect(),
                join_types,
                directives,
            }),
            DefinitionKind::Enum => federated::TypeDefinition::Enum(federated::Enum {
                name,
                description,
                values: definition
                    .enum_values
                    .iter()
                    .map(|value| federated::EnumValue {
                        name: self.string(value.name),
                        description: self.opt_string(value.description),
                        directives: self.emit_directives(&value.directives),
                    })
                    .collect(),
                join_types,
                directives,
            }),
            DefinitionKind::InputObject => federated::TypeDefinition::InputObject(federated::InputObject {
                name,
                description,
                fields: definition
                    .input_fields
                    .iter()
                    .map(|field| self.emit_input_value(field))
                    .collect(),
                join_types,
                directives,
            }),
            DefinitionKind::Scalar => federated::TypeDefinition::Scalar(federated::Scalar {
                name,
                description,
                join_types,
                directives,
            }),
        }
    }

    fn emit_join_type(self, join_type: &JoinTypeIr) -> federated::JoinType {
        federated::JoinType {
            subgraph_id: federated_subgraph_id(join_type.subgraph_id),
            key: join_type
                .key
                .map(|key| self.subgraphs.walk(key).render_selection_set()),
            resolvable: join_type.resolvable,
            is_interface_object: join_type.is_interface_object,
        }
    }

    fn emit_field(self, field: FieldIr) -> federated::Field {
        let join_fields = field
            .join_fields
            .iter()
            .map(|(subgraph_id, field_id)| {
                let subgraph_field = self.subgraphs.walk(*field_id);
                let directives = subgraph_field.directives();
                let subgraph_type = subgraph_field.r#type();

                federated::JoinField {
                    subgraph_id: federated_subgraph_id(*subgraph_id),
                    r#type: (subgraph_type != field.r#type).then(|| self.r#type(subgraph_type)),
                    requires: directives
                        .requires
                        .as_ref()
                        .map(|field_set| self.subgraphs.render_field_set(field_set)),
                    provides: directives
                        .provides
                        .as_ref()
                        .map(|field_set| self.subgraphs.render_field_set(field_set)),
                    external: subgraph_field.is_external(),
                    r#override: directives.r#override.map(|r#override| self.string(r#override.from)),
                }
            })
            .collect();

        federated::Field {
            name: self.string(field.name),
            description: self.opt_string(field.description),
            r#type: self.r#type(field.r#type),
            arguments: field
                .arguments
                .iter()
                .map(|argument| self.emit_input_value(argument))
                .collect(),
            join_fields,
            directives: self.emit_directives(&field.directives),
        }
    }

    fn emit_input_value(self, input_value: &InputValueIr) -> federated::InputValueDefinition {
        federated::InputValueDefinition {
            name: self.string(input_value.name),
            description: self.opt_string(input_value.description),
            r#type: self.r#type(input_value.r#type),
            default_value: input_value
                .default_value
                .as_ref()
                .map(|value| emit_value(self.subgraphs, value)),
            directives: self.emit_directives(&input_value.directives),
        }
    }

    fn emit_directives(self, directives: &DirectivesIr) -> Vec<federated::Directive> {
        let mut out = Vec::new();

        if let Some(reason) = directives.deprecated {
            out.push(federated::Directive::Deprecated {
                reason: self.opt_string(reason),
            });
        }

        if directives.inaccessible {
            out.push(federated::Directive::Inaccessible);
        }

        if directives.authenticated {
            out.push(federated::Directive::Authenticated);
        }

        if !directives.requires_scopes.is_empty() {
            out.push(federated::Directive::RequiresScopes(
                directives
                    .requires_scopes
                    .iter()
                    .map(|scopes| scopes.iter().map(|scope| self.string(*scope)).collect())
                    .collect(),
            ));
        }

        out.extend(
            directives
                .tags
                .iter()
                .map(|tag| federated::Directive::Tag(self.string(*tag))),
        );

        out
    }
}

fn federated_subgraph_id(id: SubgraphId) -> federated::SubgraphId {
    federated::SubgraphId(usize::from(id))
}

pub(crate) fn emit_value(subgraphs: &Subgraphs, value: &subgraphs::Value) -> federated::Value {
    match value {
        subgraphs::Value::Null => federated::Value::Null,
        subgraphs::Value::Int(int) => federated::Value::Int(*int),
        subgraphs::Value::Float(float) => federated::Value::Float(*float),
        subgraphs::Value::String(string) => federated::Value::String(subgraphs[*string].to_owned()),
        subgraphs::Value::Boolean(boolean) => federated::Value::Boolean(*boolean),
        subgraphs::Value::Enum(value) => federated::Value::Enum(subgraphs[*value].to_owned()),
        subgraphs::Value::List(items) => {
            federated::Value::List(items.iter().map(|item| emit_value(subgraphs, item)).collect())
        }
        subgraphs::Value::Object(fields) => federated::Value::Object(
            fields
                .iter()
                .map(|(name, value)| (subgraphs[*name].to_owned(), emit_value(subgraphs, value)))
                .collect(),
        ),
    }
}
