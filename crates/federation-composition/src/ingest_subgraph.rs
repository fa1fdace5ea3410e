//! This is a separate module because we want to use only the public API of [Subgraphs] and avoid
//! mixing GraphQL parser logic and types with our internals.

mod directives;
mod enums;
mod field_sets;
mod fields;
mod schema_definitions;
mod validate;

use self::schema_definitions::*;
use crate::{
    Subgraphs,
    error::{CompositionWarning, SubgraphError},
    subgraphs::{self, BlockId, DefinitionId, DefinitionKind, Markers, SubgraphId},
};
use cynic_parser::{ConstValue, type_system as ast};

/// _Service is a special type exposed by subgraphs. It should not be composed.
const SERVICE_TYPE_NAME: &str = "_Service";

/// _Entity is a special union type exposed by subgraphs. It should not be composed.
const ENTITY_UNION_NAME: &str = "_Entity";

/// Scalars and enums of the federation and link specs. They are not part of the federated graph.
const FEDERATION_PLUMBING_TYPES: &[&str] = &[
    "_Any",
    "FieldSet",
    "_FieldSet",
    "federation__FieldSet",
    "openfed__FieldSet",
    "federation__Scope",
    "link__Import",
    "link__Purpose",
];

struct Context<'a> {
    document: &'a ast::TypeSystemDocument,
    subgraph_id: SubgraphId,
    subgraphs: &'a mut Subgraphs,
    root_types: RootTypes<'a>,
}

impl Context<'_> {
    fn push_error(&mut self, error: SubgraphError) {
        self.subgraphs.push_ingestion_diagnostic(self.subgraph_id, error);
    }

    fn subgraph_name(&self) -> String {
        self.subgraphs.walk(self.subgraph_id).name().to_owned()
    }
}

/// Lists can not be nested deeper than this.
pub(crate) const MAX_LIST_NESTING: usize = 8;

#[tracing::instrument(skip_all, fields(subgraph = name))]
pub(crate) fn ingest_subgraph(document: &ast::TypeSystemDocument, name: &str, url: &str, subgraphs: &mut Subgraphs) {
    let subgraph_id = subgraphs.push_subgraph(name, url);

    let mut ctx = Context {
        document,
        subgraph_id,
        subgraphs,
        root_types: RootTypes::default(),
    };

    ingest_schema_definitions(&mut ctx);
    ingest_definitions(&mut ctx);

    crate::propagation::propagate_markers(ctx.subgraphs, subgraph_id);

    validate::validate_subgraph(&mut ctx);

    tracing::debug!("subgraph ingested");
}

fn ingest_definitions(ctx: &mut Context<'_>) {
    let document = ctx.document;

    for definition in document.definitions() {
        let (type_definition, is_extension) = match definition {
            ast::Definition::Type(type_definition) => (type_definition, false),
            ast::Definition::TypeExtension(type_definition) => (type_definition, true),
            _ => continue,
        };

        let original_name = type_definition.name();

        let kind = match type_definition {
            ast::TypeDefinition::Object(_) if original_name == SERVICE_TYPE_NAME => continue,
            ast::TypeDefinition::Union(_) if original_name == ENTITY_UNION_NAME => continue,
            _ if FEDERATION_PLUMBING_TYPES.contains(&original_name) => continue,
            ast::TypeDefinition::Object(_) => DefinitionKind::Object,
            ast::TypeDefinition::Interface(_) => DefinitionKind::Interface,
            ast::TypeDefinition::InputObject(_) => DefinitionKind::InputObject,
            ast::TypeDefinition::Enum(_) => DefinitionKind::Enum,
            ast::TypeDefinition::Union(_) => DefinitionKind::Union,
            ast::TypeDefinition::Scalar(_) => DefinitionKind::Scalar,
        };

        let root_type_match = ctx.root_types.match_name(original_name);

        if let RootTypeMatch::NotRootButHasDefaultRootName(operation) = root_type_match {
            ctx.push_error(SubgraphError::InvalidRootTypeDefinition {
                type_name: original_name.to_owned(),
                operation,
            });
            continue;
        }

        let type_name = ctx.root_types.rename(original_name);

        let Some(definition_id) = find_or_push_definition(ctx, type_name, kind, is_extension) else {
            continue;
        };

        if let Some(description) = type_definition.description() {
            if ctx.subgraphs[definition_id].description.is_none() {
                let description = ctx.subgraphs.strings.intern(description.to_cow());
                ctx.subgraphs[definition_id].description = Some(description);
            }
        }

        let block_id = ctx.subgraphs.push_block(definition_id, is_extension);
        let directive_site_id = ctx.subgraphs[block_id].directives;

        directives::ingest_directives(ctx, directive_site_id, type_definition.directives(), type_name);
        directives::ingest_keys(ctx, definition_id, type_definition.directives());

        if ctx.subgraphs[directive_site_id].has(Markers::EXTENDS) {
            let subgraph_name = ctx.subgraph_name();
            ctx.subgraphs.push_ingestion_warning(CompositionWarning::ExtendsDirectiveUsed {
                subgraph_name,
                type_name: type_name.to_owned(),
            });
        }

        if let RootTypeMatch::Root(operation) = root_type_match {
            set_root_type(ctx, operation, definition_id, kind);
        }

        let parent_is_query_root_type = matches!(root_type_match, RootTypeMatch::Root(RootOperation::Query));

        match type_definition {
            ast::TypeDefinition::Object(object_type) => {
                ingest_implements(ctx, definition_id, object_type.implements_interfaces());
                fields::ingest_fields(
                    ctx,
                    definition_id,
                    block_id,
                    object_type.fields(),
                    parent_is_query_root_type,
                );
            }
            ast::TypeDefinition::Interface(interface_type) => {
                ingest_implements(ctx, definition_id, interface_type.implements_interfaces());
                fields::ingest_fields(ctx, definition_id, block_id, interface_type.fields(), false);
            }
            ast::TypeDefinition::InputObject(input_object) => {
                fields::ingest_input_fields(ctx, definition_id, block_id, input_object.fields());
            }
            ast::TypeDefinition::Enum(enum_type) => {
                enums::ingest_enum_values(ctx, definition_id, enum_type.values());
            }
            ast::TypeDefinition::Union(union_type) => {
                for member in union_type.members() {
                    let member = ctx.subgraphs.strings.intern(ctx.root_types.rename(member.name()));

                    if ctx.subgraphs[definition_id].union_members.contains(&member) {
                        ctx.push_error(SubgraphError::DuplicateUnionMember {
                            union_name: type_name.to_owned(),
                            member: ctx.subgraphs[member].to_owned(),
                        });
                        continue;
                    }

                    ctx.subgraphs[definition_id].union_members.push(member);
                }
            }
            ast::TypeDefinition::Scalar(_) => (),
        }
    }
}

/// The definition a block contributes to. `None` when the block can't be ingested.
fn find_or_push_definition(
    ctx: &mut Context<'_>,
    type_name: &str,
    kind: DefinitionKind,
    is_extension: bool,
) -> Option<DefinitionId> {
    let subgraph_id = ctx.subgraph_id;

    let Some(existing) = ctx.subgraphs.walk(subgraph_id).definition_by_name(type_name) else {
        return Some(ctx.subgraphs.push_definition(subgraph_id, type_name, kind, None));
    };

    if existing.kind() != kind {
        let base_kind = existing.kind();
        ctx.push_error(SubgraphError::IncompatibleExtensionKind {
            type_name: type_name.to_owned(),
            base_kind,
            extension_kind: kind,
        });
        return None;
    }

    if !is_extension && existing.has_base_block() {
        ctx.push_error(SubgraphError::DuplicateTypeDefinition {
            type_name: type_name.to_owned(),
        });
        return None;
    }

    Some(existing.id)
}

fn set_root_type(ctx: &mut Context<'_>, operation: RootOperation, definition_id: DefinitionId, kind: DefinitionKind) {
    if kind != DefinitionKind::Object {
        let type_name = ctx.subgraphs.walk(definition_id).name().to_owned();
        ctx.push_error(SubgraphError::RootTypeNotObject {
            type_name,
            operation: operation.as_str(),
        });
        return;
    }

    let subgraph = &mut ctx.subgraphs[ctx.subgraph_id];

    match operation {
        RootOperation::Query => subgraph.query_type = Some(definition_id),
        RootOperation::Mutation => subgraph.mutation_type = Some(definition_id),
        RootOperation::Subscription => subgraph.subscription_type = Some(definition_id),
    }
}

fn ingest_implements<'a>(
    ctx: &mut Context<'_>,
    definition_id: DefinitionId,
    interfaces: impl Iterator<Item = &'a str>,
) {
    for interface in interfaces {
        let interface = ctx.subgraphs.strings.intern(interface);

        if !ctx.subgraphs[definition_id].implements_interfaces.contains(&interface) {
            ctx.subgraphs[definition_id].implements_interfaces.push(interface);
        }
    }
}

fn ast_value_to_subgraph_value(value: ConstValue<'_>, subgraphs: &mut Subgraphs) -> subgraphs::Value {
    match &value {
        ConstValue::Null(_) => subgraphs::Value::Null,
        ConstValue::Int(n) => subgraphs::Value::Int(n.as_i64()),
        ConstValue::Float(n) => subgraphs::Value::Float(n.as_f64()),
        ConstValue::String(s) => subgraphs::Value::String(subgraphs.strings.intern(s.as_str())),
        ConstValue::Boolean(b) => subgraphs::Value::Boolean(b.value()),
        ConstValue::Enum(e) => subgraphs::Value::Enum(subgraphs.strings.intern(e.name())),
        ConstValue::List(l) => {
            subgraphs::Value::List(l.items().map(|v| ast_value_to_subgraph_value(v, subgraphs)).collect())
        }
        ConstValue::Object(o) => subgraphs::Value::Object(
            o.fields()
                .map(|field| {
                    (
                        subgraphs.strings.intern(field.name()),
                        ast_value_to_subgraph_value(field.value(), subgraphs),
                    )
                })
                .collect(),
        ),
    }
}
