mod context;
mod directives;
mod enums;
mod fields;
mod input_objects;
mod objects;
mod unions;

pub(crate) mod entity_interface;
pub(crate) mod overrides;

pub(crate) use self::context::Context;

use self::{entity_interface::EntityInterfaces, enums::EnumUsages, overrides::Overrides};
use crate::{
    CompositionError, DefinitionKind,
    composition_ir::DefinitionIr,
    subgraphs::{DefinitionWalker, StringId},
};
use indexmap::IndexMap;

/// Merge the definitions of all subgraphs, by name, into the composition IR.
pub(crate) fn compose_subgraphs(ctx: &mut Context<'_>, entity_interfaces: &EntityInterfaces, overrides: &Overrides) {
    let enum_usages = EnumUsages::collect(ctx.subgraphs);
    let groups = group_definitions_by_name(ctx);

    for definitions in groups.values() {
        let Some(kind) = merged_kind(ctx, definitions) else {
            continue;
        };

        match kind {
            DefinitionKind::Object | DefinitionKind::Interface => {
                objects::merge_composite_definitions(ctx, kind, definitions, overrides)
            }
            DefinitionKind::InputObject => input_objects::merge_input_object_definitions(ctx, definitions),
            DefinitionKind::Enum => enums::merge_enum_definitions(ctx, definitions, &enum_usages),
            DefinitionKind::Union => unions::merge_union_definitions(ctx, definitions),
            DefinitionKind::Scalar => merge_scalar_definitions(ctx, definitions),
        }
    }

    entity_interface::fan_out_interface_object_fields(ctx, entity_interfaces, &groups);

    if !ctx.has_query_root_type() {
        ctx.push_error(CompositionError::NoQueryRootType);
    }
}

/// All definitions of each type name, in subgraph order.
fn group_definitions_by_name<'a>(ctx: &Context<'a>) -> IndexMap<StringId, Vec<DefinitionWalker<'a>>> {
    let mut groups: IndexMap<StringId, Vec<DefinitionWalker<'a>>> = IndexMap::new();

    for definition in ctx.subgraphs.iter_definitions() {
        groups.entry(definition.name_id()).or_default().push(definition);
    }

    groups
}

/// Interface objects count as interfaces: the federated kind of an entity interface is interface.
fn effective_kind(definition: DefinitionWalker<'_>) -> DefinitionKind {
    if definition.is_interface_object() {
        DefinitionKind::Interface
    } else {
        definition.kind()
    }
}

fn merged_kind(ctx: &mut Context<'_>, definitions: &[DefinitionWalker<'_>]) -> Option<DefinitionKind> {
    let (first, rest) = definitions.split_first()?;
    let kind = effective_kind(*first);
    let mut compatible = true;

    for incoming in rest.iter().filter(|incoming| effective_kind(**incoming) != kind) {
        compatible = false;

        ctx.push_error(CompositionError::IncompatibleParentKindMerge {
            type_name: first.name().to_owned(),
            existing_kind: kind,
            existing_subgraph: first.subgraph().name().to_owned(),
            incoming_kind: effective_kind(*incoming),
            incoming_subgraph: incoming.subgraph().name().to_owned(),
        });
    }

    if !compatible {
        return None;
    }

    if kind == DefinitionKind::Interface && definitions.iter().all(|definition| definition.is_interface_object()) {
        ctx.push_error(CompositionError::InterfaceObjectWithoutInterface {
            type_name: first.name().to_owned(),
        });
        return None;
    }

    Some(kind)
}

fn merge_scalar_definitions(ctx: &mut Context<'_>, definitions: &[DefinitionWalker<'_>]) {
    let Some(first) = definitions.first() else {
        return;
    };

    let mut scalar = DefinitionIr::new(first.name_id(), DefinitionKind::Scalar);
    scalar.description = first_description(definitions);
    scalar.directives = directives::compose_directives(definitions.iter().flat_map(|definition| definition.directives()));
    scalar.join_types = objects::join_types(definitions);

    ctx.insert_definition(scalar);
}

/// The first description found, in subgraph order.
fn first_description(definitions: &[DefinitionWalker<'_>]) -> Option<StringId> {
    definitions.iter().find_map(|definition| definition.record().description)
}
