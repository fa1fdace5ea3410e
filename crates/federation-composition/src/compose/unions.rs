use super::{Context, directives::compose_directives, first_description, objects::join_types};
use crate::{DefinitionKind, composition_ir::DefinitionIr, subgraphs::DefinitionWalker};

pub(super) fn merge_union_definitions(ctx: &mut Context<'_>, definitions: &[DefinitionWalker<'_>]) {
    let Some(first) = definitions.first() else {
        return;
    };

    let mut union = DefinitionIr::new(first.name_id(), DefinitionKind::Union);
    union.description = first_description(definitions);
    union.directives = compose_directives(definitions.iter().flat_map(|definition| definition.directives()));
    union.join_types = join_types(definitions);
    union.join_union_members = definitions
        .iter()
        .flat_map(|definition| {
            let subgraph_id = definition.subgraph().id;
            definition
                .record()
                .union_members
                .iter()
                .map(move |member| (subgraph_id, *member))
        })
        .collect();

    ctx.insert_definition(union);
}
