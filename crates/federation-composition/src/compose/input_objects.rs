use super::{
    Context, directives::compose_directives, first_description,
    fields::{InputValueOccurrence, compose_input_values},
    objects::join_types,
};
use crate::{
    DefinitionKind,
    composition_ir::DefinitionIr,
    subgraphs::{DefinitionWalker, SubgraphId},
};

/// Input objects keep the fields every subgraph defines.
pub(super) fn merge_input_object_definitions(ctx: &mut Context<'_>, definitions: &[DefinitionWalker<'_>]) {
    let Some(first) = definitions.first() else {
        return;
    };

    let subgraphs: Vec<SubgraphId> = definitions.iter().map(|definition| definition.subgraph().id).collect();

    let occurrences = definitions
        .iter()
        .flat_map(|definition| definition.fields())
        .map(|field| {
            let record = field.record();
            InputValueOccurrence {
                subgraph_id: field.parent_definition().subgraph().id,
                name: record.name,
                r#type: record.r#type,
                description: record.description,
                default_value: record.default_value.as_ref(),
                directives: field.directives(),
            }
        })
        .collect();

    let type_name = first.name();
    let fields = compose_input_values(ctx, "input field", &subgraphs, occurrences, |field_name| {
        format!("{type_name}.{field_name}")
    });

    let mut input_object = DefinitionIr::new(first.name_id(), DefinitionKind::InputObject);
    input_object.description = first_description(definitions);
    input_object.directives = compose_directives(definitions.iter().flat_map(|definition| definition.directives()));
    input_object.join_types = join_types(definitions);
    input_object.input_fields = fields;

    ctx.insert_definition(input_object);
}
