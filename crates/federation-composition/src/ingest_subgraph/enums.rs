use super::*;
use crate::subgraphs::EnumValueRecord;

pub(super) fn ingest_enum_values(
    ctx: &mut Context<'_>,
    definition_id: DefinitionId,
    values: ast::Iter<'_, ast::EnumValueDefinition<'_>>,
) {
    for value in values {
        let enum_name = ctx.subgraphs.walk(definition_id).name().to_owned();
        let name = ctx.subgraphs.strings.intern(value.value());

        if ctx.subgraphs[definition_id]
            .enum_values
            .iter()
            .any(|existing| existing.name == name)
        {
            ctx.push_error(SubgraphError::DuplicateEnumValue {
                enum_name,
                value: value.value().to_owned(),
            });
            continue;
        }

        let directives = ctx.subgraphs.new_directive_site();
        directives::ingest_directives(
            ctx,
            directives,
            value.directives(),
            &format!("{enum_name}.{}", value.value()),
        );

        let description = value
            .description()
            .map(|description| ctx.subgraphs.strings.intern(description.to_cow()));

        ctx.subgraphs[definition_id].enum_values.push(EnumValueRecord {
            name,
            description,
            directives,
        });
    }
}
