use super::*;
use crate::subgraphs::{ArgumentRecord, FieldId, FieldRecord, FieldType};
use cynic_parser::common::WrappingType;
use wrapping::Wrapping;

pub(super) fn ingest_input_fields(
    ctx: &mut Context<'_>,
    parent_definition_id: DefinitionId,
    block_id: BlockId,
    fields: ast::Iter<'_, ast::InputValueDefinition<'_>>,
) {
    for field in fields {
        let field_name = field.name();
        let coordinate = format!("{}.{field_name}", ctx.subgraphs.walk(parent_definition_id).name());

        let Some(field_type) = intern_field_type(ctx, field.ty(), &coordinate) else {
            continue;
        };

        let directives = ctx.subgraphs.new_directive_site();
        directives::ingest_directives(ctx, directives, field.directives(), &coordinate);

        let description = field
            .description()
            .map(|description| ctx.subgraphs.strings.intern(description.to_cow()));

        let default_value = field
            .default_value()
            .map(|default| ast_value_to_subgraph_value(default, ctx.subgraphs));

        let name = ctx.subgraphs.strings.intern(field_name);

        push_field(
            ctx,
            FieldRecord {
                parent_definition_id,
                block_id,
                name,
                r#type: field_type,
                description,
                directives,
                arguments: Vec::new(),
                default_value,
                markers: Markers::empty(),
            },
        );
    }
}

pub(super) fn ingest_fields(
    ctx: &mut Context<'_>,
    parent_definition_id: DefinitionId,
    block_id: BlockId,
    fields: ast::Iter<'_, ast::FieldDefinition<'_>>,
    parent_is_query_root_type: bool,
) {
    for field in fields {
        let field_name = field.name();

        // These are special fields on Query exposed by subgraphs.
        if parent_is_query_root_type && ["_entities", "_service"].contains(&field_name) {
            continue;
        }

        let coordinate = format!("{}.{field_name}", ctx.subgraphs.walk(parent_definition_id).name());

        let Some(field_type) = intern_field_type(ctx, field.ty(), &coordinate) else {
            continue;
        };

        let description = field
            .description()
            .map(|description| ctx.subgraphs.strings.intern(description.to_cow()));

        let directives = ctx.subgraphs.new_directive_site();
        directives::ingest_directives(ctx, directives, field.directives(), &coordinate);

        let arguments = ingest_field_arguments(ctx, &coordinate, field.arguments());
        let name = ctx.subgraphs.strings.intern(field_name);

        push_field(
            ctx,
            FieldRecord {
                parent_definition_id,
                block_id,
                name,
                r#type: field_type,
                description,
                directives,
                arguments,
                default_value: None,
                markers: Markers::empty(),
            },
        );
    }
}

fn ingest_field_arguments(
    ctx: &mut Context<'_>,
    field_coordinate: &str,
    arguments: ast::Iter<'_, ast::InputValueDefinition<'_>>,
) -> Vec<ArgumentRecord> {
    let mut records = Vec::new();

    for argument in arguments {
        let coordinate = format!("{field_coordinate}({}:)", argument.name());

        let Some(r#type) = intern_field_type(ctx, argument.ty(), &coordinate) else {
            continue;
        };

        let name = ctx.subgraphs.strings.intern(argument.name());
        let directives = ctx.subgraphs.new_directive_site();
        directives::ingest_directives(ctx, directives, argument.directives(), &coordinate);

        let description = argument
            .description()
            .map(|description| ctx.subgraphs.strings.intern(description.to_cow()));

        let default_value = argument
            .default_value()
            .map(|default| ast_value_to_subgraph_value(default, ctx.subgraphs));

        records.push(ArgumentRecord {
            name,
            r#type,
            description,
            directives,
            default_value,
        });
    }

    records
}

/// Push the field, unless the definition already has a field with the same name. A duplicate is
/// only tolerated when one of the two declarations is `@external`: the other one wins.
fn push_field(ctx: &mut Context<'_>, record: FieldRecord) {
    let definition = ctx.subgraphs.walk(record.parent_definition_id);

    let Some(existing) = definition.find_field(record.name) else {
        ctx.subgraphs.push_field(record);
        return;
    };

    let existing_id: FieldId = existing.id;
    let existing_is_external = existing.directives().has(Markers::EXTERNAL);
    let new_is_external = ctx.subgraphs[record.directives].has(Markers::EXTERNAL);

    match (existing_is_external, new_is_external) {
        (true, false) => ctx.subgraphs.replace_field(existing_id, record),
        (false, true) | (true, true) => (),
        (false, false) => {
            let kind = definition.kind();
            let type_name = definition.name().to_owned();
            let field_name = ctx.subgraphs[record.name].to_owned();

            ctx.push_error(SubgraphError::DuplicateFieldDefinition {
                kind,
                type_name,
                field_name,
            });
        }
    }
}

/// Intern the type of a field or argument, with root type names replaced by their default name.
fn intern_field_type(ctx: &mut Context<'_>, field_type: ast::Type<'_>, coordinate: &str) -> Option<FieldType> {
    let wrappers: Vec<WrappingType> = field_type.wrappers().collect();

    if wrappers.iter().filter(|wrapper| matches!(wrapper, WrappingType::List)).count() > MAX_LIST_NESTING {
        ctx.push_error(SubgraphError::MaximumTypeNestingExceeded {
            coordinate: coordinate.to_owned(),
        });
        return None;
    }

    // Wrappers are listed from the outermost in.
    let mut wrappers = wrappers.into_iter().rev().peekable();

    let mut wrapping = if wrappers.next_if(|w| matches!(w, WrappingType::NonNull)).is_some() {
        Wrapping::default().non_null()
    } else {
        Wrapping::default()
    };

    while let Some(next) = wrappers.next() {
        debug_assert_eq!(next, WrappingType::List, "double non-null wrapping type not possible");

        wrapping = if wrappers.next_if(|w| matches!(w, WrappingType::NonNull)).is_some() {
            wrapping.list_non_null()
        } else {
            wrapping.list()
        }
    }

    let name = ctx.root_types.rename(field_type.name());
    let name = ctx.subgraphs.strings.intern(name);

    Some(FieldType { name, wrapping })
}
