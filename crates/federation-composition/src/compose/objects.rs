use super::{
    Context, directives::compose_directives, first_description,
    fields::{Position, compose_arguments, compose_types},
    overrides::Overrides,
};
use crate::{
    CompositionError, DefinitionKind, FieldShareability,
    composition_ir::{DefinitionIr, FieldIr, JoinTypeIr},
    subgraphs::{DefinitionWalker, FieldType, FieldWalker, StringId, SubgraphId},
};
use indexmap::IndexMap;

/// Merge objects, or interfaces together with the interface objects standing for them.
pub(super) fn merge_composite_definitions(
    ctx: &mut Context<'_>,
    kind: DefinitionKind,
    definitions: &[DefinitionWalker<'_>],
    overrides: &Overrides,
) {
    let Some(first) = definitions.first() else {
        return;
    };

    let mut definition = DefinitionIr::new(first.name_id(), kind);
    definition.description = first_description(definitions);
    definition.directives = compose_directives(definitions.iter().flat_map(|definition| definition.directives()));
    definition.join_types = join_types(definitions);
    definition.join_implements = definitions
        .iter()
        .flat_map(|definition| {
            let subgraph_id = definition.subgraph().id;
            definition
                .record()
                .implements_interfaces
                .iter()
                .map(move |interface| (subgraph_id, *interface))
        })
        .collect();

    let mut field_groups: IndexMap<StringId, Vec<FieldWalker<'_>>> = IndexMap::new();

    for field in definitions.iter().flat_map(|definition| definition.fields()) {
        field_groups.entry(field.name_id()).or_default().push(field);
    }

    let mut shareability_violations = Vec::new();

    for (field_name, fields) in &field_groups {
        let coordinate = format!("{}.{}", first.name(), &ctx.subgraphs[*field_name]);

        let types: Vec<(SubgraphId, FieldType)> = fields
            .iter()
            .map(|field| (field.parent_definition().subgraph().id, field.r#type()))
            .collect();

        let Some(r#type) = compose_types(ctx, &types, Position::Output, &coordinate) else {
            continue;
        };

        if kind == DefinitionKind::Object {
            shareability_violations.extend(check_shareability(fields, overrides));
        }

        let arguments = compose_arguments(ctx, fields, &coordinate);

        definition.fields.insert(
            *field_name,
            FieldIr {
                name: *field_name,
                r#type,
                description: fields.iter().find_map(|field| field.record().description),
                arguments,
                join_fields: fields
                    .iter()
                    .filter(|field| !overrides.is_overridden(**field))
                    .map(|field| (field.parent_definition().subgraph().id, field.id))
                    .collect(),
                directives: compose_directives(fields.iter().map(|field| field.directives())),
            },
        );
    }

    if !shareability_violations.is_empty() {
        ctx.push_error(CompositionError::InvalidFieldShareability {
            type_name: first.name().to_owned(),
            fields: shareability_violations,
        });
    }

    ctx.insert_definition(definition);
}

/// A field resolved by more than one subgraph must be shareable in all of them. External and
/// overridden instances do not resolve. Key fields are implicitly shareable.
fn check_shareability(fields: &[FieldWalker<'_>], overrides: &Overrides) -> Option<FieldShareability> {
    let resolving: Vec<FieldWalker<'_>> = fields
        .iter()
        .copied()
        .filter(|field| !field.is_external() && !overrides.is_overridden(*field))
        .collect();

    if resolving.len() < 2 {
        return None;
    }

    let (shareable, non_shareable): (Vec<FieldWalker<'_>>, Vec<FieldWalker<'_>>) = resolving
        .into_iter()
        .partition(|field| field.is_shareable() || field.is_part_of_key());

    let field_name = non_shareable.first()?.name().to_owned();

    let subgraph_names = |fields: Vec<FieldWalker<'_>>| -> Vec<String> {
        fields
            .into_iter()
            .map(|field| field.parent_definition().subgraph().name().to_owned())
            .collect()
    };

    Some(FieldShareability {
        field_name,
        shareable_in: subgraph_names(shareable),
        non_shareable_in: subgraph_names(non_shareable),
    })
}

/// One join type per key, or a keyless one, for each subgraph defining the type.
pub(super) fn join_types(definitions: &[DefinitionWalker<'_>]) -> Vec<JoinTypeIr> {
    let mut join_types = Vec::new();

    for definition in definitions {
        let subgraph_id = definition.subgraph().id;
        let is_interface_object = definition.is_interface_object();

        if !definition.is_entity() {
            join_types.push(JoinTypeIr {
                subgraph_id,
                key: None,
                resolvable: true,
                is_interface_object,
            });
            continue;
        }

        join_types.extend(definition.keys().map(|key| JoinTypeIr {
            subgraph_id,
            key: Some(key.id),
            resolvable: key.view().resolvable,
            is_interface_object,
        }));
    }

    join_types
}
