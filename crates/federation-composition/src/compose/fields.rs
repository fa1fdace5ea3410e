use super::{Context, directives::compose_directives};
use crate::{
    CompositionError,
    composition_ir::InputValueIr,
    subgraphs::{ArgumentRecord, FieldType, FieldTypeComparison, FieldWalker, StringId, SubgraphId},
};
use indexmap::IndexMap;
use itertools::Itertools;

#[derive(Clone, Copy, PartialEq, Eq)]
pub(super) enum Position {
    Output,
    /// Arguments and input object fields.
    Input,
}

/// Merge the types of one field, argument or input field across the subgraphs defining it.
/// `None` when they are incompatible: the error is already reported.
pub(super) fn compose_types(
    ctx: &mut Context<'_>,
    occurrences: &[(SubgraphId, FieldType)],
    position: Position,
    coordinate: &str,
) -> Option<FieldType> {
    let ((first_subgraph, first_type), rest) = occurrences.split_first()?;
    let exact = ctx.options.exact_field_types();
    let mut merged = *first_type;

    for (subgraph_id, field_type) in rest {
        let comparison = match position {
            Position::Output => merged.compose_for_output(*field_type, exact),
            Position::Input => merged.compose_for_input(*field_type, exact),
        };

        let different_named_types = match comparison {
            FieldTypeComparison::Compatible(field_type) => {
                merged = field_type;
                continue;
            }
            FieldTypeComparison::DifferentNamedTypes => true,
            FieldTypeComparison::Incompatible => false,
        };

        let coordinate = coordinate.to_owned();
        let first_type = ctx.subgraphs.display_field_type(*first_type);
        let first_subgraph = ctx.subgraphs.walk(*first_subgraph).name().to_owned();
        let second_type = ctx.subgraphs.display_field_type(*field_type);
        let second_subgraph = ctx.subgraphs.walk(*subgraph_id).name().to_owned();

        ctx.push_error(if different_named_types {
            CompositionError::IncompatibleFieldNamedTypes {
                coordinate,
                first_type,
                first_subgraph,
                second_type,
                second_subgraph,
            }
        } else {
            CompositionError::IncompatibleFieldTypes {
                coordinate,
                first_type,
                first_subgraph,
                second_type,
                second_subgraph,
            }
        });

        return None;
    }

    Some(merged)
}

/// An argument or input field, in one subgraph.
pub(super) struct InputValueOccurrence<'a> {
    pub(super) subgraph_id: SubgraphId,
    pub(super) name: StringId,
    pub(super) r#type: FieldType,
    pub(super) description: Option<StringId>,
    pub(super) default_value: Option<&'a crate::subgraphs::Value>,
    pub(super) directives: &'a crate::subgraphs::DirectiveSiteRecord,
}

impl InputValueOccurrence<'_> {
    /// Required, and without a default to fall back to.
    fn is_required(&self) -> bool {
        self.r#type.wrapping.is_non_null() && self.default_value.is_none()
    }
}

/// Keep the input values defined in every one of `subgraphs`, in first-seen order. A required
/// value missing from some subgraphs is an error.
pub(super) fn compose_input_values(
    ctx: &mut Context<'_>,
    what: &'static str,
    subgraphs: &[SubgraphId],
    occurrences: Vec<InputValueOccurrence<'_>>,
    coordinate: impl Fn(&str) -> String,
) -> Vec<InputValueIr> {
    let groups: IndexMap<StringId, Vec<InputValueOccurrence<'_>>> =
        occurrences.into_iter().fold(IndexMap::new(), |mut groups, occurrence| {
            groups.entry(occurrence.name).or_insert_with(Vec::new).push(occurrence);
            groups
        });

    let mut input_values = Vec::with_capacity(groups.len());

    for (name, occurrences) in groups {
        let coordinate = coordinate(&ctx.subgraphs[name]);
        let missing_from: Vec<String> = subgraphs
            .iter()
            .filter(|subgraph_id| {
                !occurrences
                    .iter()
                    .any(|occurrence| occurrence.subgraph_id == **subgraph_id)
            })
            .map(|subgraph_id| ctx.subgraphs.walk(*subgraph_id).name().to_owned())
            .unique()
            .collect();

        if !missing_from.is_empty() {
            if occurrences.iter().any(InputValueOccurrence::is_required) {
                ctx.push_error(CompositionError::InvalidRequiredInputValue {
                    what,
                    coordinate,
                    missing_from,
                });
            }

            continue;
        }

        let types: Vec<(SubgraphId, FieldType)> = occurrences
            .iter()
            .map(|occurrence| (occurrence.subgraph_id, occurrence.r#type))
            .collect();

        let Some(r#type) = compose_types(ctx, &types, Position::Input, &coordinate) else {
            continue;
        };

        input_values.push(InputValueIr {
            name,
            r#type,
            description: occurrences.iter().find_map(|occurrence| occurrence.description),
            default_value: occurrences
                .iter()
                .find_map(|occurrence| occurrence.default_value.cloned()),
            directives: compose_directives(occurrences.iter().map(|occurrence| occurrence.directives)),
        });
    }

    input_values
}

/// The arguments of one field across the subgraphs defining it.
pub(super) fn compose_arguments(ctx: &mut Context<'_>, fields: &[FieldWalker<'_>], coordinate: &str) -> Vec<InputValueIr> {
    let subgraphs: Vec<SubgraphId> = fields
        .iter()
        .map(|field| field.parent_definition().subgraph().id)
        .collect();

    let occurrences = fields
        .iter()
        .flat_map(|field| {
            let subgraph_id = field.parent_definition().subgraph().id;
            field
                .arguments()
                .iter()
                .map(move |argument| argument_occurrence(field.subgraphs, subgraph_id, argument))
        })
        .collect();

    compose_input_values(ctx, "argument", &subgraphs, occurrences, |argument_name| {
        format!("{coordinate}({argument_name}:)")
    })
}

fn argument_occurrence<'a>(
    subgraphs: &'a crate::Subgraphs,
    subgraph_id: SubgraphId,
    argument: &'a ArgumentRecord,
) -> InputValueOccurrence<'a> {
    InputValueOccurrence {
        subgraph_id,
        name: argument.name,
        r#type: argument.r#type,
        description: argument.description,
        default_value: argument.default_value.as_ref(),
        directives: &subgraphs[argument.directives],
    }
}
