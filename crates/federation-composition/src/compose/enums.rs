use super::{Context, directives::compose_directives, first_description, objects::join_types};
use crate::{
    CompositionError, DefinitionKind,
    composition_ir::{DefinitionIr, EnumValueIr},
    subgraphs::{DefinitionWalker, EnumValueRecord, StringId, Subgraphs},
};
use indexmap::IndexMap;
use std::collections::{BTreeSet, HashMap};

/// Where each named type is used, across all subgraphs.
#[derive(Default)]
pub(super) struct EnumUsages {
    usages: HashMap<StringId, EnumUsage>,
}

#[derive(Default, Clone, Copy)]
struct EnumUsage {
    input: bool,
    output: bool,
}

impl EnumUsages {
    pub(super) fn collect(subgraphs: &Subgraphs) -> Self {
        let mut usages: HashMap<StringId, EnumUsage> = HashMap::new();

        for definition in subgraphs.iter_definitions() {
            let is_input_object = definition.kind() == DefinitionKind::InputObject;

            for field in definition.fields() {
                let usage = usages.entry(field.r#type().name).or_default();

                if is_input_object {
                    usage.input = true;
                } else {
                    usage.output = true;
                }

                for argument in field.arguments() {
                    usages.entry(argument.r#type.name).or_default().input = true;
                }
            }
        }

        EnumUsages { usages }
    }

    fn get(&self, name: StringId) -> EnumUsage {
        self.usages.get(&name).copied().unwrap_or_default()
    }
}

/// Output-only enums take the union of the values of all subgraphs, input-only enums the
/// intersection. Enums used in both positions must be identical everywhere.
pub(super) fn merge_enum_definitions(
    ctx: &mut Context<'_>,
    definitions: &[DefinitionWalker<'_>],
    usages: &EnumUsages,
) {
    let Some(first) = definitions.first() else {
        return;
    };

    let usage = usages.get(first.name_id());

    let mut values: IndexMap<StringId, Vec<&EnumValueRecord>> = IndexMap::new();

    for value in definitions.iter().flat_map(|definition| &definition.record().enum_values) {
        values.entry(value.name).or_default().push(value);
    }

    if usage.input && usage.output {
        let value_sets: Vec<BTreeSet<StringId>> = definitions
            .iter()
            .map(|definition| definition.record().enum_values.iter().map(|value| value.name).collect())
            .collect();

        if value_sets.windows(2).any(|pair| pair[0] != pair[1]) {
            ctx.push_error(CompositionError::IncompatibleSharedEnum {
                enum_name: first.name().to_owned(),
            });
            return;
        }
    } else if usage.input {
        values.retain(|_, occurrences| occurrences.len() == definitions.len());
    }

    let mut r#enum = DefinitionIr::new(first.name_id(), DefinitionKind::Enum);
    r#enum.description = first_description(definitions);
    r#enum.directives = compose_directives(definitions.iter().flat_map(|definition| definition.directives()));
    r#enum.join_types = join_types(definitions);
    r#enum.enum_values = values
        .into_iter()
        .map(|(name, occurrences)| EnumValueIr {
            name,
            description: occurrences.iter().find_map(|value| value.description),
            directives: compose_directives(occurrences.iter().map(|value| &ctx.subgraphs[value.directives])),
        })
        .collect();

    ctx.insert_definition(r#enum);
}
