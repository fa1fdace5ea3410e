//! `@override(from: "subgraph")`: a subgraph takes over the resolution of a field from another.

use crate::{
    CompositionError, CompositionWarning, Diagnostics,
    subgraphs::{FieldWalker, StringId, SubgraphId, Subgraphs},
};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// The field instances that stop resolving in their subgraph because another subgraph took them
/// over.
#[derive(Default)]
pub(crate) struct Overrides {
    /// (source subgraph, parent type name, field name)
    overridden: BTreeSet<(SubgraphId, StringId, StringId)>,
}

impl Overrides {
    pub(crate) fn collect(subgraphs: &Subgraphs, diagnostics: &mut Diagnostics) -> Self {
        let mut overriding_fields: IndexMap<(StringId, StringId), Vec<(FieldWalker<'_>, &str)>> = IndexMap::new();

        for definition in subgraphs.iter_definitions() {
            if !definition.kind().has_output_fields() {
                continue;
            }

            for field in definition.fields() {
                let Some(r#override) = field.directives().r#override else {
                    continue;
                };

                let source = &subgraphs[r#override.from];

                if source == definition.subgraph().name() {
                    diagnostics.push_fatal(CompositionError::EquivalentSourceAndTargetOverride {
                        coordinate: field.coordinate(),
                        subgraph_name: source.to_owned(),
                    });
                    continue;
                }

                overriding_fields
                    .entry((definition.name_id(), field.name_id()))
                    .or_default()
                    .push((field, source));
            }
        }

        let mut overridden = BTreeSet::new();

        for ((type_name, field_name), fields) in overriding_fields {
            let [(field, source)] = fields.as_slice() else {
                diagnostics.push_fatal(CompositionError::DuplicateOverriddenField {
                    coordinate: format!("{}.{}", &subgraphs[type_name], &subgraphs[field_name]),
                    subgraphs: fields
                        .iter()
                        .map(|(field, _)| field.parent_definition().subgraph().name().to_owned())
                        .collect(),
                });
                continue;
            };

            match subgraphs.iter_subgraphs().find(|subgraph| subgraph.name() == *source) {
                Some(source) => {
                    overridden.insert((source.id, type_name, field_name));
                }
                None => diagnostics.push_warning(CompositionWarning::OverrideSourceNotFound {
                    subgraph_name: field.parent_definition().subgraph().name().to_owned(),
                    coordinate: field.coordinate(),
                    source_subgraph: (*source).to_owned(),
                }),
            }
        }

        Overrides { overridden }
    }

    pub(crate) fn is_overridden(&self, field: FieldWalker<'_>) -> bool {
        let definition = field.parent_definition();

        self.overridden
            .contains(&(definition.subgraph().id, definition.name_id(), field.name_id()))
    }
}
