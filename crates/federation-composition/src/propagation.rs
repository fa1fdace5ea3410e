//! Scoped inheritance of type-level markers onto fields.
//!
//! A marker on `type Foo @marker { .. }`, or on one `extend type Foo @marker { .. }` block,
//! applies to the fields declared in that block only, never to fields of sibling blocks. A marker
//! on the field itself always applies.

use crate::subgraphs::{BlockId, DefinitionKind, DefinitionWalker, FieldId, Markers, StringId, SubgraphId, Subgraphs};
use std::collections::HashMap;

/// The markers of each block of each object type of a subgraph.
pub(crate) struct ScopedMarkers {
    scopes: HashMap<(StringId, BlockId), Markers>,
}

impl ScopedMarkers {
    pub(crate) fn for_subgraph(subgraphs: &Subgraphs, subgraph_id: SubgraphId) -> Self {
        let mut scopes = HashMap::new();

        for definition in subgraphs.walk(subgraph_id).definitions() {
            if definition.kind() != DefinitionKind::Object {
                continue;
            }

            for block in definition.blocks() {
                let markers = subgraphs[block.directives].markers & Markers::PROPAGATED;

                if !markers.is_empty() {
                    scopes.insert((definition.name_id(), block.id), markers);
                }
            }
        }

        ScopedMarkers { scopes }
    }

    pub(crate) fn lookup(&self, type_name: StringId, block_id: BlockId) -> Markers {
        self.scopes.get(&(type_name, block_id)).copied().unwrap_or_default()
    }

    /// The effective markers of a field: its own, then whatever its declaring block carries.
    pub(crate) fn resolve(&self, type_name: StringId, block_id: BlockId, own: Markers) -> Markers {
        own | self.lookup(type_name, block_id)
    }
}

/// Write the effective markers of every field of the subgraph.
pub(crate) fn propagate_markers(subgraphs: &mut Subgraphs, subgraph_id: SubgraphId) {
    let scoped_markers = ScopedMarkers::for_subgraph(subgraphs, subgraph_id);

    let resolved: Vec<(FieldId, Markers)> = subgraphs
        .walk(subgraph_id)
        .definitions()
        .flat_map(|definition| definition.fields())
        .map(|field| {
            let definition = field.parent_definition();
            let markers = scoped_markers.resolve(
                definition.name_id(),
                field.record().block_id,
                field.directives().markers,
            );

            (field.id, markers)
        })
        .collect();

    for (field_id, markers) in resolved {
        subgraphs[field_id].markers = markers;
    }
}

/// The fields of a definition carrying a marker, in declaration order.
pub(crate) fn marked_field_names(definition: DefinitionWalker<'_>, marker: Markers) -> Vec<String> {
    definition
        .fields()
        .filter(|field| field.record().markers.contains(marker))
        .map(|field| field.name().to_owned())
        .collect()
}
