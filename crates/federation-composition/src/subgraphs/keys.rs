use super::*;

/// The `fields` argument of `@key`, `@provides` and `@requires`, e.g. `"id organization { id }"`.
pub(crate) type FieldSet = Vec<Selection>;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Selection {
    Field {
        field: StringId,
        subselection: Vec<Selection>,
    },
    InlineFragment {
        on: StringId,
        subselection: Vec<Selection>,
    },
}

impl Selection {
    pub(crate) fn field_name(&self) -> Option<StringId> {
        match self {
            Selection::Field { field, .. } => Some(*field),
            Selection::InlineFragment { .. } => None,
        }
    }
}

/// A `@key` on an entity.
pub(crate) struct KeyRecord {
    pub(crate) selection_set: FieldSet,
    /// `@key(fields: "id", resolvable: false)`
    pub(crate) resolvable: bool,
}

impl Subgraphs {
    pub(crate) fn push_key(&mut self, definition_id: DefinitionId, selection_set: FieldSet, resolvable: bool) -> KeyId {
        let id = KeyId::from(self.keys.len());

        self.keys.push(KeyRecord {
            selection_set,
            resolvable,
        });
        self[definition_id].keys.push(id);

        id
    }

    /// Render a field set in its normalized form: one space between selections, nested
    /// selection sets in braces.
    pub(crate) fn render_field_set(&self, field_set: &[Selection]) -> String {
        let mut out = String::new();
        self.write_selections(field_set, &mut out);
        out
    }

    fn write_selections(&self, selections: &[Selection], out: &mut String) {
        for (idx, selection) in selections.iter().enumerate() {
            if idx > 0 {
                out.push(' ');
            }

            let subselection = match selection {
                Selection::Field { field, subselection } => {
                    out.push_str(&self[*field]);
                    subselection
                }
                Selection::InlineFragment { on, subselection } => {
                    out.push_str("... on ");
                    out.push_str(&self[*on]);
                    subselection
                }
            };

            if !subselection.is_empty() {
                out.push_str(" { ");
                self.write_selections(subselection, out);
                out.push_str(" }");
            }
        }
    }
}

pub(crate) type KeyWalker<'a> = Walker<'a, KeyId>;

impl KeyWalker<'_> {
    pub(crate) fn render_selection_set(self) -> String {
        self.subgraphs.render_field_set(&self.view().selection_set)
    }
}
