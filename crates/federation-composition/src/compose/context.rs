use crate::{
    CompositionError, CompositionOptions, Diagnostics,
    composition_ir::{CompositionIr, DefinitionIr, FieldIr},
    subgraphs::{StringId, Subgraphs},
};

/// Context for [`compose_subgraphs`](crate::compose::compose_subgraphs).
pub(crate) struct Context<'a> {
    pub(crate) subgraphs: &'a Subgraphs,
    pub(crate) diagnostics: &'a mut Diagnostics,
    pub(crate) options: &'a CompositionOptions,
    /// This should stay private, composition IR should remain write-only during composition: the
    /// subgraphs are the source of truth.
    ir: CompositionIr,
}

impl<'a> Context<'a> {
    pub(crate) fn new(
        subgraphs: &'a Subgraphs,
        diagnostics: &'a mut Diagnostics,
        options: &'a CompositionOptions,
    ) -> Self {
        Context {
            subgraphs,
            diagnostics,
            options,
            ir: CompositionIr::default(),
        }
    }

    pub(crate) fn into_ir(self) -> CompositionIr {
        self.ir
    }

    pub(crate) fn push_error(&mut self, error: CompositionError) {
        self.diagnostics.push_fatal(error);
    }

    pub(crate) fn insert_definition(&mut self, definition: DefinitionIr) {
        self.ir.definitions.insert(definition.name, definition);
    }

    /// Add a field copied from an interface object to the object `type_name`. A field another
    /// interface object already contributed only gains the new join field.
    pub(crate) fn insert_interface_object_field(&mut self, type_name: StringId, field: FieldIr) {
        let Some(definition) = self.ir.definitions.get_mut(&type_name) else {
            return;
        };

        match definition.fields.get_mut(&field.name) {
            Some(existing) => existing.join_fields.extend(field.join_fields),
            None => {
                definition.fields.insert(field.name, field);
            }
        }
    }

    /// Was the query root type merged, with at least one field?
    pub(crate) fn has_query_root_type(&self) -> bool {
        self.subgraphs
            .strings
            .lookup("Query")
            .and_then(|name| self.ir.definitions.get(&name))
            .is_some_and(|query| !query.fields.is_empty())
    }
}
