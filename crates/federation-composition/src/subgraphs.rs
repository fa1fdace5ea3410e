mod definitions;
mod directives;
mod field_types;
mod fields;
mod keys;
mod strings;
mod view;
mod walker;

pub(crate) use self::{
    definitions::*, directives::*, field_types::*, fields::*, keys::*, strings::*, view::View, walker::Walker,
};
pub use definitions::DefinitionKind;

use crate::{
    diagnostics::Diagnostics,
    error::{CompositionError, CompositionWarning, SubgraphError},
};
use std::collections::BTreeMap;

/// A set of subgraphs to be composed.
///
/// Subgraphs are composed in the order they were ingested. That order determines the order of
/// diagnostics and "first seen wins" tie-breaks, but not the contents of the federated graph.
#[derive(Default)]
pub struct Subgraphs {
    pub(crate) strings: Strings,
    subgraphs: Vec<SubgraphRecord>,
    definitions: Vec<DefinitionRecord>,
    blocks: Vec<BlockRecord>,
    fields: Vec<FieldRecord>,
    keys: Vec<KeyRecord>,
    directive_sites: Vec<DirectiveSiteRecord>,

    // Secondary indexes.
    definitions_by_name: BTreeMap<(SubgraphId, StringId), DefinitionId>,

    /// Errors found while normalizing each subgraph. They are reported when composing.
    ingestion_diagnostics: Vec<(SubgraphId, SubgraphError)>,
    ingestion_warnings: Vec<CompositionWarning>,
}

impl Subgraphs {
    /// Add a subgraph to compose.
    pub fn ingest(&mut self, document: &cynic_parser::TypeSystemDocument, name: &str, url: &str) {
        crate::ingest_subgraph::ingest_subgraph(document, name, url, self);
    }

    /// Add a subgraph to compose, from its GraphQL SDL.
    ///
    /// A document that fails to parse is still registered: the syntax error is reported
    /// together with every other diagnostic when composing.
    pub fn ingest_str(&mut self, sdl: &str, name: &str, url: &str) {
        match cynic_parser::parse_type_system_document(sdl) {
            Ok(document) => self.ingest(&document, name, url),
            Err(error) => {
                tracing::debug!(subgraph = name, "subgraph failed to parse");
                let subgraph_id = self.push_subgraph(name, url);
                self[subgraph_id].is_malformed = true;
                self.push_ingestion_diagnostic(subgraph_id, SubgraphError::InvalidSyntax(error.to_string()));
            }
        }
    }

    /// The number of ingested subgraphs.
    pub fn len(&self) -> usize {
        self.subgraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subgraphs.is_empty()
    }

    /// Iterate over the names of the ingested subgraphs, in ingestion order.
    pub fn iter_subgraph_names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.subgraphs.iter().map(|subgraph| &self[subgraph.name])
    }

    pub(crate) fn at<Id, Record>(&self, id: Id) -> View<'_, Id, Record>
    where
        Id: Copy,
        Subgraphs: std::ops::Index<Id, Output = Record>,
    {
        View { id, record: &self[id] }
    }

    pub(crate) fn walk<Id>(&self, id: Id) -> Walker<'_, Id> {
        Walker { id, subgraphs: self }
    }

    pub(crate) fn iter_subgraphs(&self) -> impl ExactSizeIterator<Item = Walker<'_, SubgraphId>> {
        (0..self.subgraphs.len()).map(|idx| self.walk(SubgraphId::from(idx)))
    }

    pub(crate) fn push_subgraph(&mut self, name: &str, url: &str) -> SubgraphId {
        let subgraph = SubgraphRecord {
            name: self.strings.intern(name),
            url: self.strings.intern(url),
            query_type: None,
            mutation_type: None,
            subscription_type: None,
            is_malformed: false,
        };

        let id = SubgraphId::from(self.subgraphs.len());
        self.subgraphs.push(subgraph);
        id
    }

    pub(crate) fn push_ingestion_diagnostic(&mut self, subgraph_id: SubgraphId, error: SubgraphError) {
        self.ingestion_diagnostics.push((subgraph_id, error));
    }

    pub(crate) fn push_ingestion_warning(&mut self, warning: CompositionWarning) {
        self.ingestion_warnings.push(warning);
    }

    pub(crate) fn emit_ingestion_diagnostics(&self, diagnostics: &mut Diagnostics) {
        for (subgraph_id, error) in &self.ingestion_diagnostics {
            diagnostics.push_fatal(CompositionError::Subgraph {
                subgraph_name: self.walk(*subgraph_id).name().to_owned(),
                error: error.clone(),
            });
        }

        for warning in &self.ingestion_warnings {
            diagnostics.push_warning(warning.clone());
        }
    }

    pub(crate) fn new_directive_site(&mut self) -> DirectiveSiteId {
        let id = DirectiveSiteId::from(self.directive_sites.len());
        self.directive_sites.push(DirectiveSiteRecord::default());
        id
    }
}

pub(crate) struct SubgraphRecord {
    pub(crate) name: StringId,
    pub(crate) url: StringId,
    pub(crate) query_type: Option<DefinitionId>,
    pub(crate) mutation_type: Option<DefinitionId>,
    pub(crate) subscription_type: Option<DefinitionId>,
    /// The document could not be parsed. Nothing else was ingested.
    pub(crate) is_malformed: bool,
}

pub(crate) type SubgraphWalker<'a> = Walker<'a, SubgraphId>;

impl<'a> SubgraphWalker<'a> {
    fn record(self) -> &'a SubgraphRecord {
        &self.subgraphs[self.id]
    }

    pub(crate) fn name(self) -> &'a str {
        &self.subgraphs[self.record().name]
    }

    pub(crate) fn url(self) -> &'a str {
        &self.subgraphs[self.record().url]
    }

    pub(crate) fn is_root_type(self, definition_id: DefinitionId) -> bool {
        let record = self.record();
        [record.query_type, record.mutation_type, record.subscription_type].contains(&Some(definition_id))
    }

    /// The definitions of this subgraph, in declaration order.
    pub(crate) fn definitions(self) -> impl Iterator<Item = DefinitionWalker<'a>> {
        let subgraphs = self.subgraphs;
        let subgraph_id = self.id;
        let start = subgraphs
            .definitions
            .partition_point(|definition| definition.subgraph_id < subgraph_id);

        subgraphs.definitions[start..]
            .iter()
            .take_while(move |definition| definition.subgraph_id == subgraph_id)
            .enumerate()
            .map(move |(idx, _)| subgraphs.walk(DefinitionId::from(start + idx)))
    }

    pub(crate) fn definition_by_name(self, name: &str) -> Option<DefinitionWalker<'a>> {
        let name = self.subgraphs.strings.lookup(name)?;
        self.subgraphs
            .definitions_by_name
            .get(&(self.id, name))
            .map(|id| self.walk(*id))
    }
}

macro_rules! id_newtypes {
    ($($storage:ident [ $name:ident ] -> $out:ident,)*) => {
        $(
            #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
            pub(crate) struct $name(usize);

            impl From<usize> for $name {
                fn from(value: usize) -> Self {
                    $name(value)
                }
            }

            impl From<$name> for usize {
                fn from(value: $name) -> usize {
                    value.0
                }
            }

            impl std::ops::Index<$name> for Subgraphs {
                type Output = $out;

                fn index(&self, index: $name) -> &$out {
                    &self.$storage[index.0]
                }
            }

            impl std::ops::IndexMut<$name> for Subgraphs {
                fn index_mut(&mut self, index: $name) -> &mut $out {
                    &mut self.$storage[index.0]
                }
            }
        )*
    };
}

id_newtypes! {
    subgraphs[SubgraphId] -> SubgraphRecord,
    definitions[DefinitionId] -> DefinitionRecord,
    blocks[BlockId] -> BlockRecord,
    fields[FieldId] -> FieldRecord,
    keys[KeyId] -> KeyRecord,
    directive_sites[DirectiveSiteId] -> DirectiveSiteRecord,
}
