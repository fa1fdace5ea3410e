use super::*;
use std::fmt;

/// The kind of a GraphQL type definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum DefinitionKind {
    Object,
    Interface,
    InputObject,
    Enum,
    Union,
    Scalar,
}

impl DefinitionKind {
    pub(crate) fn has_output_fields(self) -> bool {
        matches!(self, DefinitionKind::Object | DefinitionKind::Interface)
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DefinitionKind::Object => "object",
            DefinitionKind::Interface => "interface",
            DefinitionKind::InputObject => "input object",
            DefinitionKind::Enum => "enum",
            DefinitionKind::Union => "union",
            DefinitionKind::Scalar => "scalar",
        })
    }
}

/// A type definition in a subgraph. Its base definition and all its extensions are folded into
/// one record, each of them contributing a block.
pub(crate) struct DefinitionRecord {
    pub(crate) subgraph_id: SubgraphId,
    pub(crate) name: StringId,
    pub(crate) kind: DefinitionKind,
    pub(crate) description: Option<StringId>,
    /// The base definition and the extensions, in declaration order.
    pub(crate) blocks: Vec<BlockId>,
    /// Fields of all blocks, in declaration order.
    pub(crate) fields: Vec<FieldId>,
    pub(crate) keys: Vec<KeyId>,
    pub(crate) implements_interfaces: Vec<StringId>,
    pub(crate) union_members: Vec<StringId>,
    pub(crate) enum_values: Vec<EnumValueRecord>,
}

/// One `type Foo { .. }` or `extend type Foo { .. }` block.
pub(crate) struct BlockRecord {
    pub(crate) is_extension: bool,
    pub(crate) directives: DirectiveSiteId,
}

pub(crate) struct EnumValueRecord {
    pub(crate) name: StringId,
    pub(crate) description: Option<StringId>,
    pub(crate) directives: DirectiveSiteId,
}

impl Subgraphs {
    pub(crate) fn push_definition(
        &mut self,
        subgraph_id: SubgraphId,
        name: &str,
        kind: DefinitionKind,
        description: Option<StringId>,
    ) -> DefinitionId {
        let name = self.strings.intern(name);
        let definition = DefinitionRecord {
            subgraph_id,
            name,
            kind,
            description,
            blocks: Vec::new(),
            fields: Vec::new(),
            keys: Vec::new(),
            implements_interfaces: Vec::new(),
            union_members: Vec::new(),
            enum_values: Vec::new(),
        };

        let id = DefinitionId::from(self.definitions.len());
        self.definitions.push(definition);
        self.definitions_by_name.insert((subgraph_id, name), id);
        id
    }

    pub(crate) fn push_block(&mut self, definition_id: DefinitionId, is_extension: bool) -> BlockId {
        let directives = self.new_directive_site();
        let id = BlockId::from(self.blocks.len());

        self.blocks.push(BlockRecord {
            is_extension,
            directives,
        });
        self[definition_id].blocks.push(id);

        id
    }

    pub(crate) fn definition_by_name_id(&self, subgraph_id: SubgraphId, name: StringId) -> Option<DefinitionId> {
        self.definitions_by_name.get(&(subgraph_id, name)).copied()
    }

    pub(crate) fn iter_definitions(&self) -> impl ExactSizeIterator<Item = DefinitionWalker<'_>> {
        (0..self.definitions.len()).map(|idx| self.walk(DefinitionId::from(idx)))
    }
}

pub(crate) type DefinitionWalker<'a> = Walker<'a, DefinitionId>;

impl<'a> DefinitionWalker<'a> {
    pub(crate) fn record(self) -> &'a DefinitionRecord {
        &self.subgraphs[self.id]
    }

    pub(crate) fn name(self) -> &'a str {
        &self.subgraphs[self.record().name]
    }

    pub(crate) fn name_id(self) -> StringId {
        self.record().name
    }

    pub(crate) fn kind(self) -> DefinitionKind {
        self.record().kind
    }

    pub(crate) fn subgraph(self) -> SubgraphWalker<'a> {
        self.walk(self.record().subgraph_id)
    }

    pub(crate) fn description(self) -> Option<&'a str> {
        self.record().description.map(|id| &self.subgraphs[id])
    }

    pub(crate) fn blocks(self) -> impl Iterator<Item = View<'a, BlockId, BlockRecord>> {
        let subgraphs = self.subgraphs;
        self.record().blocks.iter().map(move |id| subgraphs.at(*id))
    }

    /// Has this definition a base block, or is it only extended in this subgraph?
    pub(crate) fn has_base_block(self) -> bool {
        self.blocks().any(|block| !block.is_extension)
    }

    /// The directives on all blocks of this definition.
    pub(crate) fn directives(self) -> impl Iterator<Item = &'a DirectiveSiteRecord> {
        let subgraphs = self.subgraphs;
        self.blocks().map(move |block| &subgraphs[block.directives])
    }

    /// The union of the markers of all blocks.
    pub(crate) fn markers(self) -> Markers {
        self.directives().fold(Markers::empty(), |acc, site| acc | site.markers)
    }

    pub(crate) fn is_interface_object(self) -> bool {
        self.kind() == DefinitionKind::Object && self.markers().contains(Markers::INTERFACE_OBJECT)
    }

    pub(crate) fn is_entity(self) -> bool {
        !self.record().keys.is_empty()
    }

    pub(crate) fn is_root_type(self) -> bool {
        self.subgraph().is_root_type(self.id)
    }

    pub(crate) fn keys(self) -> impl Iterator<Item = KeyWalker<'a>> {
        let subgraphs = self.subgraphs;
        self.record().keys.iter().map(move |id| subgraphs.walk(*id))
    }

    /// At least one key allows the router to resolve this entity in this subgraph.
    pub(crate) fn has_resolvable_key(self) -> bool {
        self.keys().any(|key| key.view().resolvable)
    }

    pub(crate) fn fields(self) -> impl Iterator<Item = FieldWalker<'a>> {
        let subgraphs = self.subgraphs;
        self.record().fields.iter().map(move |id| subgraphs.walk(*id))
    }

    pub(crate) fn find_field(self, name: StringId) -> Option<FieldWalker<'a>> {
        self.fields().find(|field| field.name_id() == name)
    }

    pub(crate) fn implements_interfaces(self) -> impl Iterator<Item = &'a str> {
        let subgraphs = self.subgraphs;
        self.record()
            .implements_interfaces
            .iter()
            .map(move |id| &subgraphs[*id])
    }

    pub(crate) fn implements_interface(self, interface_name: StringId) -> bool {
        self.record().implements_interfaces.contains(&interface_name)
    }
}
