use super::*;

/// A field in an object, interface or input object type.
pub(crate) struct FieldRecord {
    pub(crate) parent_definition_id: DefinitionId,
    /// The block (base definition or extension) the field was declared in.
    pub(crate) block_id: BlockId,
    pub(crate) name: StringId,
    /// ```ignore,graphql
    /// type MyObject {
    ///   id: ID!
    ///   nested: [Nested!]!
    ///           ^^^^^^^^^^
    /// }
    /// ```
    pub(crate) r#type: FieldType,
    pub(crate) description: Option<StringId>,
    pub(crate) directives: DirectiveSiteId,
    /// Only for output fields.
    pub(crate) arguments: Vec<ArgumentRecord>,
    /// Only for input fields.
    pub(crate) default_value: Option<Value>,
    /// The effective markers: the field's own, plus the ones propagated from its block. Written
    /// once the subgraph is fully ingested.
    pub(crate) markers: Markers,
}

/// An argument on an output field.
pub(crate) struct ArgumentRecord {
    /// ```graphql,ignore
    /// type Query {
    ///   findManyUser(filters: FindManyUserFilter!): [User!]!
    ///                ^^^^^^^
    /// }
    /// ```
    pub(crate) name: StringId,
    pub(crate) r#type: FieldType,
    pub(crate) description: Option<StringId>,
    pub(crate) directives: DirectiveSiteId,
    pub(crate) default_value: Option<Value>,
}

/// A constant GraphQL value, in a default value position.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(StringId),
    Boolean(bool),
    Enum(StringId),
    List(Vec<Value>),
    Object(Vec<(StringId, Value)>),
}

impl Subgraphs {
    pub(crate) fn push_field(&mut self, record: FieldRecord) -> FieldId {
        let id = FieldId::from(self.fields.len());
        let parent_definition_id = record.parent_definition_id;

        self.fields.push(record);
        self[parent_definition_id].fields.push(id);

        id
    }

    /// Replace a field declared earlier in the same definition, keeping its position.
    pub(crate) fn replace_field(&mut self, previous: FieldId, record: FieldRecord) {
        self[previous] = record;
    }
}

pub(crate) type FieldWalker<'a> = Walker<'a, FieldId>;

impl<'a> FieldWalker<'a> {
    pub(crate) fn record(self) -> &'a FieldRecord {
        &self.subgraphs[self.id]
    }

    pub(crate) fn name(self) -> &'a str {
        &self.subgraphs[self.record().name]
    }

    pub(crate) fn name_id(self) -> StringId {
        self.record().name
    }

    pub(crate) fn parent_definition(self) -> DefinitionWalker<'a> {
        self.walk(self.record().parent_definition_id)
    }

    pub(crate) fn r#type(self) -> FieldType {
        self.record().r#type
    }

    pub(crate) fn type_name(self) -> &'a str {
        &self.subgraphs[self.record().r#type.name]
    }

    pub(crate) fn description(self) -> Option<&'a str> {
        self.record().description.map(|id| &self.subgraphs[id])
    }

    pub(crate) fn directives(self) -> &'a DirectiveSiteRecord {
        &self.subgraphs[self.record().directives]
    }

    pub(crate) fn arguments(self) -> &'a [ArgumentRecord] {
        &self.record().arguments
    }

    pub(crate) fn is_external(self) -> bool {
        self.record().markers.contains(Markers::EXTERNAL)
    }

    pub(crate) fn is_shareable(self) -> bool {
        self.record().markers.contains(Markers::SHAREABLE)
    }

    /// Is this field part of one of the keys of its parent type?
    pub(crate) fn is_part_of_key(self) -> bool {
        let name = self.name_id();
        self.parent_definition()
            .keys()
            .any(|key| key.view().selection_set.iter().any(|selection| selection.field_name() == Some(name)))
    }

    /// `Type.field`
    pub(crate) fn coordinate(self) -> String {
        format!("{}.{}", self.parent_definition().name(), self.name())
    }
}
