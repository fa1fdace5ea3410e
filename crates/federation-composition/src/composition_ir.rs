//! The intermediate representation of the federated graph. It is written by [compose](crate::compose)
//! and consumed once by [emit_federated_graph](crate::emit_federated_graph). Everything refers back
//! into the [Subgraphs](crate::Subgraphs) arena.

use crate::{
    DefinitionKind,
    subgraphs::{FieldId, FieldType, KeyId, StringId, SubgraphId, Value},
};
use indexmap::IndexMap;

#[derive(Default)]
pub(crate) struct CompositionIr {
    /// In the order they were first seen.
    pub(crate) definitions: IndexMap<StringId, DefinitionIr>,
}

pub(crate) struct DefinitionIr {
    pub(crate) name: StringId,
    pub(crate) kind: DefinitionKind,
    pub(crate) description: Option<StringId>,
    pub(crate) directives: DirectivesIr,
    pub(crate) join_types: Vec<JoinTypeIr>,
    /// Objects and interfaces.
    pub(crate) join_implements: Vec<(SubgraphId, StringId)>,
    /// Objects and interfaces.
    pub(crate) fields: IndexMap<StringId, FieldIr>,
    pub(crate) input_fields: Vec<InputValueIr>,
    pub(crate) join_union_members: Vec<(SubgraphId, StringId)>,
    pub(crate) enum_values: Vec<EnumValueIr>,
}

impl DefinitionIr {
    pub(crate) fn new(name: StringId, kind: DefinitionKind) -> Self {
        DefinitionIr {
            name,
            kind,
            description: None,
            directives: DirectivesIr::default(),
            join_types: Vec::new(),
            join_implements: Vec::new(),
            fields: IndexMap::new(),
            input_fields: Vec::new(),
            join_union_members: Vec::new(),
            enum_values: Vec::new(),
        }
    }
}

pub(crate) struct JoinTypeIr {
    pub(crate) subgraph_id: SubgraphId,
    pub(crate) key: Option<KeyId>,
    pub(crate) resolvable: bool,
    pub(crate) is_interface_object: bool,
}

pub(crate) struct FieldIr {
    pub(crate) name: StringId,
    /// The merged type.
    pub(crate) r#type: FieldType,
    pub(crate) description: Option<StringId>,
    pub(crate) arguments: Vec<InputValueIr>,
    /// The subgraph fields this field resolves from. Their type, `@requires`, `@provides`,
    /// `@external` and `@override` end up in the join directives.
    pub(crate) join_fields: Vec<(SubgraphId, FieldId)>,
    pub(crate) directives: DirectivesIr,
}

/// An argument or an input object field.
pub(crate) struct InputValueIr {
    pub(crate) name: StringId,
    pub(crate) r#type: FieldType,
    pub(crate) description: Option<StringId>,
    pub(crate) default_value: Option<Value>,
    pub(crate) directives: DirectivesIr,
}

pub(crate) struct EnumValueIr {
    pub(crate) name: StringId,
    pub(crate) description: Option<StringId>,
    pub(crate) directives: DirectivesIr,
}

/// The directives of all subgraphs on the same element, merged.
#[derive(Default, Clone)]
pub(crate) struct DirectivesIr {
    /// `Some(None)` is a `@deprecated` without reason.
    pub(crate) deprecated: Option<Option<StringId>>,
    pub(crate) inaccessible: bool,
    pub(crate) authenticated: bool,
    pub(crate) requires_scopes: Vec<Vec<StringId>>,
    pub(crate) tags: Vec<StringId>,
}
