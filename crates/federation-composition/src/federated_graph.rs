//! The output of a successful composition.

mod render_sdl;

pub use self::render_sdl::{render_api_sdl, render_federated_sdl};
pub use wrapping::{ListWrapping, Wrapping};

pub(crate) use self::render_sdl::{Description, INDENT, write_quoted};

use crate::DefinitionKind;
use std::fmt;

/// The composed schema of all subgraphs, with the federation metadata a router needs to plan
/// queries: which subgraph resolves which type and field.
#[derive(Debug, Clone, PartialEq)]
pub struct FederatedGraph {
    /// In composition order.
    pub subgraphs: Vec<Subgraph>,
    pub root_operation_types: RootOperationTypes,
    /// Sorted by name.
    pub type_definitions: Vec<TypeDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Subgraph {
    pub name: String,
    pub url: String,
}

/// An index into [FederatedGraph::subgraphs].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubgraphId(pub usize);

#[derive(Debug, Clone, PartialEq)]
pub struct RootOperationTypes {
    pub query: String,
    pub mutation: Option<String>,
    pub subscription: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeDefinition {
    Object(CompositeType),
    Interface(CompositeType),
    Union(Union),
    Enum(Enum),
    InputObject(InputObject),
    Scalar(Scalar),
}

/// An object or an interface.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositeType {
    pub name: String,
    pub description: Option<String>,
    pub implements_interfaces: Vec<String>,
    pub join_implements: Vec<JoinImplements>,
    pub join_types: Vec<JoinType>,
    pub directives: Vec<Directive>,
    /// In the order they were first seen in the subgraphs.
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Union {
    pub name: String,
    pub description: Option<String>,
    pub members: Vec<String>,
    pub join_members: Vec<JoinUnionMember>,
    pub join_types: Vec<JoinType>,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enum {
    pub name: String,
    pub description: Option<String>,
    pub values: Vec<EnumValue>,
    pub join_types: Vec<JoinType>,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub name: String,
    pub description: Option<String>,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InputObject {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<InputValueDefinition>,
    pub join_types: Vec<JoinType>,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Scalar {
    pub name: String,
    pub description: Option<String>,
    pub join_types: Vec<JoinType>,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub description: Option<String>,
    pub r#type: Type,
    pub arguments: Vec<InputValueDefinition>,
    /// One per subgraph defining the field.
    pub join_fields: Vec<JoinField>,
    pub directives: Vec<Directive>,
}

/// An argument, or a field of an input object.
#[derive(Debug, Clone, PartialEq)]
pub struct InputValueDefinition {
    pub name: String,
    pub description: Option<String>,
    pub r#type: Type,
    pub default_value: Option<Value>,
    pub directives: Vec<Directive>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    pub name: String,
    pub wrapping: Wrapping,
}

/// `@join__type`: the subgraph defines the type.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinType {
    pub subgraph_id: SubgraphId,
    /// The rendered selection set of one `@key`.
    pub key: Option<String>,
    pub resolvable: bool,
    pub is_interface_object: bool,
}

/// `@join__field`: the subgraph defines the field.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinField {
    pub subgraph_id: SubgraphId,
    /// The type of the field in the subgraph, when it differs from the federated type.
    pub r#type: Option<Type>,
    pub requires: Option<String>,
    pub provides: Option<String>,
    pub external: bool,
    /// The name of the subgraph the field is taken over from.
    pub r#override: Option<String>,
}

/// `@join__implements`
#[derive(Debug, Clone, PartialEq)]
pub struct JoinImplements {
    pub subgraph_id: SubgraphId,
    pub interface: String,
}

/// `@join__unionMember`
#[derive(Debug, Clone, PartialEq)]
pub struct JoinUnionMember {
    pub subgraph_id: SubgraphId,
    pub member: String,
}

/// The directives carried over from the subgraphs.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Deprecated { reason: Option<String> },
    Inaccessible,
    Authenticated,
    RequiresScopes(Vec<Vec<String>>),
    Tag(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<Value>),
    Object(Vec<(String, Value)>),
}

impl FederatedGraph {
    pub fn definition(&self, name: &str) -> Option<&TypeDefinition> {
        self.type_definitions
            .binary_search_by(|definition| definition.name().cmp(name))
            .ok()
            .map(|idx| &self.type_definitions[idx])
    }

    /// The object or interface with that name.
    pub fn composite_type(&self, name: &str) -> Option<&CompositeType> {
        match self.definition(name)? {
            TypeDefinition::Object(composite) | TypeDefinition::Interface(composite) => Some(composite),
            _ => None,
        }
    }

    pub fn field(&self, type_name: &str, field_name: &str) -> Option<&Field> {
        self.composite_type(type_name)?
            .fields
            .iter()
            .find(|field| field.name == field_name)
    }

    pub fn subgraph(&self, id: SubgraphId) -> &Subgraph {
        &self.subgraphs[id.0]
    }

    pub fn is_root_type(&self, name: &str) -> bool {
        let roots = &self.root_operation_types;
        roots.query == name || roots.mutation.as_deref() == Some(name) || roots.subscription.as_deref() == Some(name)
    }
}

impl TypeDefinition {
    pub fn name(&self) -> &str {
        match self {
            TypeDefinition::Object(composite) | TypeDefinition::Interface(composite) => &composite.name,
            TypeDefinition::Union(union) => &union.name,
            TypeDefinition::Enum(r#enum) => &r#enum.name,
            TypeDefinition::InputObject(input_object) => &input_object.name,
            TypeDefinition::Scalar(scalar) => &scalar.name,
        }
    }

    pub fn kind(&self) -> DefinitionKind {
        match self {
            TypeDefinition::Object(_) => DefinitionKind::Object,
            TypeDefinition::Interface(_) => DefinitionKind::Interface,
            TypeDefinition::Union(_) => DefinitionKind::Union,
            TypeDefinition::Enum(_) => DefinitionKind::Enum,
            TypeDefinition::InputObject(_) => DefinitionKind::InputObject,
            TypeDefinition::Scalar(_) => DefinitionKind::Scalar,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            TypeDefinition::Object(composite) | TypeDefinition::Interface(composite) => composite.description.as_deref(),
            TypeDefinition::Union(union) => union.description.as_deref(),
            TypeDefinition::Enum(r#enum) => r#enum.description.as_deref(),
            TypeDefinition::InputObject(input_object) => input_object.description.as_deref(),
            TypeDefinition::Scalar(scalar) => scalar.description.as_deref(),
        }
    }

    pub fn directives(&self) -> &[Directive] {
        match self {
            TypeDefinition::Object(composite) | TypeDefinition::Interface(composite) => &composite.directives,
            TypeDefinition::Union(union) => &union.directives,
            TypeDefinition::Enum(r#enum) => &r#enum.directives,
            TypeDefinition::InputObject(input_object) => &input_object.directives,
            TypeDefinition::Scalar(scalar) => &scalar.directives,
        }
    }

    pub fn join_types(&self) -> &[JoinType] {
        match self {
            TypeDefinition::Object(composite) | TypeDefinition::Interface(composite) => &composite.join_types,
            TypeDefinition::Union(union) => &union.join_types,
            TypeDefinition::Enum(r#enum) => &r#enum.join_types,
            TypeDefinition::InputObject(input_object) => &input_object.join_types,
            TypeDefinition::Scalar(scalar) => &scalar.join_types,
        }
    }

    pub fn is_inaccessible(&self) -> bool {
        self.directives().contains(&Directive::Inaccessible)
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.wrapping.type_display(&self.name), f)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Int(int) => write!(f, "{int}"),
            Value::Float(float) => write!(f, "{float}"),
            Value::String(string) => write_quoted(f, string),
            Value::Boolean(boolean) => write!(f, "{boolean}"),
            Value::Enum(value) => f.write_str(value),
            Value::List(items) => {
                f.write_str("[")?;

                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }

                    item.fmt(f)?;
                }

                f.write_str("]")
            }
            Value::Object(fields) => {
                f.write_str("{")?;

                for (idx, (name, value)) in fields.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }

                    write!(f, " {name}: {value}")?;
                }

                if !fields.is_empty() {
                    f.write_str(" ")?;
                }

                f.write_str("}")
            }
        }
    }
}
