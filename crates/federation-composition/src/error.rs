use crate::DefinitionKind;
use std::fmt;

/// A fatal composition error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompositionError {
    #[error("At least one subgraph is required for federation.")]
    MinimumSubgraphRequirement,
    #[error(
        "Subgraph names must be unique and must not be empty. The following subgraph names are invalid: {}.",
        Quoted(.names)
    )]
    InvalidSubgraphNames { names: Vec<String> },
    #[error("The subgraph \"{subgraph_name}\" could not be federated for the following reason(s):\n {error}")]
    Subgraph { subgraph_name: String, error: SubgraphError },
    #[error(
        "When merging types, expected \"{type_name}\" to be type \"{existing_kind}\" (as defined in subgraph \"{existing_subgraph}\") but received \"{incoming_kind}\" (as defined in subgraph \"{incoming_subgraph}\")."
    )]
    IncompatibleParentKindMerge {
        type_name: String,
        existing_kind: DefinitionKind,
        existing_subgraph: String,
        incoming_kind: DefinitionKind,
        incoming_subgraph: String,
    },
    #[error(
        "The field \"{coordinate}\" has incompatible named types across subgraphs: \"{first_type}\" in subgraph \"{first_subgraph}\" and \"{second_type}\" in subgraph \"{second_subgraph}\"."
    )]
    IncompatibleFieldNamedTypes {
        coordinate: String,
        first_type: String,
        first_subgraph: String,
        second_type: String,
        second_subgraph: String,
    },
    #[error(
        "Incompatible types when merging \"{coordinate}\": \"{first_type}\" in subgraph \"{first_subgraph}\" and \"{second_type}\" in subgraph \"{second_subgraph}\"."
    )]
    IncompatibleFieldTypes {
        coordinate: String,
        first_type: String,
        first_subgraph: String,
        second_type: String,
        second_subgraph: String,
    },
    #[error("{}", display_shareability(.type_name, .fields))]
    InvalidFieldShareability {
        type_name: String,
        fields: Vec<FieldShareability>,
    },
    #[error(
        "Federation was unsuccessful because any one subgraph that defines a specific entity interface must also define each and every entity object that implements that entity interface. The entity interface \"{interface_name}\" is implemented by {}. Subgraph \"{subgraph_name}\" defines {} and does not define the following implementations: {}.",
        Quoted(.required_concrete_type_names),
        Quoted(.defined_concrete_type_names),
        Quoted(.missing_concrete_type_names)
    )]
    UndefinedEntityInterfaceImplementations {
        interface_name: String,
        subgraph_name: String,
        defined_concrete_type_names: Vec<String>,
        required_concrete_type_names: Vec<String>,
        missing_concrete_type_names: Vec<String>,
    },
    #[error(
        "The subgraph \"{subgraph_name}\" defines \"{interface_name}\" as an interface object, so it must not also define the implementations of \"{interface_name}\": {}.",
        Quoted(.type_names)
    )]
    InvalidInterfaceObjectImplementationDefinitions {
        interface_name: String,
        subgraph_name: String,
        type_names: Vec<String>,
    },
    #[error(
        "The type \"{type_name}\" is declared as an interface object, but no subgraph defines \"{type_name}\" as an entity interface."
    )]
    InterfaceObjectWithoutInterface { type_name: String },
    #[error(
        "The required {what} \"{coordinate}\" must be defined in every subgraph that defines its parent. It is missing from {}.",
        Quoted(.missing_from)
    )]
    InvalidRequiredInputValue {
        what: &'static str,
        coordinate: String,
        missing_from: Vec<String>,
    },
    #[error(
        "The enum \"{enum_name}\" is used both as an input and an output type, so it must define the same values in every subgraph."
    )]
    IncompatibleSharedEnum { enum_name: String },
    #[error("The field \"{coordinate}\" in subgraph \"{subgraph_name}\" can not override itself.")]
    EquivalentSourceAndTargetOverride { coordinate: String, subgraph_name: String },
    #[error("The field \"{coordinate}\" is overridden in more than one subgraph: {}.", Quoted(.subgraphs))]
    DuplicateOverriddenField { coordinate: String, subgraphs: Vec<String> },
    #[error("The federated graph must define a query root type with at least one field.")]
    NoQueryRootType,
    #[error(
        "The type \"{type_name}\" is declared as an interface object, but \"{type_name}\" is defined as an interface without @key in subgraph \"{subgraph_name}\"."
    )]
    InterfaceObjectForNonEntityInterface { type_name: String, subgraph_name: String },
    #[error("{}", display_implementation(.type_name, .interface_name, .missing_fields, .invalid_fields))]
    InvalidInterfaceImplementation {
        type_name: String,
        interface_name: String,
        missing_fields: Vec<String>,
        invalid_fields: Vec<InvalidFieldImplementation>,
    },
}

/// An error found while normalizing a single subgraph.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubgraphError {
    #[error("The subgraph has syntax errors: {0}")]
    InvalidSyntax(String),
    #[error("The type \"{type_name}\" must only be defined once.")]
    DuplicateTypeDefinition { type_name: String },
    #[error("The {base_kind} \"{type_name}\" can not be extended as a type of kind {extension_kind}.")]
    IncompatibleExtensionKind {
        type_name: String,
        base_kind: DefinitionKind,
        extension_kind: DefinitionKind,
    },
    #[error("The {kind} \"{type_name}\" must only define the field definition \"{field_name}\" once.")]
    DuplicateFieldDefinition {
        kind: DefinitionKind,
        type_name: String,
        field_name: String,
    },
    #[error("The enum \"{enum_name}\" must only define the value \"{value}\" once.")]
    DuplicateEnumValue { enum_name: String, value: String },
    #[error("The union \"{union_name}\" must only define the member \"{member}\" once.")]
    DuplicateUnionMember { union_name: String, member: String },
    #[error("The type \"{type_name}\" referenced at \"{coordinate}\" is not defined.")]
    UndefinedType { type_name: String, coordinate: String },
    #[error("The type \"{type_name}\" implements \"{interface_name}\", which is not an interface defined in this subgraph.")]
    InvalidImplementedType { type_name: String, interface_name: String },
    #[error("The union \"{union_name}\" has the member \"{member}\", which is not an object type defined in this subgraph.")]
    InvalidUnionMember { union_name: String, member: String },
    #[error("The @{directive} directive on \"{coordinate}\" has an invalid field set: {reason}")]
    InvalidFieldSet {
        directive: &'static str,
        coordinate: String,
        reason: String,
    },
    #[error("The type \"{type_name}\" is not a valid interface object: {reason}")]
    InvalidInterfaceObject { type_name: String, reason: &'static str },
    #[error(
        "The type \"{type_name}\" has the default name of a root type but is not the {operation} root type. This is not valid in a federation context."
    )]
    InvalidRootTypeDefinition { type_name: String, operation: &'static str },
    #[error("The {operation} root type \"{type_name}\" must be an object type.")]
    RootTypeNotObject { type_name: String, operation: &'static str },
    #[error("The type at \"{coordinate}\" nests lists more than {max} levels deep.", max = crate::ingest_subgraph::MAX_LIST_NESTING)]
    MaximumTypeNestingExceeded { coordinate: String },
    #[error("{}", display_implementation(.type_name, .interface_name, .missing_fields, .invalid_fields))]
    InvalidInterfaceImplementation {
        type_name: String,
        interface_name: String,
        missing_fields: Vec<String>,
        invalid_fields: Vec<InvalidFieldImplementation>,
    },
}

/// A non-fatal composition diagnostic.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CompositionWarning {
    #[error(
        "[{subgraph_name}] The type \"{type_name}\" uses the @extends directive. This is deprecated, use an extension block (`extend type {type_name}`) instead."
    )]
    ExtendsDirectiveUsed { subgraph_name: String, type_name: String },
    #[error(
        "[{subgraph_name}] The field \"{coordinate}\" is declared @external but is not used by any @key, @provides or @requires directive."
    )]
    UnusedExternalField { subgraph_name: String, coordinate: String },
    #[error(
        "[{subgraph_name}] The field \"{coordinate}\" overrides the subgraph \"{source_subgraph}\", which is not part of this composition."
    )]
    OverrideSourceNotFound {
        subgraph_name: String,
        coordinate: String,
        source_subgraph: String,
    },
}

/// One field involved in an [CompositionError::InvalidFieldShareability] error.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldShareability {
    pub field_name: String,
    pub shareable_in: Vec<String>,
    pub non_shareable_in: Vec<String>,
}

/// One field of an [CompositionError::InvalidInterfaceImplementation] error.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidFieldImplementation {
    pub field_name: String,
    /// The type of the field on the interface.
    pub expected_type: String,
    /// The type of the field on the implementation, when it is not a valid subtype.
    pub invalid_type: Option<String>,
    pub missing_arguments: Vec<String>,
    /// Arguments whose type differs from the interface's.
    pub invalid_arguments: Vec<String>,
    /// Arguments the interface does not define, which must then be nullable.
    pub required_additional_arguments: Vec<String>,
}

struct Quoted<'a>(&'a [String]);

impl fmt::Display for Quoted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, item) in self.0.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }

            write!(f, "\"{item}\"")?;
        }

        Ok(())
    }
}

fn display_shareability<'a>(type_name: &'a str, fields: &'a [FieldShareability]) -> DisplayShareability<'a> {
    DisplayShareability { type_name, fields }
}

struct DisplayShareability<'a> {
    type_name: &'a str,
    fields: &'a [FieldShareability],
}

impl fmt::Display for DisplayShareability<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The object \"{}\" defines the same fields in multiple subgraphs without the @shareable directive:",
            self.type_name
        )?;

        for field in self.fields {
            write!(
                f,
                "\n  The field \"{}\" is defined in subgraphs {}",
                field.field_name,
                Quoted(&field.non_shareable_in)
            )?;

            if field.shareable_in.is_empty() {
                f.write_str(" and is not declared @shareable in any of them.")?;
            } else {
                write!(
                    f,
                    " without @shareable, and declared @shareable in {}.",
                    Quoted(&field.shareable_in)
                )?;
            }
        }

        Ok(())
    }
}

fn display_implementation<'a>(
    type_name: &'a str,
    interface_name: &'a str,
    missing_fields: &'a [String],
    invalid_fields: &'a [InvalidFieldImplementation],
) -> DisplayImplementation<'a> {
    DisplayImplementation {
        type_name,
        interface_name,
        missing_fields,
        invalid_fields,
    }
}

struct DisplayImplementation<'a> {
    type_name: &'a str,
    interface_name: &'a str,
    missing_fields: &'a [String],
    invalid_fields: &'a [InvalidFieldImplementation],
}

impl fmt::Display for DisplayImplementation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The type \"{}\" does not correctly implement the interface \"{}\":",
            self.type_name, self.interface_name
        )?;

        if !self.missing_fields.is_empty() {
            write!(f, "\n  The following fields are not implemented: {}.", Quoted(self.missing_fields))?;
        }

        for field in self.invalid_fields {
            write!(f, "\n  The field \"{}\"", field.field_name)?;

            if let Some(invalid_type) = &field.invalid_type {
                write!(
                    f,
                    " has the type \"{invalid_type}\", which is not a valid implementation of \"{}\".",
                    field.expected_type
                )?;
            } else {
                f.write_str(" has invalid arguments.")?;
            }

            if !field.missing_arguments.is_empty() {
                write!(f, " Missing arguments: {}.", Quoted(&field.missing_arguments))?;
            }

            if !field.invalid_arguments.is_empty() {
                write!(
                    f,
                    " Arguments with a type different from the interface: {}.",
                    Quoted(&field.invalid_arguments)
                )?;
            }

            if !field.required_additional_arguments.is_empty() {
                write!(
                    f,
                    " Additional arguments must be nullable: {}.",
                    Quoted(&field.required_additional_arguments)
                )?;
            }
        }

        Ok(())
    }
}
