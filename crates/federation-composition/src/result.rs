use crate::{CompositionWarning, Diagnostics, federated_graph::FederatedGraph};
use indexmap::{IndexMap, IndexSet};

/// The result of a [`compose()`](crate::compose()) invocation.
pub struct CompositionResult {
    pub(crate) federation: Option<FederationResult>,
    pub(crate) diagnostics: Diagnostics,
}

impl CompositionResult {
    /// Treat all warnings as fatal.
    pub fn warnings_are_fatal(mut self) -> Self {
        if self.diagnostics.iter_warnings().next().is_some() {
            self.federation = None;
        }

        self
    }

    /// Simplify the result data to a yes-no answer: did composition succeed?
    ///
    /// `Ok()` contains the [FederationResult].
    /// `Err()` contains all [Diagnostics].
    pub fn into_result(self) -> Result<FederationResult, Diagnostics> {
        if let Some(federation) = self.federation {
            Ok(federation)
        } else {
            // means a fatal error occured
            Err(self.diagnostics)
        }
    }

    /// Composition warnings and errors.
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn federated_graph(&self) -> Option<&FederatedGraph> {
        self.federation.as_ref().map(|federation| &federation.federated_graph)
    }
}

/// Everything a router needs from a successful composition.
#[derive(Debug, Clone)]
pub struct FederationResult {
    pub federated_graph: FederatedGraph,
    /// The fields with arguments or authorization requirements, in federated schema order.
    pub field_configurations: Vec<FieldConfiguration>,
    /// By subgraph name, in composition order.
    pub subgraph_configs: IndexMap<String, SubgraphConfig>,
    pub warnings: Vec<CompositionWarning>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubgraphConfig {
    /// The normalized SDL of the subgraph.
    pub schema: String,
    pub configuration_data_by_type_name: IndexMap<String, ConfigurationData>,
}

/// Routing data for one object or interface type, as seen by one subgraph.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationData {
    pub type_name: String,
    /// The type is an entry point of the subgraph: a root type or an entity.
    pub is_root_node: bool,
    /// The fields this subgraph resolves, in declaration order.
    pub field_names: IndexSet<String>,
    #[serde(skip_serializing_if = "IndexSet::is_empty")]
    pub external_field_names: IndexSet<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<KeyConfiguration>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub provides: Vec<FieldSetConfiguration>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires: Vec<FieldSetConfiguration>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub is_interface_object: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_interface_concrete_type_names: Option<IndexSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub require_fetch_reasons_field_names: Option<Vec<String>>,
}

impl ConfigurationData {
    pub(crate) fn new(type_name: String, is_root_node: bool) -> Self {
        ConfigurationData {
            type_name,
            is_root_node,
            field_names: IndexSet::new(),
            external_field_names: IndexSet::new(),
            keys: Vec::new(),
            provides: Vec::new(),
            requires: Vec::new(),
            is_interface_object: false,
            entity_interface_concrete_type_names: None,
            require_fetch_reasons_field_names: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyConfiguration {
    pub selection_set: String,
    /// `@key(resolvable: false)`: the subgraph can not be used to fetch the entity by this key.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub disable_entity_resolver: bool,
}

/// A `@provides` or `@requires` on a field.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldSetConfiguration {
    pub field_name: String,
    pub selection_set: String,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfiguration {
    pub type_name: String,
    pub field_name: String,
    pub argument_names: Vec<String>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub requires_authentication: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required_scopes: Vec<Vec<String>>,
}
