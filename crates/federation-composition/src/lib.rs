#![deny(unsafe_code, rust_2018_idioms)]
#![allow(clippy::option_option)]

//! Composition of GraphQL subgraph schemas into a federated graph.
//!
//! Subgraphs are ingested into [Subgraphs], then [compose()] merges them into a
//! [FederatedGraph] together with the routing configuration of each subgraph. Composition either
//! fully succeeds or fails with [Diagnostics].

mod compose;
mod composition_ir;
mod diagnostics;
mod emit_configuration;
mod emit_federated_graph;
mod error;
mod ingest_subgraph;
mod interface_implementations;
mod options;
mod propagation;
mod result;
mod subgraphs;

pub mod federated_graph;

pub use self::{
    diagnostics::{Diagnostic, Diagnostics},
    error::{CompositionError, CompositionWarning, FieldShareability, InvalidFieldImplementation, SubgraphError},
    federated_graph::{FederatedGraph, render_api_sdl, render_federated_sdl},
    options::{CompositionOptions, FieldTypeMergePolicy, OptionsError},
    result::{
        CompositionResult, ConfigurationData, FederationResult, FieldConfiguration, FieldSetConfiguration,
        KeyConfiguration, SubgraphConfig,
    },
    subgraphs::{DefinitionKind, Subgraphs},
};

#[cfg(test)]
use {pretty_assertions as _, rstest as _, serde_json as _, tracing_subscriber as _};

use self::{
    compose::{
        Context, compose_subgraphs, entity_interface::collect_entity_interfaces, overrides::Overrides,
    },
    emit_configuration::{emit_field_configurations, emit_subgraph_configs},
    emit_federated_graph::emit_federated_graph,
    interface_implementations::validate_federated_graph,
};
use std::collections::HashSet;

/// Compose subgraphs into a federated graph, with the default [CompositionOptions].
pub fn compose(subgraphs: &Subgraphs) -> CompositionResult {
    compose_with_options(subgraphs, &CompositionOptions::default())
}

/// Compose subgraphs into a federated graph.
#[tracing::instrument(skip_all, fields(subgraphs = subgraphs.len()))]
pub fn compose_with_options(subgraphs: &Subgraphs, options: &CompositionOptions) -> CompositionResult {
    let mut diagnostics = Diagnostics::default();

    if subgraphs.is_empty() {
        diagnostics.push_fatal(CompositionError::MinimumSubgraphRequirement);
        return failure(diagnostics);
    }

    validate_subgraph_names(subgraphs, &mut diagnostics);
    subgraphs.emit_ingestion_diagnostics(&mut diagnostics);

    if diagnostics.any_fatal() {
        return failure(diagnostics);
    }

    tracing::debug!("collecting entity interfaces");
    let entity_interfaces = collect_entity_interfaces(subgraphs, &mut diagnostics);

    if diagnostics.any_fatal() {
        return failure(diagnostics);
    }

    let overrides = Overrides::collect(subgraphs, &mut diagnostics);

    if diagnostics.any_fatal() {
        return failure(diagnostics);
    }

    tracing::debug!("merging subgraphs");
    let mut context = Context::new(subgraphs, &mut diagnostics, options);
    compose_subgraphs(&mut context, &entity_interfaces, &overrides);
    let ir = context.into_ir();

    if diagnostics.any_fatal() {
        return failure(diagnostics);
    }

    tracing::debug!("emitting the federated graph and subgraph configurations");
    let federated_graph = emit_federated_graph(ir, subgraphs);
    validate_federated_graph(&federated_graph, &mut diagnostics);

    if diagnostics.any_fatal() {
        return failure(diagnostics);
    }

    let field_configurations = emit_field_configurations(&federated_graph);
    let subgraph_configs = emit_subgraph_configs(subgraphs, &entity_interfaces, &overrides);

    let federation = FederationResult {
        federated_graph,
        field_configurations,
        subgraph_configs,
        warnings: diagnostics.iter_warnings().cloned().collect(),
    };

    let result = CompositionResult {
        federation: Some(federation),
        diagnostics,
    };

    if options.warnings_are_fatal {
        result.warnings_are_fatal()
    } else {
        result
    }
}

fn failure(diagnostics: Diagnostics) -> CompositionResult {
    tracing::warn!(errors = diagnostics.iter_errors().count(), "composition failed");

    CompositionResult {
        federation: None,
        diagnostics,
    }
}

/// Subgraph names key the merge and the configuration: they must be unique and non-empty.
fn validate_subgraph_names(subgraphs: &Subgraphs, diagnostics: &mut Diagnostics) {
    let mut seen = HashSet::new();
    let mut invalid: Vec<String> = Vec::new();

    for name in subgraphs.iter_subgraph_names() {
        let is_valid = !name.trim().is_empty() && seen.insert(name);

        if !is_valid && !invalid.iter().any(|invalid| invalid == name) {
            invalid.push(name.to_owned());
        }
    }

    if !invalid.is_empty() {
        diagnostics.push_fatal(CompositionError::InvalidSubgraphNames { names: invalid });
    }
}
