//! Registry snapshots and the contribution diff between two of them

use serde_json::{Map, Value};
use std::collections::HashSet;
use weave_core::ContainerBuilder;

/// Read-only view of a registry at a point in time
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RegistrySnapshot {
    service_ids: Vec<String>,
    aliases: Vec<(String, String)>,
    parameters: Vec<(String, Value)>,
}

impl RegistrySnapshot {
    /// Capture the ids, alias table and parameter table of `container`
    pub fn capture(container: &ContainerBuilder) -> Self {
        Self {
            service_ids: container.definitions().keys().map(str::to_string).collect(),
            aliases: container
                .aliases()
                .iter()
                .map(|(id, alias)| (id.to_string(), alias.target().to_string()))
                .collect(),
            parameters: container
                .parameters()
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }

    /// Service ids in registry enumeration order
    pub fn service_ids(&self) -> &[String] {
        &self.service_ids
    }

    /// Alias table as `(alias, target)` pairs in registry enumeration order
    pub fn aliases(&self) -> &[(String, String)] {
        &self.aliases
    }

    pub fn parameters(&self) -> &[(String, Value)] {
        &self.parameters
    }

    /// Target of `alias`, when the alias exists
    pub fn alias_target(&self, alias: &str) -> Option<&str> {
        self.aliases
            .iter()
            .find(|(id, _)| id == alias)
            .map(|(_, target)| target.as_str())
    }
}

/// What a single load added on top of a baseline registry
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContributionSet {
    pub new_service_ids: Vec<String>,
    pub new_alias_ids: Vec<String>,
    pub new_parameters: Map<String, Value>,
}

impl ContributionSet {
    pub fn is_empty(&self) -> bool {
        self.new_service_ids.is_empty()
            && self.new_alias_ids.is_empty()
            && self.new_parameters.is_empty()
    }
}

/// Entries of `current` missing from `baseline`
///
/// Ids keep the enumeration order of `current`. Parameters are compared by
/// name only: a parameter present in both snapshots is never reported, even
/// when its value changed.
pub fn diff(baseline: &RegistrySnapshot, current: &RegistrySnapshot) -> ContributionSet {
    let known_services: HashSet<&str> = baseline.service_ids.iter().map(String::as_str).collect();
    let known_aliases: HashSet<&str> = baseline.aliases.iter().map(|(id, _)| id.as_str()).collect();
    let known_parameters: HashSet<&str> =
        baseline.parameters.iter().map(|(name, _)| name.as_str()).collect();

    ContributionSet {
        new_service_ids: current
            .service_ids
            .iter()
            .filter(|id| !known_services.contains(id.as_str()))
            .cloned()
            .collect(),
        new_alias_ids: current
            .aliases
            .iter()
            .filter(|(id, _)| !known_aliases.contains(id.as_str()))
            .map(|(id, _)| id.clone())
            .collect(),
        new_parameters: current
            .parameters
            .iter()
            .filter(|(name, _)| !known_parameters.contains(name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect(),
    }
}
