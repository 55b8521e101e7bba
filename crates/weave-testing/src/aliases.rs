//! Grouping of contributed aliases by the service they point at

use crate::snapshot::RegistrySnapshot;
use crate::{TestError, TestResult};

/// Contributed aliases grouped by target, in the order aliases were encountered
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AliasGrouping {
    groups: Vec<(String, Vec<String>)>,
}

impl AliasGrouping {
    /// Resolve each alias in `new_alias_ids` against the alias table of `current`
    ///
    /// Fails with [`TestError::DanglingAlias`] when an alias has no target.
    pub fn group(new_alias_ids: &[String], current: &RegistrySnapshot) -> TestResult<Self> {
        let mut grouping = Self::default();

        for alias in new_alias_ids {
            let target = current
                .alias_target(alias)
                .ok_or_else(|| TestError::DanglingAlias {
                    alias: alias.clone(),
                })?;

            match grouping.groups.iter_mut().find(|(id, _)| id == target) {
                Some((_, aliases)) => aliases.push(alias.clone()),
                None => grouping
                    .groups
                    .push((target.to_string(), vec![alias.clone()])),
            }
        }

        Ok(grouping)
    }

    /// Aliases pointing at `service`
    pub fn get(&self, service: &str) -> Option<&[String]> {
        self.groups
            .iter()
            .find(|(id, _)| id == service)
            .map(|(_, aliases)| aliases.as_slice())
    }

    /// Remove and return the group of `service`
    pub fn take(&mut self, service: &str) -> Option<Vec<String>> {
        let index = self.groups.iter().position(|(id, _)| id == service)?;
        Some(self.groups.remove(index).1)
    }

    /// Services that still have a group
    pub fn targets(&self) -> Vec<String> {
        self.groups.iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn into_groups(self) -> Vec<(String, Vec<String>)> {
        self.groups
    }
}
