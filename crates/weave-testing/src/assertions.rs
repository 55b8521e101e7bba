//! Closed-world assertions over what an integration contributed to a container
//!
//! Every contributed service and alias must be claimed by exactly one
//! expectation; anything left over fails the check, and the failure names the
//! offending collection.

use crate::aliases::AliasGrouping;
use crate::expectation::{Scenario, ServiceExpectation};
use crate::snapshot::{diff, ContributionSet, RegistrySnapshot};
use crate::{TestError, TestResult};
use serde_json::{Map, Value};
use weave_core::ContainerBuilder;

/// Check the services and aliases `container` gained over a fresh container
///
/// Runs the definition check of every expectation that has one.
pub fn assert_container_services(
    services: &[ServiceExpectation],
    container: &ContainerBuilder,
    extra_aliases: &[(String, Vec<String>)],
) -> TestResult<()> {
    let current = RegistrySnapshot::capture(container);
    let contribution = diff(&pristine_snapshot(), &current);

    reconcile_services(services, &contribution)?;
    reconcile_aliases(services, extra_aliases, &contribution, &current)?;
    check_definitions(services, container)
}

/// Check the parameters `container` gained over a fresh container, exactly
pub fn assert_container_parameters(
    expected: &Map<String, Value>,
    container: &ContainerBuilder,
) -> TestResult<()> {
    let contribution = diff(&pristine_snapshot(), &RegistrySnapshot::capture(container));
    reconcile_parameters(expected, &contribution)
}

/// Check the configuration collected for every registered extension
///
/// `expected` maps each extension alias to the list of configuration values it
/// received, first to last. Extensions without configuration appear with an
/// empty list.
pub fn assert_container_extension_configuration(
    container: &ContainerBuilder,
    expected: &Value,
) -> TestResult<()> {
    let actual: Map<String, Value> = container
        .extensions()
        .into_iter()
        .map(|alias| {
            let configs = container.extension_config(alias).to_vec();
            (alias.to_string(), Value::Array(configs))
        })
        .collect();
    let actual = Value::Object(actual);

    if &actual != expected {
        return Err(TestError::ExtensionConfigurationMismatch {
            expected: expected.clone(),
            actual,
        });
    }

    Ok(())
}

/// Run the full reconciliation of a scenario against a loaded container
pub(crate) fn assert_contribution(
    baseline: &RegistrySnapshot,
    container: &ContainerBuilder,
    scenario: &Scenario,
) -> TestResult<()> {
    let current = RegistrySnapshot::capture(container);
    let contribution = diff(baseline, &current);

    tracing::debug!(
        services = contribution.new_service_ids.len(),
        aliases = contribution.new_alias_ids.len(),
        parameters = contribution.new_parameters.len(),
        "Integration contribution computed"
    );

    reconcile_services(scenario.services(), &contribution)?;
    reconcile_aliases(
        scenario.services(),
        scenario.extra_aliases(),
        &contribution,
        &current,
    )?;
    check_definitions(scenario.services(), container)?;
    reconcile_parameters(scenario.parameters(), &contribution)
}

fn pristine_snapshot() -> RegistrySnapshot {
    RegistrySnapshot::capture(&ContainerBuilder::new())
}

fn reconcile_services(
    services: &[ServiceExpectation],
    contribution: &ContributionSet,
) -> TestResult<()> {
    let mut remaining = contribution.new_service_ids.clone();

    for service in services {
        match remaining.iter().position(|id| id == service.id()) {
            Some(index) => {
                remaining.remove(index);
            }
            None => {
                return Err(TestError::MissingService {
                    id: service.id().to_string(),
                    available: remaining,
                })
            }
        }
    }

    if !remaining.is_empty() {
        return Err(TestError::UnexpectedServices { ids: remaining });
    }

    Ok(())
}

fn reconcile_aliases(
    services: &[ServiceExpectation],
    extra_aliases: &[(String, Vec<String>)],
    contribution: &ContributionSet,
    current: &RegistrySnapshot,
) -> TestResult<()> {
    let mut grouping = AliasGrouping::group(&contribution.new_alias_ids, current)?;

    for service in services {
        let actual = grouping.take(service.id()).unwrap_or_default();
        compare_aliases(service.id(), service.aliases(), actual)?;
    }

    for (service, aliases) in extra_aliases {
        let Some(actual) = grouping.take(service) else {
            return Err(TestError::MissingExtraAliases {
                service: service.clone(),
                available: grouping.targets(),
            });
        };
        compare_aliases(service, aliases, actual)?;
    }

    if !grouping.is_empty() {
        return Err(TestError::UnaccountedAliases {
            groups: grouping.into_groups(),
        });
    }

    Ok(())
}

/// Missing expected aliases and order differences are mismatches; contributed
/// aliases nobody expected are unaccounted for.
fn compare_aliases(service: &str, expected: &[String], actual: Vec<String>) -> TestResult<()> {
    let missing = expected.iter().any(|alias| !actual.contains(alias));
    let unexpected: Vec<String> = actual
        .iter()
        .filter(|alias| !expected.contains(alias))
        .cloned()
        .collect();

    if !missing && !unexpected.is_empty() {
        return Err(TestError::UnaccountedAliases {
            groups: vec![(service.to_string(), unexpected)],
        });
    }

    if actual != expected {
        return Err(TestError::AliasMismatch {
            service: service.to_string(),
            expected: expected.to_vec(),
            actual,
        });
    }

    Ok(())
}

fn check_definitions(services: &[ServiceExpectation], container: &ContainerBuilder) -> TestResult<()> {
    for service in services {
        let Some(check) = service.definition_check() else {
            continue;
        };

        let definition = container.get_definition(service.id())?;
        check(definition).map_err(|error| TestError::DefinitionCheck {
            id: service.id().to_string(),
            source: Box::new(error),
        })?;
    }

    Ok(())
}

fn reconcile_parameters(
    expected: &Map<String, Value>,
    contribution: &ContributionSet,
) -> TestResult<()> {
    if expected != &contribution.new_parameters {
        return Err(TestError::ParameterMismatch {
            expected: Value::Object(expected.clone()),
            actual: Value::Object(contribution.new_parameters.clone()),
        });
    }

    Ok(())
}

/// Canonical form used by the default configuration check
///
/// Numbers become the string that renders them, so `60`, `60.0` and `"60"`
/// compare equal while two different strings never do. Object key order never
/// matters; array order does.
pub(crate) fn canonical_json(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, value)| (key.clone(), canonical_json(value)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(canonical_json).collect()),
        Value::Number(number) => Value::String(render_number(number)),
        other => other.clone(),
    }
}

fn render_number(number: &serde_json::Number) -> String {
    match number.as_f64() {
        Some(float) if number.is_f64() && float.fract() == 0.0 && float.abs() < 9.0e15 => {
            (float as i64).to_string()
        }
        _ => number.to_string(),
    }
}
