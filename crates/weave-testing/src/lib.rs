//! # weave-testing - Integration Test Harness
//!
//! Verifies weave integrations: the configuration section an integration
//! declares, its defaults, and exactly which services, aliases and parameters
//! its `load` contributes to a fresh container.
//!
//! Contribution checks are closed-world: every contributed service and alias
//! must be claimed by an expectation, and every expectation must be met.
//!
//! ## Quick Start
//!
//! ```rust
//! use weave_testing::prelude::*;
//! use weave_core::config::{ArrayNode, ConfigMap};
//! use weave_core::{ContainerBuilder, CoreError, FileLoader, Integration};
//!
//! struct CacheIntegration;
//!
//! impl Integration for CacheIntegration {
//!     fn config_section_name(&self) -> &str {
//!         "cache"
//!     }
//!
//!     fn add_configuration(&self, node: &mut ArrayNode) {
//!         node.integer("ttl").default_value(60);
//!     }
//!
//!     fn load(
//!         &self,
//!         config: &ConfigMap,
//!         _loader: &FileLoader,
//!         container: &mut ContainerBuilder,
//!     ) -> Result<(), CoreError> {
//!         container.register("cache.store", "app::cache::Store");
//!         container.set_alias("cache", "cache.store")?;
//!         container.set_parameter("cache.default_ttl", config["ttl"].clone());
//!         Ok(())
//!     }
//! }
//!
//! struct CacheIntegrationTest;
//!
//! impl IntegrationTestCase for CacheIntegrationTest {
//!     type Integration = CacheIntegration;
//!
//!     fn create_integration(&self) -> CacheIntegration {
//!         CacheIntegration
//!     }
//!
//!     fn configuration_section_name(&self) -> &str {
//!         "cache"
//!     }
//!
//!     fn default_configuration(&self) -> JsonValue {
//!         json!({"ttl": 60})
//!     }
//!
//!     fn load_scenarios(&self) -> Vec<Scenario> {
//!         vec![Scenario::new(json!({"ttl": 120}))
//!             .expect_service(ServiceExpectation::new("cache.store", ["cache"]))
//!             .expect_parameter("cache.default_ttl", 120)]
//!     }
//! }
//!
//! let case = CacheIntegrationTest;
//! case.test_config_section_name().unwrap();
//! case.test_default_configuration().unwrap();
//! case.test_load().unwrap();
//! ```
//!
//! In a test file, `integration_test_case!(cache, CacheIntegrationTest)`
//! generates the three `#[test]` functions.

pub mod aliases;
pub mod assertions;
pub mod case;
pub mod expectation;
pub mod extension;
pub mod logging;
pub mod snapshot;

// Re-export commonly used types
pub use aliases::AliasGrouping;
pub use assertions::{
    assert_container_extension_configuration, assert_container_parameters,
    assert_container_services,
};
pub use case::{IntegrationTestCase, SectionConfiguration};
pub use expectation::{DefinitionCheck, Scenario, ServiceExpectation};
pub use extension::StubExtension;
pub use snapshot::{diff, ContributionSet, RegistrySnapshot};

use serde_json::Value;
use weave_core::{ConfigError, CoreError};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        assertions::{
            assert_container_extension_configuration, assert_container_parameters,
            assert_container_services,
        },
        case::IntegrationTestCase,
        expectation::{Scenario, ServiceExpectation},
        extension::StubExtension,
        integration_test_case,
        logging::init_test_logging,
        TestError, TestResult,
    };

    // Re-export commonly used external types
    pub use serde_json::{json, Value as JsonValue};
}

// Error handling
#[derive(thiserror::Error, Debug)]
pub enum TestError {
    #[error("Expected service [{id}] was not contributed. Available service ids: {}", .available.join(", "))]
    MissingService { id: String, available: Vec<String> },

    #[error("All services should be tested. Unexpected service ids: {}", .ids.join(", "))]
    UnexpectedServices { ids: Vec<String> },

    #[error("Service [{service}] aliases do not match. Expected {expected:?}, got {actual:?}")]
    AliasMismatch {
        service: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("No aliases were contributed for [{service}]. Available alias targets: {}", .available.join(", "))]
    MissingExtraAliases {
        service: String,
        available: Vec<String>,
    },

    #[error("All aliases need to be accounted for. Unaccounted alias: {}", describe_groups(.groups))]
    UnaccountedAliases { groups: Vec<(String, Vec<String>)> },

    #[error("Alias [{alias}] does not resolve to any service")]
    DanglingAlias { alias: String },

    #[error("Defined parameters do not match. Expected {expected}, got {actual}")]
    ParameterMismatch { expected: Value, actual: Value },

    #[error("Configuration section name does not match. Expected \"{expected}\", got \"{actual}\"")]
    SectionNameMismatch { expected: String, actual: String },

    #[error("Default configuration does not match. Expected {expected}, got {actual}")]
    DefaultConfigurationMismatch { expected: Value, actual: Value },

    #[error("Extension configuration does not match. Expected {expected}, got {actual}")]
    ExtensionConfigurationMismatch { expected: Value, actual: Value },

    #[error("Definition check failed for service [{id}]: {source}")]
    DefinitionCheck {
        id: String,
        #[source]
        source: Box<TestError>,
    },

    #[error("Scenario {scenario} failed: {source}")]
    Scenario {
        scenario: String,
        #[source]
        source: Box<TestError>,
    },

    #[error("Assertion failed: {message}")]
    Assertion { message: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl TestError {
    /// Create a generic assertion failure
    pub fn assertion(message: impl Into<String>) -> Self {
        Self::Assertion {
            message: message.into(),
        }
    }

    /// Innermost error, unwrapping scenario and definition check context
    pub fn root_cause(&self) -> &TestError {
        match self {
            Self::Scenario { source, .. } | Self::DefinitionCheck { source, .. } => {
                source.root_cause()
            }
            other => other,
        }
    }
}

pub type TestResult<T> = Result<T, TestError>;

fn describe_groups(groups: &[(String, Vec<String>)]) -> String {
    groups
        .iter()
        .map(|(service, aliases)| format!("{} → [{}]", service, aliases.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unaccounted_alias_message_names_service_and_aliases() {
        let error = TestError::UnaccountedAliases {
            groups: vec![
                ("cache.store".to_string(), vec!["cache".to_string()]),
                (
                    "clock".to_string(),
                    vec!["time".to_string(), "app.clock".to_string()],
                ),
            ],
        };

        assert_eq!(
            error.to_string(),
            "All aliases need to be accounted for. Unaccounted alias: cache.store → [cache]; clock → [time, app.clock]"
        );
    }

    #[test]
    fn test_root_cause_unwraps_context() {
        let error = TestError::Scenario {
            scenario: "#0".to_string(),
            source: Box::new(TestError::DefinitionCheck {
                id: "cache.store".to_string(),
                source: Box::new(TestError::assertion("class differs")),
            }),
        };

        assert!(matches!(error.root_cause(), TestError::Assertion { .. }));
        assert_eq!(
            error.to_string(),
            "Scenario #0 failed: Definition check failed for service [cache.store]: Assertion failed: class differs"
        );
    }

    #[test]
    fn test_collaborator_errors_pass_through() {
        let error: TestError = CoreError::configuration("bad ttl").into();
        assert_eq!(error.to_string(), "Configuration error: bad ttl");
        assert!(matches!(error, TestError::Core(ref core) if core.is_configuration()));
    }
}
