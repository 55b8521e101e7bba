//! Integration test cases: section name, defaults and load scenarios

use crate::assertions::{assert_contribution, canonical_json};
use crate::expectation::Scenario;
use crate::snapshot::RegistrySnapshot;
use crate::{TestError, TestResult};
use serde_json::Value;
use weave_core::config::{ConfigError, ConfigMap, ConfigurationDefinition, Processor, TreeBuilder};
use weave_core::{ContainerBuilder, FileLoader, Integration};

/// Configuration tree of a single integration's section
#[derive(Debug, Clone)]
pub struct SectionConfiguration {
    tree: TreeBuilder,
}

impl SectionConfiguration {
    /// Build the tree `integration` declares, rooted at its section name
    pub fn for_integration<I>(integration: &I) -> Self
    where
        I: Integration + ?Sized,
    {
        let mut tree = TreeBuilder::new(integration.config_section_name());
        integration.add_configuration(tree.root_node());
        Self { tree }
    }
}

impl ConfigurationDefinition for SectionConfiguration {
    fn config_tree_builder(&self) -> &TreeBuilder {
        &self.tree
    }
}

/// Test case for one integration
///
/// Implementors describe the integration under test; the provided `test_*`
/// methods run the checks. Every scenario runs against its own pristine
/// containers.
pub trait IntegrationTestCase {
    type Integration: Integration;

    /// Fresh instance of the integration under test
    fn create_integration(&self) -> Self::Integration;

    /// Section name the integration must declare
    fn configuration_section_name(&self) -> &str;

    /// Configuration resolved from no input at all
    fn default_configuration(&self) -> Value;

    fn load_scenarios(&self) -> Vec<Scenario>;

    /// Resolve raw configuration maps against the integration's section tree
    fn process_configuration(&self, configs: &[Value]) -> Result<ConfigMap, ConfigError> {
        let integration = self.create_integration();
        Processor::new()
            .process_configuration(&SectionConfiguration::for_integration(&integration), configs)
    }

    /// Load one scenario and reconcile the contribution with its expectations
    ///
    /// Configuration and load errors are returned unmodified.
    fn run_scenario(&self, scenario: &Scenario) -> TestResult<()> {
        let baseline = RegistrySnapshot::capture(&ContainerBuilder::new());

        let integration = self.create_integration();
        let config = Processor::new().process_configuration(
            &SectionConfiguration::for_integration(&integration),
            scenario.configs(),
        )?;

        let mut container = ContainerBuilder::new();
        integration.load(&config, &FileLoader::default(), &mut container)?;

        assert_contribution(&baseline, &container, scenario)
    }

    fn test_config_section_name(&self) -> TestResult<()> {
        let integration = self.create_integration();
        let actual = integration.config_section_name();
        let expected = self.configuration_section_name();

        if actual != expected {
            return Err(TestError::SectionNameMismatch {
                expected: expected.to_string(),
                actual: actual.to_string(),
            });
        }

        Ok(())
    }

    /// Compare the defaults structurally: `60` and `"60"` are equal here
    fn test_default_configuration(&self) -> TestResult<()> {
        let actual = Value::Object(self.process_configuration(&[])?);
        let expected = self.default_configuration();

        if canonical_json(&actual) != canonical_json(&expected) {
            return Err(TestError::DefaultConfigurationMismatch { expected, actual });
        }

        Ok(())
    }

    /// Run every scenario, stopping at the first failure
    fn test_load(&self) -> TestResult<()> {
        let scenarios = self.load_scenarios();
        tracing::info!(
            "Running {} load scenario(s) for section '{}'",
            scenarios.len(),
            self.configuration_section_name()
        );

        for (index, scenario) in scenarios.iter().enumerate() {
            let name = scenario
                .label()
                .map(str::to_string)
                .unwrap_or_else(|| format!("#{}", index));
            tracing::debug!("Running load scenario {}", name);

            match self.run_scenario(scenario) {
                Ok(()) => tracing::debug!("Load scenario {} passed", name),
                Err(error @ (TestError::Core(_) | TestError::Config(_))) => return Err(error),
                Err(error) => {
                    tracing::warn!("Load scenario {} failed: {}", name, error);
                    return Err(TestError::Scenario {
                        scenario: name,
                        source: Box::new(error),
                    });
                }
            }
        }

        Ok(())
    }
}

/// Generate `#[test]` functions for an [`IntegrationTestCase`]
///
/// ```rust,ignore
/// integration_test_case!(cache, CacheIntegrationTest);
/// ```
///
/// expands to a `cache` module with `config_section_name`,
/// `default_configuration` and `load` tests.
#[macro_export]
macro_rules! integration_test_case {
    ($module:ident, $case:expr) => {
        mod $module {
            #[allow(unused_imports)]
            use super::*;
            use $crate::IntegrationTestCase as _;

            #[test]
            fn config_section_name() {
                $crate::logging::init_test_logging();
                if let Err(error) = ($case).test_config_section_name() {
                    panic!("{}", error);
                }
            }

            #[test]
            fn default_configuration() {
                $crate::logging::init_test_logging();
                if let Err(error) = ($case).test_default_configuration() {
                    panic!("{}", error);
                }
            }

            #[test]
            fn load() {
                $crate::logging::init_test_logging();
                if let Err(error) = ($case).test_load() {
                    panic!("{}", error);
                }
            }
        }
    };
}
