use serde_json::Value;
use weave_core::config::{ArrayNode, ConfigMap};
use weave_core::{ContainerBuilder, CoreError, FileLoader, Integration};
use weave_testing::prelude::*;

struct CacheIntegration;

impl Integration for CacheIntegration {
    fn config_section_name(&self) -> &str {
        "cache"
    }

    fn add_configuration(&self, node: &mut ArrayNode) {
        node.integer("ttl").default_value(60).min(0);
        node.string("prefix").matches("^[a-z_]*$");
    }

    fn load(
        &self,
        config: &ConfigMap,
        _loader: &FileLoader,
        container: &mut ContainerBuilder,
    ) -> Result<(), CoreError> {
        if config["ttl"] == 0 && config.contains_key("prefix") {
            return Err(CoreError::configuration(
                "a prefix makes no sense for a cache that never stores",
            ));
        }

        container.register("cache.store", "app::cache::Store");
        container.set_alias("cache", "cache.store")?;
        container.set_parameter("cache.default_ttl", config["ttl"].clone());

        if let Some(prefix) = config.get("prefix") {
            container.set_parameter("cache.prefix", prefix.clone());
        }

        Ok(())
    }
}

struct CacheIntegrationTest;

impl IntegrationTestCase for CacheIntegrationTest {
    type Integration = CacheIntegration;

    fn create_integration(&self) -> CacheIntegration {
        CacheIntegration
    }

    fn configuration_section_name(&self) -> &str {
        "cache"
    }

    fn default_configuration(&self) -> JsonValue {
        json!({"ttl": 60})
    }

    fn load_scenarios(&self) -> Vec<Scenario> {
        vec![
            Scenario::new(json!({"ttl": 120}))
                .expect_service(ServiceExpectation::new("cache.store", ["cache"]))
                .expect_parameter("cache.default_ttl", 120),
            Scenario::from_configs(vec![json!({"prefix": "app"}), json!({"ttl": 5})])
                .labeled("prefixed")
                .expect_service(ServiceExpectation::new("cache.store", ["cache"]))
                .expect_parameters([
                    ("cache.default_ttl", json!(5)),
                    ("cache.prefix", json!("app")),
                ]),
        ]
    }
}

integration_test_case!(cache, CacheIntegrationTest);

struct ForgetfulCacheTest;

impl IntegrationTestCase for ForgetfulCacheTest {
    type Integration = CacheIntegration;

    fn create_integration(&self) -> CacheIntegration {
        CacheIntegration
    }

    fn configuration_section_name(&self) -> &str {
        "cache"
    }

    fn default_configuration(&self) -> JsonValue {
        json!({"ttl": "60"})
    }

    fn load_scenarios(&self) -> Vec<Scenario> {
        vec![Scenario::new(json!({"ttl": 120}))
            .expect_service(ServiceExpectation::service("cache.store"))
            .expect_parameter("cache.default_ttl", 120)]
    }
}

#[test]
fn forgotten_alias_is_reported_as_unaccounted() {
    init_test_logging();

    let error = ForgetfulCacheTest.test_load().unwrap_err();

    assert!(matches!(error.root_cause(), TestError::UnaccountedAliases { .. }));
    let message = error.to_string();
    assert!(message.starts_with("Scenario #0 failed:"), "{}", message);
    assert!(message.contains("cache.store → [cache]"), "{}", message);
}

#[test]
fn numeric_string_defaults_are_accepted() {
    ForgetfulCacheTest.test_default_configuration().unwrap();
}

#[test]
fn invalid_configuration_passes_through() {
    let scenario = Scenario::new(json!({"ttl": -5}));

    let error = CacheIntegrationTest.run_scenario(&scenario).unwrap_err();
    match error {
        TestError::Config(config) => assert_eq!(config.path(), "cache.ttl"),
        other => panic!("unexpected error: {}", other),
    }

    let scenario = Scenario::new(json!({"prefix": "App"}));
    assert!(matches!(
        CacheIntegrationTest.run_scenario(&scenario),
        Err(TestError::Config(_))
    ));
}

#[test]
fn configuration_error_from_load_passes_through() {
    let scenario = Scenario::new(json!({"ttl": 0, "prefix": "app"}));

    let error = CacheIntegrationTest.run_scenario(&scenario).unwrap_err();
    assert!(matches!(error, TestError::Core(CoreError::Configuration { .. })));
}

#[test]
fn parameter_values_are_compared_exactly() {
    let scenario = Scenario::new(json!({"ttl": 120}))
        .expect_service(ServiceExpectation::new("cache.store", ["cache"]))
        .expect_parameter("cache.default_ttl", "120");

    let error = CacheIntegrationTest.run_scenario(&scenario).unwrap_err();
    assert!(matches!(error, TestError::ParameterMismatch { .. }));
}

#[test]
fn definition_check_sees_the_loaded_definition() {
    let scenario = Scenario::new(Value::Null)
        .expect_service(
            ServiceExpectation::new("cache.store", ["cache"]).with_definition_check(|definition| {
                if definition.class() == Some("app::cache::Store") && !definition.public {
                    Ok(())
                } else {
                    Err(TestError::assertion("cache.store must be a private app::cache::Store"))
                }
            }),
        )
        .expect_parameter("cache.default_ttl", 60);

    CacheIntegrationTest.run_scenario(&scenario).unwrap();
}

#[test]
fn running_a_scenario_twice_gives_the_same_result() -> anyhow::Result<()> {
    for scenario in CacheIntegrationTest.load_scenarios() {
        CacheIntegrationTest.run_scenario(&scenario)?;
        CacheIntegrationTest.run_scenario(&scenario)?;
    }
    Ok(())
}
