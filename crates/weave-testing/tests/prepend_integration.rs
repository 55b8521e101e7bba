use weave_core::config::{ArrayNode, ConfigMap};
use weave_core::{ContainerBuilder, CoreError, FileLoader, Integration, PrependIntegration};
use weave_testing::prelude::*;

struct FormIntegration;

impl Integration for FormIntegration {
    fn config_section_name(&self) -> &str {
        "form"
    }

    fn add_configuration(&self, node: &mut ArrayNode) {
        node.boolean("csrf_protection").default_value(true);
        node.string("theme").default_value("form_div_layout");
    }

    fn load(
        &self,
        _config: &ConfigMap,
        _loader: &FileLoader,
        container: &mut ContainerBuilder,
    ) -> Result<(), CoreError> {
        container.register("form.factory", "app::form::Factory");
        Ok(())
    }
}

impl PrependIntegration for FormIntegration {
    fn prepend(&self, config: &ConfigMap, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        let option = |name: &str| config.get(name).cloned().unwrap_or(JsonValue::Null);

        container.prepend_extension_config(
            "framework",
            json!({"csrf_protection": option("csrf_protection")}),
        )?;

        if container.has_extension("twig") {
            container.prepend_extension_config("twig", json!({"form_themes": [option("theme")]}))?;
        }

        Ok(())
    }
}

fn resolved(raw: JsonValue) -> anyhow::Result<ConfigMap> {
    struct FormTest;

    impl IntegrationTestCase for FormTest {
        type Integration = FormIntegration;

        fn create_integration(&self) -> FormIntegration {
            FormIntegration
        }

        fn configuration_section_name(&self) -> &str {
            "form"
        }

        fn default_configuration(&self) -> JsonValue {
            json!({"csrf_protection": true, "theme": "form_div_layout"})
        }

        fn load_scenarios(&self) -> Vec<Scenario> {
            vec![Scenario::from_configs(vec![])
                .expect_service(ServiceExpectation::service("form.factory"))]
        }
    }

    FormTest.test_default_configuration()?;
    FormTest.test_load()?;
    Ok(FormTest.process_configuration(&[raw])?)
}

#[test]
fn prepends_to_every_known_extension() -> anyhow::Result<()> {
    init_test_logging();
    let config = resolved(json!({"theme": "bootstrap_5_layout"}))?;

    let mut container = ContainerBuilder::new();
    container.register_extension(Box::new(StubExtension::new("framework")));
    container.register_extension(Box::new(StubExtension::new("twig")));
    container.load_from_extension("framework", json!({"secret": "s3cr3t"}))?;

    FormIntegration.prepend(&config, &mut container)?;

    assert_container_extension_configuration(
        &container,
        &json!({
            "framework": [{"csrf_protection": true}, {"secret": "s3cr3t"}],
            "twig": [{"form_themes": ["bootstrap_5_layout"]}]
        }),
    )?;
    Ok(())
}

#[test]
fn skips_absent_extensions() -> anyhow::Result<()> {
    let config = resolved(json!({"csrf_protection": false}))?;

    let mut container = ContainerBuilder::new();
    container.register_extension(Box::new(StubExtension::new("framework")));

    FormIntegration.prepend(&config, &mut container)?;

    assert_container_extension_configuration(
        &container,
        &json!({"framework": [{"csrf_protection": false}]}),
    )?;

    let error = assert_container_extension_configuration(
        &container,
        &json!({"framework": [{"csrf_protection": false}], "twig": []}),
    )
    .unwrap_err();
    assert!(matches!(error, TestError::ExtensionConfigurationMismatch { .. }));
    Ok(())
}

#[test]
fn prepending_requires_the_framework_extension() -> anyhow::Result<()> {
    let mut container = ContainerBuilder::new();

    let error = FormIntegration
        .prepend(&ConfigMap::new(), &mut container)
        .unwrap_err();
    assert!(error.is_configuration());
    assert!(error.to_string().contains("framework"), "{}", error);

    let error = FormIntegration
        .prepend(&resolved(json!({}))?, &mut container)
        .unwrap_err();
    assert!(error.is_configuration());
    Ok(())
}

#[test]
fn unresolved_configuration_prepends_nulls() -> anyhow::Result<()> {
    let mut container = ContainerBuilder::new();
    container.register_extension(Box::new(StubExtension::new("framework")));

    FormIntegration.prepend(&ConfigMap::new(), &mut container)?;

    assert_container_extension_configuration(
        &container,
        &json!({"framework": [{"csrf_protection": null}]}),
    )?;
    Ok(())
}

#[test]
fn hand_written_contribution_checks() -> anyhow::Result<()> {
    let mut container = ContainerBuilder::new();
    FormIntegration.load(&ConfigMap::new(), &FileLoader::default(), &mut container)?;
    container.set_alias("container", "service_container")?;

    assert_container_services(
        &[ServiceExpectation::service("form.factory")],
        &container,
        &[("service_container".to_string(), vec!["container".to_string()])],
    )?;
    assert_container_parameters(&serde_json::Map::new(), &container)?;
    Ok(())
}
