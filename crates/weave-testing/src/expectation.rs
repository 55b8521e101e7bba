//! Expectations a scenario declares about an integration's contribution

use crate::TestResult;
use serde_json::{Map, Value};
use std::fmt;
use weave_core::Definition;

/// Check run against the live definition of an expected service
pub type DefinitionCheck = Box<dyn Fn(&Definition) -> TestResult<()> + Send + Sync>;

/// One service an integration is expected to contribute
///
/// `aliases` lists, in registration order, every contributed alias that must
/// resolve to the service.
pub struct ServiceExpectation {
    id: String,
    aliases: Vec<String>,
    definition_check: Option<DefinitionCheck>,
}

impl ServiceExpectation {
    /// Expect service `id` with exactly `aliases`
    ///
    /// # Panics
    ///
    /// Panics when `id` is empty.
    pub fn new<I, S>(id: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        assert!(!id.is_empty(), "an expected service needs a non-empty id");

        Self {
            id,
            aliases: aliases.into_iter().map(Into::into).collect(),
            definition_check: None,
        }
    }

    /// Expect service `id` without aliases
    pub fn service(id: impl Into<String>) -> Self {
        Self::new(id, Vec::<String>::new())
    }

    /// Also run `check` against the contributed definition
    pub fn with_definition_check<F>(mut self, check: F) -> Self
    where
        F: Fn(&Definition) -> TestResult<()> + Send + Sync + 'static,
    {
        self.definition_check = Some(Box::new(check));
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn definition_check(&self) -> Option<&DefinitionCheck> {
        self.definition_check.as_ref()
    }
}

impl fmt::Debug for ServiceExpectation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceExpectation")
            .field("id", &self.id)
            .field("aliases", &self.aliases)
            .field(
                "definition_check",
                &self.definition_check.as_ref().map(|_| "<check_fn>"),
            )
            .finish()
    }
}

/// One parameterized load case: raw input plus the full expected contribution
#[derive(Debug, Default)]
pub struct Scenario {
    label: Option<String>,
    configs: Vec<Value>,
    services: Vec<ServiceExpectation>,
    extra_aliases: Vec<(String, Vec<String>)>,
    parameters: Map<String, Value>,
}

impl Scenario {
    /// Scenario whose raw input is a single configuration map
    pub fn new(configuration: Value) -> Self {
        Self::from_configs(vec![configuration])
    }

    /// Scenario whose raw input is several maps merged in order
    pub fn from_configs(configs: Vec<Value>) -> Self {
        Self {
            configs,
            ..Self::default()
        }
    }

    /// Name reported when the scenario fails
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn expect_service(mut self, service: ServiceExpectation) -> Self {
        self.services.push(service);
        self
    }

    pub fn expect_services<I>(mut self, services: I) -> Self
    where
        I: IntoIterator<Item = ServiceExpectation>,
    {
        self.services.extend(services);
        self
    }

    /// Expect aliases contributed for a service the scenario does not expect
    /// directly, e.g. `service_container`
    pub fn expect_extra_aliases<I, S>(mut self, service: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_aliases
            .push((service.into(), aliases.into_iter().map(Into::into).collect()));
        self
    }

    pub fn expect_parameter(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Expect every `(name, value)` pair of `parameters`
    pub fn expect_parameters<I, K, V>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.parameters.extend(
            parameters
                .into_iter()
                .map(|(name, value)| (name.into(), value.into())),
        );
        self
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn configs(&self) -> &[Value] {
        &self.configs
    }

    pub fn services(&self) -> &[ServiceExpectation] {
        &self.services
    }

    pub fn extra_aliases(&self) -> &[(String, Vec<String>)] {
        &self.extra_aliases
    }

    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }
}
