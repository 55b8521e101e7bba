use crate::container::definition::{Alias, Definition};
use crate::container::extension::Extension;
use crate::container::registry::Entries;
use crate::errors::CoreError;
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};

/// Id of the synthetic definition every container carries for itself
pub const SERVICE_CONTAINER_ID: &str = "service_container";

/// Mutable registry of service definitions, aliases and parameters
///
/// Integrations populate a builder; everything enumerates in registration order.
#[derive(Debug)]
pub struct ContainerBuilder {
    definitions: Entries<Definition>,
    aliases: Entries<Alias>,
    parameters: Entries<Value>,
    extensions: Entries<Box<dyn Extension>>,
    extension_configs: HashMap<String, Vec<Value>>,
}

impl ContainerBuilder {
    /// Create a builder holding only the synthetic `service_container` definition
    pub fn new() -> Self {
        let mut builder = Self {
            definitions: Entries::new(),
            aliases: Entries::new(),
            parameters: Entries::new(),
            extensions: Entries::new(),
            extension_configs: HashMap::new(),
        };

        builder
            .definitions
            .insert(SERVICE_CONTAINER_ID, Definition::default())
            .set_synthetic(true)
            .set_public(true);

        builder
    }

    /// Register a definition for `class` under `id`
    pub fn register(&mut self, id: impl Into<String>, class: impl Into<String>) -> &mut Definition {
        self.set_definition(id, Definition::new(class))
    }

    /// Register or replace a definition; an alias with the same id is dropped
    pub fn set_definition(&mut self, id: impl Into<String>, definition: Definition) -> &mut Definition {
        let id = id.into();
        if self.aliases.remove(&id).is_some() {
            tracing::debug!("Definition '{}' replaces the alias of the same id", id);
        }
        tracing::debug!("Registering service definition: {}", id);
        self.definitions.insert(id, definition)
    }

    pub fn has_definition(&self, id: &str) -> bool {
        self.definitions.contains_key(id)
    }

    pub fn get_definition(&self, id: &str) -> Result<&Definition, CoreError> {
        self.definitions
            .get(id)
            .ok_or_else(|| CoreError::service_not_found(id))
    }

    pub fn get_definition_mut(&mut self, id: &str) -> Result<&mut Definition, CoreError> {
        self.definitions
            .get_mut(id)
            .ok_or_else(|| CoreError::service_not_found(id))
    }

    /// Look up a definition by id or through a chain of aliases
    pub fn find_definition(&self, id: &str) -> Result<&Definition, CoreError> {
        let target = self.resolve_alias(id)?;
        self.get_definition(&target)
    }

    pub fn remove_definition(&mut self, id: &str) -> Option<Definition> {
        let removed = self.definitions.remove(id);
        if removed.is_some() {
            tracing::debug!("Removed service definition: {}", id);
        }
        removed
    }

    /// Every definition, in registration order
    pub fn definitions(&self) -> &Entries<Definition> {
        &self.definitions
    }

    /// Point `alias` at `target`; a definition with the alias id is dropped
    pub fn set_alias(
        &mut self,
        alias: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<&mut Alias, CoreError> {
        let alias = alias.into();
        let target = target.into();
        if alias == target {
            return Err(CoreError::CircularAlias {
                path: format!("{} -> {}", alias, target),
            });
        }

        if self.definitions.remove(&alias).is_some() {
            tracing::debug!("Alias '{}' replaces the definition of the same id", alias);
        }
        tracing::debug!("Registering alias: {} -> {}", alias, target);
        Ok(self.aliases.insert(alias, Alias::new(target)))
    }

    pub fn has_alias(&self, id: &str) -> bool {
        self.aliases.contains_key(id)
    }

    pub fn get_alias(&self, id: &str) -> Result<&Alias, CoreError> {
        self.aliases
            .get(id)
            .ok_or_else(|| CoreError::service_not_found(id))
    }

    pub fn remove_alias(&mut self, id: &str) -> Option<Alias> {
        self.aliases.remove(id)
    }

    /// Every alias, in registration order
    pub fn aliases(&self) -> &Entries<Alias> {
        &self.aliases
    }

    /// Follow aliases from `id` until reaching an id that is not an alias
    pub fn resolve_alias(&self, id: &str) -> Result<String, CoreError> {
        let mut current = id.to_string();
        let mut seen = HashSet::new();
        let mut path = vec![current.clone()];

        while let Some(alias) = self.aliases.get(&current) {
            if !seen.insert(current.clone()) {
                return Err(CoreError::CircularAlias {
                    path: path.join(" -> "),
                });
            }
            current = alias.target().to_string();
            path.push(current.clone());
        }

        Ok(current)
    }

    /// True when `id` is a definition or an alias
    pub fn has(&self, id: &str) -> bool {
        self.has_definition(id) || self.has_alias(id)
    }

    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        tracing::debug!("Setting parameter: {}", name);
        self.parameters.insert(name, value.into());
    }

    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    pub fn get_parameter(&self, name: &str) -> Result<&Value, CoreError> {
        self.parameters
            .get(name)
            .ok_or_else(|| CoreError::parameter_not_found(name))
    }

    /// Every parameter, in registration order
    pub fn parameters(&self) -> &Entries<Value> {
        &self.parameters
    }

    /// Ids of services carrying the tag `name`, with the attributes of each occurrence
    pub fn find_tagged_service_ids(&self, name: &str) -> Vec<(String, Vec<Map<String, Value>>)> {
        self.definitions
            .iter()
            .filter(|(_, definition)| definition.has_tag(name))
            .map(|(id, definition)| {
                let attributes = definition.tag(name).into_iter().cloned().collect();
                (id.to_string(), attributes)
            })
            .collect()
    }

    /// Register an extension under its alias
    pub fn register_extension(&mut self, extension: Box<dyn Extension>) {
        let alias = extension.alias().to_string();
        tracing::debug!("Registering extension: {}", alias);
        self.extensions.insert(alias, extension);
    }

    pub fn has_extension(&self, alias: &str) -> bool {
        self.extensions.contains_key(alias)
    }

    pub fn get_extension(&self, alias: &str) -> Result<&dyn Extension, CoreError> {
        self.extensions
            .get(alias)
            .map(|extension| extension.as_ref())
            .ok_or_else(|| CoreError::configuration(format!("No extension registered as '{}'", alias)))
    }

    /// Aliases of registered extensions, in registration order
    pub fn extensions(&self) -> Vec<&str> {
        self.extensions.keys().collect()
    }

    /// Append configuration for an extension
    pub fn load_from_extension(&mut self, alias: &str, config: Value) -> Result<(), CoreError> {
        self.ensure_extension(alias)?;
        self.extension_configs
            .entry(alias.to_string())
            .or_default()
            .push(config);
        Ok(())
    }

    /// Put configuration in front of everything already collected for an extension
    pub fn prepend_extension_config(&mut self, alias: &str, config: Value) -> Result<(), CoreError> {
        self.ensure_extension(alias)?;
        tracing::debug!("Prepending configuration for extension: {}", alias);
        self.extension_configs
            .entry(alias.to_string())
            .or_default()
            .insert(0, config);
        Ok(())
    }

    /// Configuration collected for an extension, first to last
    pub fn extension_config(&self, alias: &str) -> &[Value] {
        self.extension_configs
            .get(alias)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn ensure_extension(&self, alias: &str) -> Result<(), CoreError> {
        if self.has_extension(alias) {
            Ok(())
        } else {
            Err(CoreError::configuration(format!(
                "No extension registered as '{}'. Available extensions: {}",
                alias,
                self.extensions().join(", ")
            )))
        }
    }
}

impl Default for ContainerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::definition::Tag;
    use serde_json::json;

    #[derive(Debug)]
    struct NamedExtension(&'static str);

    impl Extension for NamedExtension {
        fn alias(&self) -> &str {
            self.0
        }

        fn namespace(&self) -> &str {
            self.0
        }
    }

    #[test]
    fn test_new_builder_only_knows_itself() {
        let builder = ContainerBuilder::new();

        assert_eq!(
            builder.definitions().keys().collect::<Vec<_>>(),
            vec![SERVICE_CONTAINER_ID]
        );
        assert!(builder.get_definition(SERVICE_CONTAINER_ID).unwrap().synthetic);
        assert!(builder.aliases().is_empty());
        assert!(builder.parameters().is_empty());
    }

    #[test]
    fn test_definitions_enumerate_in_registration_order() {
        let mut builder = ContainerBuilder::new();
        builder.register("mailer", "app::Mailer");
        builder.register("cache.store", "app::Store").set_public(true);

        assert_eq!(
            builder.definitions().keys().collect::<Vec<_>>(),
            vec![SERVICE_CONTAINER_ID, "mailer", "cache.store"]
        );
        assert!(builder.get_definition("cache.store").unwrap().public);
        assert!(builder.get_definition("missing").unwrap_err().is_service_not_found());
    }

    #[test]
    fn test_alias_and_definition_replace_each_other() {
        let mut builder = ContainerBuilder::new();
        builder.register("cache", "app::Legacy");
        builder.register("cache.store", "app::Store");

        builder.set_alias("cache", "cache.store").unwrap();
        assert!(!builder.has_definition("cache"));
        assert_eq!(builder.get_alias("cache").unwrap().target(), "cache.store");

        builder.register("cache", "app::Replacement");
        assert!(!builder.has_alias("cache"));
        assert!(builder.has("cache"));
    }

    #[test]
    fn test_self_alias_is_rejected() {
        let mut builder = ContainerBuilder::new();
        let error = builder.set_alias("cache", "cache").unwrap_err();
        assert!(matches!(error, CoreError::CircularAlias { .. }));
    }

    #[test]
    fn test_find_definition_follows_aliases() {
        let mut builder = ContainerBuilder::new();
        builder.register("cache.store", "app::Store");
        builder.set_alias("cache", "cache.store").unwrap();
        builder.set_alias("app.cache", "cache").unwrap();

        assert_eq!(
            builder.find_definition("app.cache").unwrap().class(),
            Some("app::Store")
        );
        assert_eq!(builder.resolve_alias("app.cache").unwrap(), "cache.store");
    }

    #[test]
    fn test_alias_cycle_is_reported() {
        let mut builder = ContainerBuilder::new();
        builder.set_alias("a", "b").unwrap();
        builder.set_alias("b", "a").unwrap();

        let error = builder.resolve_alias("a").unwrap_err();
        assert!(matches!(error, CoreError::CircularAlias { .. }));
    }

    #[test]
    fn test_parameters() {
        let mut builder = ContainerBuilder::new();
        builder.set_parameter("cache.default_ttl", 120);
        builder.set_parameter("cache.prefix", "app");

        assert_eq!(builder.get_parameter("cache.default_ttl").unwrap(), &json!(120));
        assert!(builder.has_parameter("cache.prefix"));
        assert!(matches!(
            builder.get_parameter("missing"),
            Err(CoreError::ParameterNotFound { .. })
        ));
    }

    #[test]
    fn test_find_tagged_service_ids() {
        let mut builder = ContainerBuilder::new();
        builder
            .register("pool.a", "app::Pool")
            .add_tag(Tag::new("cache.pool").with_attribute("name", "a"));
        builder.register("mailer", "app::Mailer");
        builder
            .register("pool.b", "app::Pool")
            .add_tag(Tag::new("cache.pool"));

        let tagged = builder.find_tagged_service_ids("cache.pool");
        assert_eq!(tagged.len(), 2);
        assert_eq!(tagged[0].0, "pool.a");
        assert_eq!(tagged[0].1[0]["name"], json!("a"));
        assert_eq!(tagged[1].0, "pool.b");
    }

    #[test]
    fn test_extension_configuration_order() {
        let mut builder = ContainerBuilder::new();
        builder.register_extension(Box::new(NamedExtension("framework")));

        builder
            .load_from_extension("framework", json!({"secret": "s3cr3t"}))
            .unwrap();
        builder
            .prepend_extension_config("framework", json!({"cache": {"app": "cache.store"}}))
            .unwrap();

        assert_eq!(builder.extensions(), vec!["framework"]);
        assert_eq!(builder.get_extension("framework").unwrap().namespace(), "framework");
        assert_eq!(
            builder.extension_config("framework"),
            &[json!({"cache": {"app": "cache.store"}}), json!({"secret": "s3cr3t"})]
        );
        assert!(builder.extension_config("twig").is_empty());
        assert!(builder
            .prepend_extension_config("twig", json!({}))
            .unwrap_err()
            .is_configuration());
    }
}
