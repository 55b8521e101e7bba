use crate::config::{ArrayNode, ConfigMap};
use crate::container::ContainerBuilder;
use crate::errors::CoreError;
use crate::loader::FileLoader;

/// Unit that contributes a configuration section and the services it configures
///
/// ```rust
/// use weave_core::config::{ArrayNode, ConfigMap};
/// use weave_core::{ContainerBuilder, CoreError, FileLoader, Integration};
///
/// struct CacheIntegration;
///
/// impl Integration for CacheIntegration {
///     fn config_section_name(&self) -> &str {
///         "cache"
///     }
///
///     fn add_configuration(&self, node: &mut ArrayNode) {
///         node.integer("ttl").default_value(60);
///     }
///
///     fn load(
///         &self,
///         config: &ConfigMap,
///         _loader: &FileLoader,
///         container: &mut ContainerBuilder,
///     ) -> Result<(), CoreError> {
///         container.register("cache.store", "app::cache::Store");
///         container.set_alias("cache", "cache.store")?;
///         container.set_parameter("cache.default_ttl", config["ttl"].clone());
///         Ok(())
///     }
/// }
/// ```
pub trait Integration: Send + Sync {
    /// Name of the configuration section the integration owns
    fn config_section_name(&self) -> &str;

    /// Declare the options of the section on its root node
    fn add_configuration(&self, node: &mut ArrayNode);

    /// Register services and parameters from the resolved section
    ///
    /// Fails with [`CoreError::Configuration`] when the resolved configuration
    /// is inconsistent in a way the tree cannot express.
    fn load(
        &self,
        config: &ConfigMap,
        loader: &FileLoader,
        container: &mut ContainerBuilder,
    ) -> Result<(), CoreError>;

    /// Drop definitions loaded from files that the configuration turned off
    fn remove_definitions(&self, container: &mut ContainerBuilder, ids: &[&str]) {
        for id in ids {
            container.remove_definition(id);
        }
    }

    /// Move a definition to a new id, keeping the old id as an alias
    fn rename_definition(
        &self,
        container: &mut ContainerBuilder,
        from: &str,
        to: &str,
    ) -> Result<(), CoreError> {
        let definition = container
            .remove_definition(from)
            .ok_or_else(|| CoreError::service_not_found(from))?;
        container.set_definition(to, definition);
        container.set_alias(from, to)?;
        Ok(())
    }
}

/// Integration that also pushes configuration to other extensions
pub trait PrependIntegration: Integration {
    /// Called before any extension loads, with the integration's own resolved section
    fn prepend(&self, config: &ConfigMap, container: &mut ContainerBuilder) -> Result<(), CoreError>;
}
