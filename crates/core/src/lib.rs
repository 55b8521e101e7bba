pub mod config;
pub mod container;
pub mod errors;
pub mod integration;
pub mod loader;

// Re-export key types for convenience
pub use config::{ConfigError, ConfigMap, ConfigurationDefinition, Processor, TreeBuilder};
pub use container::{Alias, Argument, ContainerBuilder, Definition, Extension, Tag};
pub use errors::CoreError;
pub use integration::{Integration, PrependIntegration};
pub use loader::{FileLoader, FileLocator};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get toolkit version
pub fn version() -> &'static str {
    VERSION
}
