use crate::config::ConfigError;
use thiserror::Error;

/// Core error type for the weave toolkit
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Semantic configuration problem detected by an integration while loading
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Schema violation reported by the configuration processor
    #[error(transparent)]
    InvalidConfiguration(#[from] ConfigError),

    #[error("Service not found: {id}")]
    ServiceNotFound { id: String },

    #[error("Parameter not found: {name}")]
    ParameterNotFound { name: String },

    #[error("Circular alias detected: {path}")]
    CircularAlias { path: String },

    #[error("Invalid definition for service '{id}': {message}")]
    InvalidDefinition { id: String, message: String },

    #[error("Resource '{resource}' not found in: {searched}")]
    ResourceNotFound { resource: String, searched: String },

    #[error("Failed to load '{resource}': {message}")]
    Loader { resource: String, message: String },
}

impl CoreError {
    /// Create a new configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a new service not found error
    pub fn service_not_found(id: impl Into<String>) -> Self {
        Self::ServiceNotFound { id: id.into() }
    }

    /// Create a new parameter not found error
    pub fn parameter_not_found(name: impl Into<String>) -> Self {
        Self::ParameterNotFound { name: name.into() }
    }

    /// Create a new invalid definition error
    pub fn invalid_definition(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidDefinition {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create a new loader error
    pub fn loader(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Loader {
            resource: resource.into(),
            message: message.into(),
        }
    }

    /// Check if the error is a configuration error raised by an integration
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. })
    }

    /// Check if the error comes from schema processing
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }

    /// Check if the error is a missing service error
    pub fn is_service_not_found(&self) -> bool {
        matches!(self, Self::ServiceNotFound { .. })
    }
}
