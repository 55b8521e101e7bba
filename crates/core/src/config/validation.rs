use serde_json::Value;
use thiserror::Error;

/// Configuration error raised while processing raw configuration against a tree
///
/// Every variant carries the dotted path of the offending option, rooted at the
/// section name (`cache.pool.size`).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("The child config \"{path}\" must be configured.")]
    MissingRequired { path: String },

    #[error("Invalid type for path \"{path}\". Expected {expected}, but got {actual}.")]
    InvalidType {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid value for path \"{path}\": {value}. Expected: {expected}")]
    InvalidValue {
        path: String,
        value: String,
        expected: String,
    },

    #[error("Unrecognized option \"{option}\" under \"{path}\". Available options are: {available}.")]
    UnrecognizedOption {
        path: String,
        option: String,
        available: String,
    },

    #[error("Invalid validation pattern \"{pattern}\" for path \"{path}\": {message}")]
    InvalidPattern {
        path: String,
        pattern: String,
        message: String,
    },
}

impl ConfigError {
    /// Create a missing required option error
    pub fn missing_required(path: impl Into<String>) -> Self {
        Self::MissingRequired { path: path.into() }
    }

    /// Create an invalid type error from the offending value
    pub fn invalid_type(path: impl Into<String>, expected: impl Into<String>, actual: &Value) -> Self {
        Self::InvalidType {
            path: path.into(),
            expected: expected.into(),
            actual: type_name(actual).to_string(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        path: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            path: path.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Create an unrecognized option error
    pub fn unrecognized_option(
        path: impl Into<String>,
        option: impl Into<String>,
        available: &[&str],
    ) -> Self {
        Self::UnrecognizedOption {
            path: path.into(),
            option: option.into(),
            available: available.join(", "),
        }
    }

    /// Path of the option the error refers to
    pub fn path(&self) -> &str {
        match self {
            Self::MissingRequired { path }
            | Self::InvalidType { path, .. }
            | Self::InvalidValue { path, .. }
            | Self::UnrecognizedOption { path, .. }
            | Self::InvalidPattern { path, .. } => path,
        }
    }
}

/// Human readable JSON type name used in error messages
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(number) if number.is_f64() => "float",
        Value::Number(_) => "int",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_messages_name_the_path() {
        let error = ConfigError::invalid_type("cache.ttl", "int", &json!("soon"));
        assert_eq!(error.path(), "cache.ttl");
        assert_eq!(
            error.to_string(),
            "Invalid type for path \"cache.ttl\". Expected int, but got string."
        );

        let error = ConfigError::unrecognized_option("cache", "tll", &["enabled", "ttl"]);
        assert_eq!(
            error.to_string(),
            "Unrecognized option \"tll\" under \"cache\". Available options are: enabled, ttl."
        );
    }

    #[test]
    fn test_type_names() {
        assert_eq!(type_name(&json!(1)), "int");
        assert_eq!(type_name(&json!(1.5)), "float");
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!({})), "object");
    }
}
