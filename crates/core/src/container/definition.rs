use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Constructor argument of a service definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Argument {
    /// Literal value
    Value(Value),
    /// Reference to another service (or alias) by id
    Service(String),
    /// Reference to a container parameter by name
    Parameter(String),
}

impl Argument {
    /// Interpret a raw value the way service files write arguments
    ///
    /// `"@id"` references a service, `"%name%"` a parameter and `"@@text"`
    /// escapes a literal leading `@`. Anything else is a literal value.
    pub fn from_raw(value: Value) -> Self {
        if let Value::String(text) = &value {
            if let Some(escaped) = text.strip_prefix("@@") {
                return Argument::Value(Value::String(format!("@{}", escaped)));
            }
            if let Some(id) = text.strip_prefix('@') {
                return Argument::Service(id.to_string());
            }
            if text.len() > 2 && text.starts_with('%') && text.ends_with('%') {
                return Argument::Parameter(text[1..text.len() - 1].to_string());
            }
        }
        Argument::Value(value)
    }

    pub fn service(id: impl Into<String>) -> Self {
        Argument::Service(id.into())
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Argument::Parameter(name.into())
    }

    pub fn value(value: impl Into<Value>) -> Self {
        Argument::Value(value.into())
    }
}

/// Tag attached to a service definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

/// Service definition stored in a [`ContainerBuilder`](crate::container::ContainerBuilder)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Definition {
    /// Implementation class, usually a Rust type path
    pub class: Option<String>,
    pub arguments: Vec<Argument>,
    pub tags: Vec<Tag>,
    pub public: bool,
    pub autowired: bool,
    pub autoconfigured: bool,
    pub is_abstract: bool,
    /// Provided at runtime rather than constructed by the container
    pub synthetic: bool,
}

impl Definition {
    /// Create a definition for a class
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: Some(class.into()),
            ..Self::default()
        }
    }

    pub fn class(&self) -> Option<&str> {
        self.class.as_deref()
    }

    pub fn set_class(&mut self, class: impl Into<String>) -> &mut Self {
        self.class = Some(class.into());
        self
    }

    /// Append a constructor argument
    pub fn add_argument(&mut self, argument: Argument) -> &mut Self {
        self.arguments.push(argument);
        self
    }

    /// Replace the argument at `index`, appending when it is past the end
    pub fn replace_argument(&mut self, index: usize, argument: Argument) -> &mut Self {
        match self.arguments.get_mut(index) {
            Some(slot) => *slot = argument,
            None => self.arguments.push(argument),
        }
        self
    }

    pub fn argument(&self, index: usize) -> Option<&Argument> {
        self.arguments.get(index)
    }

    pub fn add_tag(&mut self, tag: Tag) -> &mut Self {
        self.tags.push(tag);
        self
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }

    /// Attributes of every occurrence of the tag `name`
    pub fn tag(&self, name: &str) -> Vec<&Map<String, Value>> {
        self.tags
            .iter()
            .filter(|tag| tag.name == name)
            .map(|tag| &tag.attributes)
            .collect()
    }

    pub fn set_public(&mut self, public: bool) -> &mut Self {
        self.public = public;
        self
    }

    pub fn set_autowired(&mut self, autowired: bool) -> &mut Self {
        self.autowired = autowired;
        self
    }

    pub fn set_autoconfigured(&mut self, autoconfigured: bool) -> &mut Self {
        self.autoconfigured = autoconfigured;
        self
    }

    pub fn set_abstract(&mut self, is_abstract: bool) -> &mut Self {
        self.is_abstract = is_abstract;
        self
    }

    pub fn set_synthetic(&mut self, synthetic: bool) -> &mut Self {
        self.synthetic = synthetic;
        self
    }
}

/// Alternative id pointing at another service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    target: String,
    pub public: bool,
}

impl Alias {
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            public: false,
        }
    }

    /// Id of the service the alias points at
    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn set_public(&mut self, public: bool) -> &mut Self {
        self.public = public;
        self
    }
}

impl fmt::Display for Alias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_argument_interpretation() {
        assert_eq!(Argument::from_raw(json!("@logger")), Argument::service("logger"));
        assert_eq!(
            Argument::from_raw(json!("%cache.default_ttl%")),
            Argument::parameter("cache.default_ttl")
        );
        assert_eq!(Argument::from_raw(json!("@@home")), Argument::value("@home"));
        assert_eq!(Argument::from_raw(json!("%")), Argument::value("%"));
        assert_eq!(Argument::from_raw(json!(42)), Argument::value(42));
    }

    #[test]
    fn test_definition_builders() {
        let mut definition = Definition::new("app::cache::MemoryStore");
        definition
            .add_argument(Argument::parameter("cache.default_ttl"))
            .add_tag(Tag::new("cache.pool").with_attribute("name", "default"))
            .set_public(true);

        definition.replace_argument(0, Argument::value(30));
        definition.replace_argument(5, Argument::service("clock"));

        assert_eq!(definition.class(), Some("app::cache::MemoryStore"));
        assert_eq!(
            definition.arguments,
            vec![Argument::value(30), Argument::service("clock")]
        );
        assert!(definition.has_tag("cache.pool"));
        assert_eq!(definition.tag("cache.pool")[0]["name"], json!("default"));
        assert!(definition.public);
        assert!(!definition.autowired);
    }

    #[test]
    fn test_alias_displays_target() {
        let mut alias = Alias::new("cache.store");
        alias.set_public(true);

        assert_eq!(alias.to_string(), "cache.store");
        assert_eq!(alias.target(), "cache.store");
        assert!(alias.public);
    }
}
