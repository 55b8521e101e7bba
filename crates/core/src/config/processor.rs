use crate::config::schema::{ArrayNode, LeafKind, LeafNode, Node, TreeBuilder, ENABLED_OPTION};
use crate::config::validation::ConfigError;
use regex::Regex;
use serde_json::{Map, Value};

/// Resolved configuration of one section
pub type ConfigMap = Map<String, Value>;

/// Anything exposing a configuration tree
pub trait ConfigurationDefinition {
    /// Tree the raw configuration is resolved against
    fn config_tree_builder(&self) -> &TreeBuilder;
}

impl ConfigurationDefinition for TreeBuilder {
    fn config_tree_builder(&self) -> &TreeBuilder {
        self
    }
}

/// Merges raw configuration maps and resolves them against a tree
#[derive(Debug, Default, Clone, Copy)]
pub struct Processor;

impl Processor {
    pub fn new() -> Self {
        Self
    }

    /// Resolve `configs` against the tree of `definition`
    pub fn process_configuration<D>(
        &self,
        definition: &D,
        configs: &[Value],
    ) -> Result<ConfigMap, ConfigError>
    where
        D: ConfigurationDefinition + ?Sized,
    {
        self.process(definition.config_tree_builder().root(), configs)
    }

    /// Merge `configs` left to right, then apply defaults and validate
    ///
    /// Later scalars override earlier ones, lists append and nested groups merge
    /// recursively. An empty slice resolves to the defaults of the tree.
    pub fn process(&self, root: &ArrayNode, configs: &[Value]) -> Result<ConfigMap, ConfigError> {
        let path = root.name.clone();
        let mut merged = Map::new();

        for config in configs {
            let normalized = normalize_array(root, config, &path)?;
            merge_array(root, &mut merged, normalized, &path)?;
        }

        tracing::debug!(
            "Processing configuration '{}' from {} raw map(s)",
            root.name,
            configs.len()
        );

        finalize_array(root, merged, &path)
    }
}

fn child_path(path: &str, name: &str) -> String {
    format!("{}.{}", path, name)
}

fn normalize_array(node: &ArrayNode, value: &Value, path: &str) -> Result<ConfigMap, ConfigError> {
    let mut map = match (value, node.toggle_default()) {
        (Value::Object(map), _) => map.clone(),
        (Value::Null, Some(_)) => return Ok(enabled_map(true)),
        (Value::Bool(enabled), Some(_)) => return Ok(enabled_map(*enabled)),
        (Value::Null, None) => Map::new(),
        (other, _) => return Err(ConfigError::invalid_type(path, "array", other)),
    };

    if node.toggle_default().is_some() && !map.is_empty() && !map.contains_key(ENABLED_OPTION) {
        map.insert(ENABLED_OPTION.to_string(), Value::Bool(true));
    }

    let mut normalized = Map::new();
    for (key, value) in map {
        let value = match node.child(&key) {
            Some(Node::Array(child)) => {
                Value::Object(normalize_array(child, &value, &child_path(path, &key))?)
            }
            Some(Node::Leaf(_)) => value,
            None => {
                return Err(ConfigError::unrecognized_option(
                    path,
                    key,
                    &node.child_names(),
                ))
            }
        };
        normalized.insert(key, value);
    }

    Ok(normalized)
}

fn enabled_map(enabled: bool) -> ConfigMap {
    let mut map = Map::new();
    map.insert(ENABLED_OPTION.to_string(), Value::Bool(enabled));
    map
}

fn merge_array(
    node: &ArrayNode,
    left: &mut ConfigMap,
    right: ConfigMap,
    path: &str,
) -> Result<(), ConfigError> {
    for (key, value) in right {
        let current = left.remove(&key);
        let merged = match (node.child(&key), current) {
            (Some(Node::Array(child)), Some(Value::Object(mut existing))) => match value {
                Value::Object(incoming) => {
                    merge_array(child, &mut existing, incoming, &child_path(path, &key))?;
                    Value::Object(existing)
                }
                other => other,
            },
            (Some(Node::Leaf(leaf)), Some(existing)) => merge_leaf(leaf, existing, value),
            (_, _) => value,
        };
        left.insert(key, merged);
    }

    Ok(())
}

fn merge_leaf(leaf: &LeafNode, left: Value, right: Value) -> Value {
    match (&leaf.kind, left, right) {
        (LeafKind::List(_), Value::Array(mut items), Value::Array(more)) => {
            items.extend(more);
            Value::Array(items)
        }
        (LeafKind::Map(_), Value::Object(mut entries), Value::Object(more)) => {
            entries.extend(more);
            Value::Object(entries)
        }
        (_, _, right) => right,
    }
}

fn finalize_array(node: &ArrayNode, mut raw: ConfigMap, path: &str) -> Result<ConfigMap, ConfigError> {
    let mut resolved = Map::new();

    for child in node.children() {
        let name = child.name();
        let value_path = child_path(path, name);
        match child {
            Node::Array(array) => {
                let value = match raw.remove(name) {
                    Some(Value::Object(map)) => map,
                    Some(other) => return Err(ConfigError::invalid_type(value_path, "array", &other)),
                    None => Map::new(),
                };
                resolved.insert(
                    name.to_string(),
                    Value::Object(finalize_array(array, value, &value_path)?),
                );
            }
            Node::Leaf(leaf) => match raw.remove(name) {
                Some(value) => {
                    validate_leaf(leaf, &leaf.kind, &value, &value_path)?;
                    resolved.insert(name.to_string(), value);
                }
                None if leaf.required => return Err(ConfigError::missing_required(value_path)),
                None => {
                    if let Some(default) = leaf.effective_default() {
                        resolved.insert(name.to_string(), default);
                    }
                }
            },
        }
    }

    Ok(resolved)
}

fn validate_leaf(leaf: &LeafNode, kind: &LeafKind, value: &Value, path: &str) -> Result<(), ConfigError> {
    let accepted = match kind {
        LeafKind::Scalar => !value.is_array() && !value.is_object(),
        LeafKind::String => value.is_string(),
        LeafKind::Integer => value.is_i64() || value.is_u64(),
        LeafKind::Float => value.is_number(),
        LeafKind::Boolean => value.is_boolean(),
        LeafKind::Variable => true,
        LeafKind::Enum(allowed) => {
            if !allowed.contains(value) {
                return Err(ConfigError::invalid_value(
                    path,
                    value.to_string(),
                    kind.describe(),
                ));
            }
            true
        }
        LeafKind::List(item) => {
            let items = value
                .as_array()
                .ok_or_else(|| ConfigError::invalid_type(path, kind.describe(), value))?;
            for (index, entry) in items.iter().enumerate() {
                validate_leaf(leaf, item, entry, &format!("{}.{}", path, index))?;
            }
            return Ok(());
        }
        LeafKind::Map(item) => {
            let entries = value
                .as_object()
                .ok_or_else(|| ConfigError::invalid_type(path, kind.describe(), value))?;
            for (key, entry) in entries {
                validate_leaf(leaf, item, entry, &child_path(path, key))?;
            }
            return Ok(());
        }
    };

    if !accepted {
        return Err(ConfigError::invalid_type(path, kind.describe(), value));
    }

    check_bounds(leaf, value, path)?;
    check_pattern(leaf, value, path)
}

fn check_bounds(leaf: &LeafNode, value: &Value, path: &str) -> Result<(), ConfigError> {
    let Some(number) = value.as_f64() else {
        return Ok(());
    };

    let below = leaf.min.map_or(false, |min| number < min);
    let above = leaf.max.map_or(false, |max| number > max);
    if below || above {
        let min = leaf.min.map_or("-inf".to_string(), |min| min.to_string());
        let max = leaf.max.map_or("+inf".to_string(), |max| max.to_string());
        return Err(ConfigError::invalid_value(
            path,
            value.to_string(),
            format!("number between {} and {}", min, max),
        ));
    }

    Ok(())
}

fn check_pattern(leaf: &LeafNode, value: &Value, path: &str) -> Result<(), ConfigError> {
    let (Some(pattern), Some(text)) = (&leaf.pattern, value.as_str()) else {
        return Ok(());
    };

    let regex = Regex::new(pattern).map_err(|error| ConfigError::InvalidPattern {
        path: path.to_string(),
        pattern: pattern.clone(),
        message: error.to_string(),
    })?;

    if !regex.is_match(text) {
        return Err(ConfigError::invalid_value(
            path,
            text,
            format!("value matching '{}'", pattern),
        ));
    }

    Ok(())
}
