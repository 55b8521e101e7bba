use crate::container::{Argument, ContainerBuilder, Definition, Tag};
use crate::errors::CoreError;
use crate::loader::FileLocator;
use serde::Deserialize;
use serde_json::{Map, Value};
use serde_yaml::Mapping;
use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads service definitions and parameters from YAML files
///
/// ```yaml
/// imports:
///   - common.yaml
/// parameters:
///   cache.default_ttl: 60
/// services:
///   cache.store:
///     class: app::cache::MemoryStore
///     arguments: ['%cache.default_ttl%', '@clock']
///     tags: [cache.pool, { name: monitor, priority: 10 }]
///   cache: '@cache.store'
///   app.cache: { alias: cache.store, public: true }
///   app::Clock: ~
/// ```
///
/// A `~` entry registers a definition whose class is its id.
#[derive(Debug, Default)]
pub struct FileLoader {
    locator: FileLocator,
    loading: RefCell<Vec<PathBuf>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ServiceFile {
    #[serde(default)]
    imports: Vec<String>,
    #[serde(default)]
    parameters: Mapping,
    #[serde(default)]
    services: Mapping,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ServiceEntry {
    Alias(String),
    Definition(DefinitionEntry),
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct DefinitionEntry {
    alias: Option<String>,
    class: Option<String>,
    #[serde(default)]
    arguments: Vec<Value>,
    #[serde(default)]
    tags: Vec<TagEntry>,
    public: Option<bool>,
    autowire: Option<bool>,
    autoconfigure: Option<bool>,
    #[serde(rename = "abstract")]
    is_abstract: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TagEntry {
    Name(String),
    Attributes(Map<String, Value>),
}

impl FileLoader {
    pub fn new(locator: FileLocator) -> Self {
        Self {
            locator,
            loading: RefCell::new(Vec::new()),
        }
    }

    pub fn locator(&self) -> &FileLocator {
        &self.locator
    }

    /// Locate `resource` and register everything it declares into `container`
    pub fn load(&self, resource: &str, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        let path = self.locator.locate(resource, self.current_dir().as_deref())?;
        self.load_path(&path, container)
    }

    /// Register the contents of an in-memory YAML document
    ///
    /// `name` only labels errors; imports resolve against the locator.
    pub fn load_str(
        &self,
        name: &str,
        contents: &str,
        container: &mut ContainerBuilder,
    ) -> Result<(), CoreError> {
        let file: ServiceFile = if contents.trim().is_empty() {
            ServiceFile::default()
        } else {
            serde_yaml::from_str::<Option<ServiceFile>>(contents)
                .map_err(|error| CoreError::loader(name, error.to_string()))?
                .unwrap_or_default()
        };

        for import in &file.imports {
            self.load(import, container)?;
        }

        for (key, value) in file.parameters {
            let parameter = mapping_key(name, &key)?;
            let value: Value = serde_yaml::from_value(value)?;
            container.set_parameter(parameter, value);
        }

        for (key, value) in file.services {
            let id = mapping_key(name, &key)?;
            let entry = serde_yaml::from_value::<Option<ServiceEntry>>(value)
                .map_err(|error| CoreError::invalid_definition(id.as_str(), error.to_string()))?;
            register_entry(container, id, entry)?;
        }

        Ok(())
    }

    fn load_path(&self, path: &Path, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        let resource = path.display().to_string();
        if self.loading.borrow().iter().any(|loading| loading == path) {
            return Err(CoreError::loader(resource, "circular import detected"));
        }

        let contents = fs::read_to_string(path)?;
        tracing::info!("Loading service definitions from {}", resource);

        self.loading.borrow_mut().push(path.to_path_buf());
        let result = self.load_str(&resource, &contents, container);
        self.loading.borrow_mut().pop();

        result
    }

    fn current_dir(&self) -> Option<PathBuf> {
        self.loading
            .borrow()
            .last()
            .and_then(|path| path.parent())
            .map(Path::to_path_buf)
    }
}

fn mapping_key(resource: &str, key: &serde_yaml::Value) -> Result<String, CoreError> {
    key.as_str()
        .map(str::to_string)
        .ok_or_else(|| CoreError::loader(resource, format!("keys must be strings, got {:?}", key)))
}

fn register_entry(
    container: &mut ContainerBuilder,
    id: String,
    entry: Option<ServiceEntry>,
) -> Result<(), CoreError> {
    let entry = match entry {
        None => {
            let class = id.clone();
            container.register(id, class);
            return Ok(());
        }
        Some(ServiceEntry::Alias(target)) => {
            let target = target.strip_prefix('@').ok_or_else(|| {
                CoreError::invalid_definition(
                    id.as_str(),
                    format!("a string entry must reference a service as '@id', got '{}'", target),
                )
            })?;
            container.set_alias(id, target)?;
            return Ok(());
        }
        Some(ServiceEntry::Definition(entry)) => entry,
    };

    if let Some(target) = entry.alias {
        let public = entry.public.unwrap_or(false);
        container.set_alias(id, target)?.set_public(public);
        return Ok(());
    }

    let mut definition = Definition::default();
    definition.class = Some(entry.class.unwrap_or_else(|| id.clone()));
    definition.arguments = entry.arguments.into_iter().map(Argument::from_raw).collect();
    definition.public = entry.public.unwrap_or(false);
    definition.autowired = entry.autowire.unwrap_or(false);
    definition.autoconfigured = entry.autoconfigure.unwrap_or(false);
    definition.is_abstract = entry.is_abstract.unwrap_or(false);

    for tag in entry.tags {
        definition.add_tag(tag_from_entry(&id, tag)?);
    }

    container.set_definition(id, definition);
    Ok(())
}

fn tag_from_entry(id: &str, entry: TagEntry) -> Result<Tag, CoreError> {
    match entry {
        TagEntry::Name(name) => Ok(Tag::new(name)),
        TagEntry::Attributes(mut attributes) => match attributes.remove("name") {
            Some(Value::String(name)) => Ok(Tag {
                name,
                attributes,
            }),
            _ => Err(CoreError::invalid_definition(
                id,
                "a tag must have a string 'name' attribute",
            )),
        },
    }
}
