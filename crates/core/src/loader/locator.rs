use crate::errors::CoreError;
use std::path::{Path, PathBuf};

/// Resolves resource names against a list of search directories
#[derive(Debug, Clone, Default)]
pub struct FileLocator {
    paths: Vec<PathBuf>,
}

impl FileLocator {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }

    /// Search directories, in lookup order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Locate `resource`, looking in `current_dir` first when given
    ///
    /// Absolute paths are returned as is when they exist.
    pub fn locate(&self, resource: &str, current_dir: Option<&Path>) -> Result<PathBuf, CoreError> {
        let candidate = Path::new(resource);
        if candidate.is_absolute() {
            return if candidate.is_file() {
                Ok(candidate.to_path_buf())
            } else {
                Err(self.not_found(resource, current_dir))
            };
        }

        current_dir
            .into_iter()
            .chain(self.paths.iter().map(PathBuf::as_path))
            .map(|dir| dir.join(candidate))
            .find(|path| path.is_file())
            .ok_or_else(|| self.not_found(resource, current_dir))
    }

    fn not_found(&self, resource: &str, current_dir: Option<&Path>) -> CoreError {
        let searched: Vec<String> = current_dir
            .into_iter()
            .chain(self.paths.iter().map(PathBuf::as_path))
            .map(|dir| dir.display().to_string())
            .collect();

        CoreError::ResourceNotFound {
            resource: resource.to_string(),
            searched: if searched.is_empty() {
                "no search paths".to_string()
            } else {
                searched.join(", ")
            },
        }
    }
}
