//! Extension double for integrations that prepend configuration

use weave_core::Extension;

/// Extension answering `alias()` and `namespace()` with a fixed name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StubExtension {
    name: String,
}

impl StubExtension {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Extension for StubExtension {
    fn alias(&self) -> &str {
        &self.name
    }

    fn namespace(&self) -> &str {
        &self.name
    }
}
