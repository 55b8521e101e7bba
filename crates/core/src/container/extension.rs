use std::fmt::Debug;

/// Named configuration consumer registered on a container
///
/// Prepending integrations push configuration to extensions by alias before
/// the extensions themselves load.
pub trait Extension: Debug + Send + Sync {
    /// Name under which configuration is collected
    fn alias(&self) -> &str;

    /// Namespace of the extension's configuration files
    fn namespace(&self) -> &str;
}
