pub mod builder;
pub mod definition;
pub mod extension;
pub mod registry;

pub use builder::{ContainerBuilder, SERVICE_CONTAINER_ID};
pub use definition::{Alias, Argument, Definition, Tag};
pub use extension::Extension;
pub use registry::Entries;
