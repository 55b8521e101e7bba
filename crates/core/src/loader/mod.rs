pub mod locator;
pub mod yaml;

pub use locator::FileLocator;
pub use yaml::FileLoader;
