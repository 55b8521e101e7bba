pub mod processor;
pub mod schema;
pub mod validation;

pub use processor::*;
pub use schema::*;
pub use validation::*;
