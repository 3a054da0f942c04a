pub mod types;

pub use types::{column_index, SchemaError};
