pub mod compare;
pub mod config;
pub mod process;
pub mod report;
pub mod schema;
