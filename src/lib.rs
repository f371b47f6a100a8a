pub mod config;
pub mod error;
pub mod process;
pub mod report;
pub mod schema;
pub mod template;
