pub mod config;
pub mod datasets;
pub mod error;
pub mod fetch;
pub mod table;
pub mod write;
