pub mod error;
pub mod models;
pub mod scoring;
pub mod table;
