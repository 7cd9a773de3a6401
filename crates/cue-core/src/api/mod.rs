pub mod config;
pub mod error;
pub mod physics;
pub mod types;
