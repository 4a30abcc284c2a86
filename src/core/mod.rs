/// The `config` module provides configuration handling
pub mod config;

/// The `error` module provides error and advisory types
pub mod error;
