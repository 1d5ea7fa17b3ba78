/// Database connection and schema creation
pub mod database;

/// HTTP server settings from config.toml and the environment
pub mod server;
