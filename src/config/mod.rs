/// Database connection and schema creation
pub mod database;

/// Server configuration from config.toml and environment variables
pub mod server;

pub use server::{ServerConfig, load_server_config};
