use std::path::PathBuf;

use common::storage::s3::S3Settings;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CorsConfig {
    /// Allowed origins. Empty means any origin.
    #[serde(default)]
    pub allow_origins: Vec<String>,
    pub max_age: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors: CorsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    /// Lifetime of issued tokens, in days.
    pub token_ttl_days: i64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Filesystem,
    S3,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FilesystemStorageConfig {
    pub root: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Base URL under which stored objects are publicly reachable.
    pub public_base_url: String,
    pub filesystem: FilesystemStorageConfig,
    pub s3: Option<S3Settings>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Size ceiling for PDF lessons and papers, in bytes.
    pub max_document_bytes: u64,
    /// Size ceiling for profile images, in bytes.
    pub max_image_bytes: u64,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_document_bytes: 10 * 1024 * 1024,
            max_image_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunEnvironment {
    #[default]
    Development,
    Production,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub environment: RunEnvironment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub storage: StorageConfig,
    pub upload: UploadConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let defaults = UploadConfig::default();
        let s = Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5000)?
            .set_default("server.cors.allow_origins", Vec::<String>::new())?
            .set_default("server.cors.max_age", 3600)?
            .set_default("auth.token_ttl_days", 30)?
            .set_default("storage.backend", "filesystem")?
            .set_default("storage.public_base_url", "http://127.0.0.1:5000/media")?
            .set_default("storage.filesystem.root", "./media")?
            .set_default("upload.max_document_bytes", defaults.max_document_bytes)?
            .set_default("upload.max_image_bytes", defaults.max_image_bytes)?
            // Load from config/config.toml
            .add_source(File::with_name("config/config").required(false))
            // Override from environment (e.g., TUTORDESK__AUTH__JWT_SECRET)
            .add_source(Environment::with_prefix("TUTORDESK").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
