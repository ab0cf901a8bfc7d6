//! Application state management for DocVault config directories
//!
//! This module handles creating and loading the config directory
//! (`~/.docvault` or a custom path) that holds the configuration file,
//! the SQLite database and the cookie signing key.

use std::{fs, path::PathBuf};

use common::prelude::PasswordParams;
use serde::{Deserialize, Serialize};
use url::Url;

pub const APP_NAME: &str = "docvault";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const DB_FILE_NAME: &str = "db.sqlite";
pub const SESSION_KEY_FILE_NAME: &str = "session.key";

/// Size of the cookie signing key in bytes
pub const SESSION_KEY_SIZE: usize = 64;

/// Configuration stored in config.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Port for the web server
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
    /// Largest document accepted by the upload form, in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Optional endpoint that receives registration confirmations
    #[serde(default)]
    pub notify_webhook: Option<Url>,
    /// Argon2id costs for new password hashes
    #[serde(default)]
    pub password: PasswordParams,
}

fn default_listen_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    100 * 1024 * 1024
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_port: default_listen_port(),
            max_upload_bytes: default_max_upload_bytes(),
            notify_webhook: None,
            password: PasswordParams::default(),
        }
    }
}

/// Application state representing a DocVault config directory
#[derive(Debug, Clone)]
pub struct AppState {
    /// Path to the docvault directory (~/.docvault or custom)
    pub docvault_dir: PathBuf,
    /// Path to the SQLite database
    pub db_path: PathBuf,
    /// Path to the cookie signing key
    pub session_key_path: PathBuf,
    /// Path to the config file
    pub config_path: PathBuf,
    /// Loaded configuration
    pub config: AppConfig,
}

impl AppState {
    /// Get the docvault directory path (custom or default ~/.docvault)
    pub fn docvault_dir(custom_path: Option<PathBuf>) -> Result<PathBuf, StateError> {
        if let Some(path) = custom_path {
            return Ok(path);
        }

        let home = dirs::home_dir().ok_or(StateError::NoHomeDirectory)?;
        Ok(home.join(format!(".{}", APP_NAME)))
    }

    /// Initialize a new docvault state directory
    pub fn init(
        custom_path: Option<PathBuf>,
        config: Option<AppConfig>,
    ) -> Result<Self, StateError> {
        let docvault_dir = Self::docvault_dir(custom_path)?;

        if docvault_dir.exists() {
            return Err(StateError::AlreadyInitialized);
        }

        fs::create_dir_all(&docvault_dir)?;

        // Generate and save the cookie signing key
        let mut key = [0u8; SESSION_KEY_SIZE];
        getrandom::getrandom(&mut key).map_err(|_| StateError::RandomUnavailable)?;
        let session_key_path = docvault_dir.join(SESSION_KEY_FILE_NAME);
        fs::write(&session_key_path, hex::encode(key))?;

        let config = config.unwrap_or_default();
        let config_path = docvault_dir.join(CONFIG_FILE_NAME);
        fs::write(&config_path, toml::to_string_pretty(&config)?)?;

        // Touch the database file; the service runs migrations on startup
        let db_path = docvault_dir.join(DB_FILE_NAME);
        fs::write(&db_path, "")?;

        Ok(Self {
            docvault_dir,
            db_path,
            session_key_path,
            config_path,
            config,
        })
    }

    /// Load existing state from the docvault directory
    pub fn load(custom_path: Option<PathBuf>) -> Result<Self, StateError> {
        let docvault_dir = Self::docvault_dir(custom_path)?;

        if !docvault_dir.exists() {
            return Err(StateError::NotInitialized);
        }

        let db_path = docvault_dir.join(DB_FILE_NAME);
        let session_key_path = docvault_dir.join(SESSION_KEY_FILE_NAME);
        let config_path = docvault_dir.join(CONFIG_FILE_NAME);

        if !db_path.exists() {
            return Err(StateError::MissingFile(DB_FILE_NAME.to_string()));
        }
        if !session_key_path.exists() {
            return Err(StateError::MissingFile(SESSION_KEY_FILE_NAME.to_string()));
        }
        if !config_path.exists() {
            return Err(StateError::MissingFile(CONFIG_FILE_NAME.to_string()));
        }

        let config_toml = fs::read_to_string(&config_path)?;
        let config: AppConfig = toml::from_str(&config_toml)?;

        Ok(Self {
            docvault_dir,
            db_path,
            session_key_path,
            config_path,
            config,
        })
    }

    /// Load the cookie signing key from the key file
    pub fn load_session_key(&self) -> Result<Vec<u8>, StateError> {
        let encoded = fs::read_to_string(&self.session_key_path)?;
        let key = hex::decode(encoded.trim())
            .map_err(|e| StateError::InvalidSessionKey(e.to_string()))?;
        if key.len() < SESSION_KEY_SIZE {
            return Err(StateError::InvalidSessionKey(format!(
                "expected at least {} bytes, got {}",
                SESSION_KEY_SIZE,
                key.len()
            )));
        }
        Ok(key)
    }

    /// Convert to a ServiceConfig for the daemon
    pub fn to_service_config(&self) -> Result<crate::ServiceConfig, StateError> {
        Ok(crate::ServiceConfig {
            listen_port: self.config.listen_port,
            sqlite_path: Some(self.db_path.clone()),
            session_key: Some(self.load_session_key()?),
            max_upload_bytes: self.config.max_upload_bytes,
            password_params: self.config.password,
            notify_webhook: self.config.notify_webhook.clone(),
            log_level: tracing::Level::INFO,
            log_dir: None,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("docvault directory not initialized. Run 'docvault init' first or use --config-path")]
    NotInitialized,

    #[error("docvault directory already initialized")]
    AlreadyInitialized,

    #[error("no home directory found")]
    NoHomeDirectory,

    #[error("missing required file: {0}")]
    MissingFile(String),

    #[error("invalid session key: {0}")]
    InvalidSessionKey(String),

    #[error("secure random source unavailable")]
    RandomUnavailable,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    TomlDe(#[from] toml::de::Error),
}
