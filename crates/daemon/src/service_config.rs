use std::path::PathBuf;

use common::prelude::PasswordParams;
use url::Url;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// Port for the web server
    pub listen_port: u16,

    // data store configuration
    /// a path to a sqlite database, if not set then an
    ///  in-memory database will be used
    pub sqlite_path: Option<PathBuf>,

    // session configuration
    /// bytes used to sign session cookies (at least 64),
    ///  if not set then a new key will be generated and
    ///  sessions will not survive a restart
    pub session_key: Option<Vec<u8>>,

    // vault configuration
    /// Largest document accepted by the upload form, in bytes
    pub max_upload_bytes: usize,
    /// Argon2id costs for new password hashes
    pub password_params: PasswordParams,

    // notifications
    /// Endpoint that receives registration confirmations,
    ///  if not set confirmations are only logged
    pub notify_webhook: Option<Url>,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_port: 5000,
            sqlite_path: None,
            session_key: None,
            max_upload_bytes: 100 * 1024 * 1024,
            password_params: PasswordParams::default(),
            notify_webhook: None,
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
