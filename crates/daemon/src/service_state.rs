use std::sync::Arc;

use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use url::Url;

use common::prelude::{hash_password, PasswordHash, PasswordParams, VaultError};

use crate::database::{Database, DatabaseSetupError};
use crate::notifier::{self, Notifier, NotifyError};
use crate::service_config::Config;
use crate::state::SESSION_KEY_SIZE;

/// Main service state - shared by every request handler
#[derive(Clone)]
pub struct State {
    database: Database,
    cookie_key: Key,
    notifier: Arc<dyn Notifier>,
    password_params: PasswordParams,
    placeholder_hash: PasswordHash,
    max_upload_bytes: usize,
}

// Checked against when a login names an unknown account
const PLACEHOLDER_PASSWORD: &str = "docvault-placeholder";

impl State {
    pub async fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Setup database
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                // check that the path exists
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                // parse the path into a URL
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        // 2. Setup cookie signing key
        let cookie_key = match config.session_key {
            Some(ref bytes) => {
                Key::try_from(bytes.as_slice()).map_err(|_| StateSetupError::InvalidSessionKey)?
            }
            None => {
                tracing::warn!("no session key configured, sessions will not survive a restart");
                let mut bytes = [0u8; SESSION_KEY_SIZE];
                getrandom::getrandom(&mut bytes).map_err(|_| StateSetupError::RandomUnavailable)?;
                Key::from(&bytes)
            }
        };

        // 3. Check the password costs before accepting any registration
        config
            .password_params
            .validate()
            .map_err(StateSetupError::InvalidPasswordParams)?;
        let placeholder_hash = hash_password(PLACEHOLDER_PASSWORD, &config.password_params)
            .map_err(StateSetupError::InvalidPasswordParams)?;

        // 4. Setup notifier
        let notifier = notifier::from_config(config.notify_webhook.as_ref())?;
        match config.notify_webhook {
            Some(ref url) => tracing::info!("Confirmations posted to {}", url),
            None => tracing::info!("Confirmations logged only"),
        }

        Ok(Self {
            database,
            cookie_key,
            notifier,
            password_params: config.password_params,
            placeholder_hash,
            max_upload_bytes: config.max_upload_bytes,
        })
    }

    /// Replace the notifier, e.g. with a recording one in tests
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn notifier(&self) -> Arc<dyn Notifier> {
        self.notifier.clone()
    }

    pub fn password_params(&self) -> &PasswordParams {
        &self.password_params
    }

    /// Hash verified in place of a stored one when the username is unknown
    pub fn placeholder_hash(&self) -> &PasswordHash {
        &self.placeholder_hash
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes
    }
}

impl AsRef<Database> for State {
    fn as_ref(&self) -> &Database {
        self.database()
    }
}

impl FromRef<State> for Database {
    fn from_ref(state: &State) -> Self {
        state.database.clone()
    }
}

impl FromRef<State> for Key {
    fn from_ref(state: &State) -> Self {
        state.cookie_key.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
    #[error("Session key must be at least 64 bytes")]
    InvalidSessionKey,
    #[error("Invalid password parameters: {0}")]
    InvalidPasswordParams(VaultError),
    #[error("Secure random source unavailable")]
    RandomUnavailable,
    #[error("Notifier setup error: {0}")]
    Notifier(#[from] NotifyError),
}
