use clap::Args;
use url::Url;

use docvault_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// Port for the web server
    #[arg(long)]
    pub listen_port: Option<u16>,

    /// Largest document accepted by the upload form, in bytes
    #[arg(long)]
    pub max_upload_bytes: Option<usize>,

    /// Endpoint that receives registration confirmations
    #[arg(long)]
    pub notify_webhook: Option<Url>,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    State(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let defaults = AppConfig::default();
        let config = AppConfig {
            listen_port: self.listen_port.unwrap_or(defaults.listen_port),
            max_upload_bytes: self.max_upload_bytes.unwrap_or(defaults.max_upload_bytes),
            notify_webhook: self.notify_webhook.clone(),
            password: defaults.password,
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let lines = [
            format!("Initialized docvault at {}", state.docvault_dir.display()),
            format!("  config:      {}", state.config_path.display()),
            format!("  database:    {}", state.db_path.display()),
            format!("  session key: {}", state.session_key_path.display()),
            format!("  listen port: {}", state.config.listen_port),
        ];
        Ok(lines.join("\n"))
    }
}
