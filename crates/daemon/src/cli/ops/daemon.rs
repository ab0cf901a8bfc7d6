use std::path::PathBuf;

use clap::Args;

use docvault_daemon::process::ProcessError;
use docvault_daemon::spawn_service;
use docvault_daemon::state::{AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Daemon {
    /// Override the web server port (default from config)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Default log level, overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,
}

#[derive(Debug, thiserror::Error)]
pub enum DaemonError {
    #[error("state error: {0}")]
    StateError(#[from] StateError),

    #[error("daemon failed: {0}")]
    Failed(#[from] ProcessError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Daemon {
    type Error = DaemonError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        // Load state from config path (or default ~/.docvault)
        let state = AppState::load(ctx.config_path.clone())?;

        let mut config = state.to_service_config()?;
        if let Some(port) = self.port {
            config.listen_port = port;
        }
        config.log_level = self.log_level;
        config.log_dir = self.log_dir.clone();

        spawn_service(&config).await?;
        Ok("daemon ended".to_string())
    }
}
