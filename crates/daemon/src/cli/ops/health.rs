use clap::Args;

use docvault_daemon::state::AppState;

#[derive(Args, Debug, Clone)]
pub struct Health;

#[derive(Debug, thiserror::Error)]
pub enum HealthError {
    #[error("Health check failed: {0}")]
    Failed(String),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Health {
    type Error = HealthError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut lines = Vec::new();
        let mut healthy = true;

        // 1. Check config directory
        lines.push("Config:".to_string());
        match AppState::load(ctx.config_path.clone()) {
            Ok(state) => {
                lines.push(format!("  directory:    {}", state.docvault_dir.display()));
                lines.push("  config.toml:  OK".to_string());
                lines.push("  db.sqlite:    OK".to_string());
                match state.load_session_key() {
                    Ok(_) => lines.push("  session.key:  OK".to_string()),
                    Err(e) => {
                        healthy = false;
                        lines.push(format!("  session.key:  {}", e));
                    }
                }
                lines.push(format!("  listen_port:  {}", state.config.listen_port));
            }
            Err(e) => {
                lines.push(format!("  error: {}", e));
            }
        }

        // 2. Check the server's status endpoints
        lines.push(String::new());
        lines.push(format!("Server ({}):", ctx.remote));

        for (label, path) in [("livez: ", "/_status/livez"), ("readyz:", "/_status/readyz")] {
            match ctx.client.get(ctx.endpoint(path)).send().await {
                Ok(resp) if resp.status().is_success() => {
                    lines.push(format!("  {} OK", label));
                }
                Ok(resp) => {
                    healthy = false;
                    lines.push(format!("  {} UNHEALTHY ({})", label, resp.status()));
                }
                Err(_) => {
                    healthy = false;
                    lines.push(format!("  {} NOT REACHABLE", label));
                }
            }
        }

        let report = lines.join("\n");
        if healthy {
            Ok(report)
        } else {
            Err(HealthError::Failed(format!("\n{}", report)))
        }
    }
}
