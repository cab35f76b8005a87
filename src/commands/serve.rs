//! Serve command: runs the CSV conversion service.

use crate::config::Config;
use crate::server;
use anyhow::Result;
use tracing::info;

/// Runs the HTTP service until interrupted.
pub struct ServeCommand {
    config: Config,
}

impl ServeCommand {
    /// Creates a new serve command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Binds the configured address and serves forever.
    pub async fn execute(&self, bind_override: Option<String>) -> Result<()> {
        let bind = bind_override.unwrap_or_else(|| self.config.bind.clone());
        info!("Starting CSV conversion service on {}", bind);
        server::serve(&bind).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_bind_address() {
        let cmd = ServeCommand::new(Config::default());
        let result = cmd.execute(Some("not-an-address".to_string())).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid bind address"));
    }
}
