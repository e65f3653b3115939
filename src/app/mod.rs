mod wiring;

use crate::{cli, context, rest, storage};
use anyhow::{Context as AnyhowContext, Result};
use std::path::Path;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// The running service: configuration plus the storage handle shared with
/// every request.
pub struct App {
    ctx: context::Context,
    storage: storage::SqliteStorage,
    shutdown: CancellationToken,
}

impl App {
    pub fn from_cli() -> Result<Self> {
        let cli = cli::parse();

        crate::tracing::set_log_file(cli.log_file.as_deref().map(Path::new))
            .context("opening log file")?;

        let ctx = context::Context::from_cli(&cli).context("invalid configuration")?;
        log_startup_info(&ctx);

        let storage = wiring::init_storage(&ctx)?;

        Ok(Self::new(ctx, storage))
    }

    fn new(ctx: context::Context, storage: storage::SqliteStorage) -> Self {
        Self {
            ctx,
            storage,
            shutdown: CancellationToken::new(),
        }
    }

    pub async fn run_server(&self) -> Result<()> {
        let mut rest_handle = self.spawn_rest_server();

        let early_exit = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                log::info!("🧨 Ctrl-C received, shutting down");
                None
            }
            result = &mut rest_handle => Some(result),
        };

        self.shutdown.cancel();
        let result = match early_exit {
            Some(result) => result,
            None => rest_handle.await,
        };

        match result {
            Ok(Ok(())) => {
                log::info!("✅ Shutdown complete");
                Ok(())
            }
            Ok(Err(e)) => {
                log::error!("REST server error: {:#}", e);
                Err(e)
            }
            Err(e) => {
                log::error!("REST server task failed: {}", e);
                Err(e.into())
            }
        }
    }

    fn spawn_rest_server(&self) -> JoinHandle<Result<()>> {
        let addr = self.ctx.api_listen;
        let storage = self.storage.clone();
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move { rest::serve(addr, storage, shutdown).await })
    }
}

fn log_startup_info(ctx: &context::Context) {
    log::info!("🚀 Starting feedback service");
    log::info!("📂 Database: {}", ctx.database_path.display());
    log::info!("🌐 REST API: http://{}", ctx.api_listen);
    if let Some(path) = ctx.log_file.as_deref() {
        log::info!("📝 Log file: {}", path);
    }
}

pub async fn run() -> Result<()> {
    let app = App::from_cli()?;
    app.run_server().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn run_server_stops_when_shutdown_is_cancelled() {
        let dir = TempDir::new().unwrap();
        let ctx = context::Context {
            database_path: dir.path().join("feedback.sqlite"),
            api_listen: "127.0.0.1:0".parse().unwrap(),
            log_file: None,
            reset: false,
        };
        let storage = wiring::init_storage(&ctx).unwrap();
        let app = App::new(ctx, storage);

        let handle = app.spawn_rest_server();
        app.shutdown.cancel();

        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn rest_server_reports_bind_failures() {
        let dir = TempDir::new().unwrap();
        let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let ctx = context::Context {
            database_path: dir.path().join("feedback.sqlite"),
            api_listen: taken.local_addr().unwrap(),
            log_file: None,
            reset: false,
        };
        let storage = wiring::init_storage(&ctx).unwrap();
        let app = App::new(ctx, storage);

        assert!(app.run_server().await.is_err());
    }
}
