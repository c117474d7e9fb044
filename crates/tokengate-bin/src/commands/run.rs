// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `run` command.

use tokengate_api::{ApiServer, ApiResult};
use tracing::{error, info, warn};

use crate::cli::{Cli, RunArgs};
use crate::config::ConfigLoader;
use crate::error::{BinError, BinResult};
use crate::shutdown::ShutdownCoordinator;

/// Executes the `run` command to start the server.
///
/// Runs until SIGTERM/SIGINT. In-flight requests get `shutdown_timeout` to
/// drain before the server task is aborted.
pub async fn run(cli: &Cli, args: RunArgs) -> BinResult<()> {
    info!(version = tokengate_api::VERSION, "Starting tokengate");

    let mut config = ConfigLoader::new()
        .load_or_default(&cli.config)
        .map_err(|e| BinError::from(e).with_context("Failed to load configuration"))?;

    if let Some(port) = args.port {
        config.port = port;
    }
    let shutdown_timeout = config.shutdown_timeout;

    let server = ApiServer::builder().config(config).build()?;
    info!(addr = %server.addr(), "Server configured");

    let coordinator = ShutdownCoordinator::new();
    tokio::spawn({
        let coordinator = coordinator.clone();
        async move {
            if let Err(e) = coordinator.wait_for_shutdown().await {
                error!(error = %e, "Signal handling failed, shutting down");
                coordinator.initiate_shutdown();
            }
        }
    });

    let mut server_task = tokio::spawn(server.run_with_shutdown(coordinator.shutdown_signal()));

    tokio::select! {
        result = &mut server_task => return flatten(result),
        _ = coordinator.shutdown_signal() => {}
    }

    info!(timeout = ?shutdown_timeout, "Draining in-flight requests");

    match tokio::time::timeout(shutdown_timeout, &mut server_task).await {
        Ok(result) => flatten(result),
        Err(_) => {
            warn!(timeout = ?shutdown_timeout, "Shutdown timeout elapsed, aborting server");
            server_task.abort();
            Ok(())
        }
    }
}

fn flatten(result: Result<ApiResult<()>, tokio::task::JoinError>) -> BinResult<()> {
    match result {
        Ok(result) => result.map_err(BinError::from),
        Err(e) => Err(BinError::runtime(format!("server task failed: {e}"))),
    }
}
