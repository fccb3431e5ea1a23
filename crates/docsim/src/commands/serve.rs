//! Serve command: MCP server on stdio.

use anyhow::Context;
use clap::Args;
use docsim_core::config::Config;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use crate::server::DocsimServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {}

/// Run the MCP server until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(
    _args: ServeArgs,
    max_input_bytes: Option<usize>,
    config: Config,
) -> anyhow::Result<()> {
    info!("starting MCP server on stdio");

    let service = DocsimServer::new(&config, max_input_bytes)
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await.context("MCP server terminated abnormally")?;

    info!("MCP server stopped");
    Ok(())
}
