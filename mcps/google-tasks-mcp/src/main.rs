//! Google Tasks MCP - task lists and tasks as MCP tools over stdio
//!
//! Run with `--auth` once to print a consent URL, then `--token <CODE>` to
//! store the token. Afterwards the server starts directly.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;

use google_tasks_mcp::auth::{ClientSecret, Credentials, OAuthClient, TokenStore};
use google_tasks_mcp::backend::GoogleTasksBackend;
use google_tasks_mcp::config::{Cli, Config};
use google_tasks_mcp::GoogleTasksServer;

#[tokio::main]
async fn main() -> Result<()> {
    mcp_common::init_tracing("google_tasks_mcp")?;

    let cli = Cli::parse();
    let settings = Config::load()?.resolve(&cli)?;

    let secret = ClientSecret::load(&settings.credentials)?;
    let oauth = OAuthClient::new(secret);
    let store = TokenStore::new(&settings.token_file);

    if cli.auth {
        println!("AUTH_URL:{}", oauth.auth_url()?);
        return Ok(());
    }

    if let Some(code) = cli.token.as_deref() {
        let token = oauth
            .exchange_code(code)
            .await
            .context("unable to exchange authorization code")?;
        store.save(&token)?;
        println!("Token saved to: {}", store.path().display());
        return Ok(());
    }

    tracing::info!("Starting Google Tasks MCP server");

    let credentials = Credentials::load(oauth, store)
        .await
        .context("unable to obtain an access token")?;
    let backend =
        GoogleTasksBackend::with_base_url(Arc::new(credentials), settings.api_base_url.clone());

    tracing::info!("Displaying due dates in {}", settings.zone);

    let server = GoogleTasksServer::new(Arc::new(backend), settings.zone);
    mcp_common::serve_stdio(server).await?;

    tracing::info!("Google Tasks MCP server stopped");

    Ok(())
}
