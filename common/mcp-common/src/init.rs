//! Server initialization utilities
//!
//! Logging always goes to stderr; stdout is reserved for protocol lines.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging for MCP servers
///
/// - Environment-based filtering via `RUST_LOG`
/// - Default level of `info` for the given crate
/// - `LOG_FORMAT=json` switches to structured JSON lines
///
/// # Arguments
///
/// * `crate_name` - Target name of the server crate (e.g., "google_tasks_mcp")
///
/// # Example
///
/// ```rust,ignore
/// mcp_common::init_tracing("google_tasks_mcp")?;
/// ```
pub fn init_tracing(crate_name: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::from_default_env().add_directive(default_directive(crate_name).parse()?);

    let registry = tracing_subscriber::registry().with(filter);

    if json_requested(std::env::var("LOG_FORMAT").ok().as_deref()) {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(false),
            )
            .try_init()?;
    }

    Ok(())
}

fn default_directive(crate_name: &str) -> String {
    format!("{}=info", crate_name.replace('-', "_"))
}

fn json_requested(log_format: Option<&str>) -> bool {
    log_format
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}
