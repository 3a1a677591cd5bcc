//! Google Tasks MCP Library
//!
//! Exposes a Google Tasks account as six MCP tools: list task lists, list,
//! create, update, complete and delete tasks.
//!
//! # Usage as Library
//!
//! ```rust,ignore
//! use google_tasks_mcp::{DisplayZone, GoogleTasksServer};
//!
//! let server = GoogleTasksServer::new(backend, DisplayZone::Utc);
//! mcp_common::serve_stdio(server).await?;
//! ```
//!
//! - Due dates are read and shown in one display zone fixed at startup
//! - The backend is a trait object, so tests and other stores can plug in

pub mod auth;
pub mod backend;
pub mod config;
pub mod due;
pub mod format;
pub mod handlers;
pub mod params;
pub mod server;
pub mod tools;
pub mod types;

pub use backend::{BackendError, BackendResult, TasksBackend};
pub use due::DisplayZone;
pub use server::GoogleTasksServer;
pub use types::*;
