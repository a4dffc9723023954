//! Sonos Actions REST API
//!
//! Serves `sonos-actions` commands over HTTP. Each request names a speaker,
//! an action and up to three arguments in its path:
//!
//! ```text
//! GET /Kitchen/volume/25
//! {"speaker":"Kitchen","action":"volume","args":["25"],"exit_code":0,"result":"","error_msg":""}
//! ```
//!
//! Commands run on tokio's blocking pool, one device handle per request.
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sonos_actions::Config;
//! use sonos_rest_api::RestServer;
//!
//! let config = Config::load()?;
//! let server = RestServer::start(Arc::new(directory), config.rest.port).await?;
//! tokio::signal::ctrl_c().await?;
//! server.shutdown().await?;
//! ```

pub mod directory;
pub mod error;
pub mod routes;
pub mod server;

pub use directory::SpeakerDirectory;
pub use error::{RestError, Result};
pub use routes::{execute, routes, CommandRequest, CommandResponse, MAX_ARGS};
pub use server::RestServer;

/// Version reported by `GET /`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
