//! Transports carrying MCP JSON-RPC messages between a client and the registry
//!
//! Both transports hand raw JSON to the same engine in `mcp::server`; they only
//! differ in how messages are framed and delivered.

pub mod http;
pub mod stdio;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{Config, ConfigError, TransportKind};
use crate::AppState;

pub use http::HttpTransport;
pub use stdio::StdioTransport;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("transport i/o failure")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &'static str;

    /// Runs until the peer goes away or the listener fails.
    async fn serve(&self, state: AppState) -> Result<(), TransportError>;
}

pub fn from_config(config: &Config) -> Result<Box<dyn Transport>, TransportError> {
    match config.transport {
        TransportKind::Stdio => Ok(Box::new(StdioTransport)),
        TransportKind::Http => Ok(Box::new(HttpTransport::new(config.bind_socket()?))),
    }
}
