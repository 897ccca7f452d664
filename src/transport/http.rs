//! HTTP transport: binds the configured socket and serves the axum router.

use std::net::SocketAddr;

use async_trait::async_trait;
use tracing::info;

use crate::transport::{Transport, TransportError};
use crate::{build_app, AppState};

#[derive(Debug, Clone)]
pub struct HttpTransport {
    bind_socket: SocketAddr,
}

impl HttpTransport {
    pub fn new(bind_socket: SocketAddr) -> Self {
        Self { bind_socket }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn serve(&self, state: AppState) -> Result<(), TransportError> {
        let listener = tokio::net::TcpListener::bind(self.bind_socket).await?;

        info!(
            bind_socket = %self.bind_socket,
            server_name = %state.server_name,
            "http transport listening"
        );

        axum::serve(listener, build_app(state).into_make_service()).await?;
        Ok(())
    }
}
