use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::{fmt, EnvFilter};

/// Logs go to stderr; stdout carries the stdio transport's protocol stream.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

/// Wraps each HTTP request in a span so MCP audit events emitted while handling
/// it carry the request method and path.
pub async fn request_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let span = info_span!("http_request", method = %method, path = %path);
    let started_at = Instant::now();

    let response = next.run(request).instrument(span.clone()).await;
    let status = response.status().as_u16();

    span.in_scope(|| {
        info!(
            status,
            duration_ms = started_at.elapsed().as_millis(),
            "request summary"
        );

        if status == 401 {
            warn!("authentication failure");
        }
    });

    response
}
