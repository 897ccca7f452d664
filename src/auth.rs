use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{errors::AuthError, AppState};

/// Rejects requests whose bearer token does not match the configured one.
/// Without a configured token the endpoint is open.
pub async fn require_bearer_token(
    State(state): State<AppState>,
    auth_header: Option<TypedHeader<Authorization<Bearer>>>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let Some(expected) = state.api_token.as_deref() else {
        return Ok(next.run(request).await);
    };

    let Some(TypedHeader(auth)) = auth_header else {
        return Err(AuthError::MissingToken);
    };

    if auth.token() != expected {
        return Err(AuthError::InvalidToken);
    }

    Ok(next.run(request).await)
}
