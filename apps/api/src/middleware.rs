use axum::extract::{Request, State};
use axum::http::{HeaderMap, header};
use axum::middleware::Next;
use axum::response::Response;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ticketsense_core::AppError;
use tracing::warn;

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn require_basic_auth(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    let Some((username, password)) = basic_credentials(request.headers()) else {
        return Err(AppError::Unauthorized("authentication required".to_owned()).into());
    };

    if !state
        .credentials
        .verify(username.as_str(), password.as_str())
    {
        warn!(path = %request.uri().path(), "rejected invalid basic credentials");
        return Err(AppError::Unauthorized("invalid credentials".to_owned()).into());
    }

    Ok(next.run(request).await)
}

pub async fn reject_foreign_origins(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> ApiResult<Response> {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        let allowed = origin
            .to_str()
            .is_ok_and(|origin| state.origin_policy.allows(origin));
        if !allowed {
            warn!(origin = ?origin, "rejected request from foreign origin");
            return Err(AppError::Forbidden("origin not allowed".to_owned()).into());
        }
    }

    Ok(next.run(request).await)
}

/// Reads `Authorization: Basic <base64(user:password)>`.
fn basic_credentials(headers: &HeaderMap) -> Option<(String, String)> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }

    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_owned(), password.to_owned()))
}
