//! Authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::HeaderMap;
use shared::error::AppError;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;

/// Paths under `/api/` that do not need a bearer token
///
/// The chat socket authenticates with the token carried in its join event,
/// since browsers cannot set headers on a WebSocket upgrade.
const PUBLIC_API_PATHS: [&str; 1] = ["/api/chat/ws"];

/// Validate the bearer token in `headers`
pub(crate) fn authenticate(
    headers: &HeaderMap,
    path: &str,
    jwt_service: &JwtService,
) -> Result<CurrentUser, AppError> {
    let token = match headers
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!(WARN, "auth_missing", path = %path);
            return Err(AppError::not_authenticated());
        }
    };

    verify_token(token, path, jwt_service)
}

/// Validate a raw token (no `Bearer ` prefix)
pub(crate) fn verify_token(
    token: &str,
    path: &str,
    jwt_service: &JwtService,
) -> Result<CurrentUser, AppError> {
    match jwt_service.validate_token(token) {
        Ok(claims) => Ok(CurrentUser::from(claims)),
        Err(e) => {
            security_log!(WARN, "auth_failed", error = %e, path = %path);
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

/// Require a valid `Authorization: Bearer <token>`
///
/// On success the [`CurrentUser`] is inserted into the request extensions.
///
/// # Skipped
///
/// - `OPTIONS *` (CORS preflight)
/// - paths outside `/api/` (health, unknown routes fall through to 404)
/// - [`PUBLIC_API_PATHS`]
pub async fn require_auth(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();
    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || PUBLIC_API_PATHS.contains(&path)
    {
        return Ok(next.run(req).await);
    }

    let user = authenticate(req.headers(), path, &state.jwt_service)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Require the admin role; runs after [`require_auth`]
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(AppError::not_authenticated)?;
    if !user.is_admin() {
        security_log!(
            WARN,
            "admin_required",
            user_id = %user.id,
            role = %user.role,
            path = %req.uri().path()
        );
        return Err(AppError::admin_required());
    }

    Ok(next.run(req).await)
}
