//! HTTP Basic authentication against stored users.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use tracing::{debug, trace};
use workflow::{authenticate, Caller, WorkflowError};

use crate::error::AppError;
use crate::schemas::AppState;

/// The authenticated caller. Handlers that take this extractor reject
/// anonymous requests with 401.
#[derive(Debug, Clone, Copy)]
pub struct Authenticated(pub Caller);

#[async_trait]
impl FromRequestParts<AppState> for Authenticated {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        trace!("Resolving caller from Authorization header");
        let Some(value) = parts.headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
            debug!("Request without usable Authorization header");
            return Err(AppError(WorkflowError::Unauthenticated));
        };

        let Some((email, password)) = parse_basic(value) else {
            debug!("Malformed Basic credentials");
            return Err(AppError(WorkflowError::Unauthenticated));
        };

        let caller = authenticate(&state.db, &email, &password).await?;
        debug!("Authenticated user {} with role {}", caller.id, caller.role);
        Ok(Authenticated(caller))
    }
}

/// Splits a `Basic <base64(email:password)>` header value.
pub fn parse_basic(value: &str) -> Option<(String, String)> {
    let encoded = value.strip_prefix("Basic ")?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some((email.to_string(), password.to_string()))
}
