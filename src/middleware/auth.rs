// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer authentication middleware.
//!
//! The verified identity is stored in the request extensions as an
//! [`AuthUser`] and read back by handlers through its extractor, so each
//! request carries its own identity.

use crate::error::AppError;
use crate::models::Identity;
use crate::services::AuthError;
use crate::AppState;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap, Method},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

/// Path that is served without authentication.
pub const HEALTH_PATH: &str = "/api/health";

/// Authenticated caller, available to every handler behind [`require_auth`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub identity: Identity,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AppError::Unauthorized(AuthError::MissingCredential))
    }
}

/// Middleware that requires a valid bearer credential.
///
/// Preflight requests and the health check pass through unauthenticated.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Response {
    if request.method() == Method::OPTIONS || request.uri().path() == HEALTH_PATH {
        return next.run(request).await;
    }

    let identity = match authenticate(&state, request.headers()).await {
        Ok(identity) => identity,
        Err(err) => {
            tracing::info!(
                path = %request.uri().path(),
                kind = err.kind(),
                "Rejected unauthenticated request"
            );
            return AppError::Unauthorized(err).into_response();
        }
    };

    request.extensions_mut().insert(AuthUser { identity });
    next.run(request).await
}

async fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Identity, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MalformedCredential)?;

    let credential = bearer_credential(value)?;
    state.token_verifier.verify(credential).await
}

/// Extract `<credential>` from exactly `Bearer <credential>`.
fn bearer_credential(value: &str) -> Result<&str, AuthError> {
    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(credential), None) if !credential.is_empty() => Ok(credential),
        _ => Err(AuthError::MalformedCredential),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_credential_accepts_exact_form() {
        assert_eq!(bearer_credential("Bearer salud"), Ok("salud"));
        assert_eq!(bearer_credential("Bearer a.b.c"), Ok("a.b.c"));
    }

    #[test]
    fn bearer_credential_rejects_other_shapes() {
        for value in [
            "",
            "Bearer",
            "Bearer ",
            "bearer salud",
            "Basic salud",
            "Bearer  salud",
            "Bearer salud extra",
            " Bearer salud",
            "Bearersalud",
        ] {
            assert_eq!(
                bearer_credential(value),
                Err(AuthError::MalformedCredential),
                "{value:?}"
            );
        }
    }
}
