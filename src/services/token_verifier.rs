// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer credential verification.
//!
//! A credential is either the configured development bypass literal or a
//! signed JWT. HS* tokens are checked against the shared secret; asymmetric
//! tokens are only accepted when a remote key set is configured.

use crate::config::Config;
use crate::models::Identity;
use crate::services::jwks::JwksCache;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

/// Reasons a credential is rejected. Every variant maps to 401.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header required")]
    MissingCredential,

    #[error("malformed credential")]
    MalformedCredential,

    #[error("unsupported signing algorithm")]
    UnsupportedAlgorithm,

    #[error("invalid token signature")]
    BadSignature,

    #[error("token expired")]
    Expired,

    #[error("token issuer mismatch")]
    IssuerMismatch,

    #[error("token has no subject")]
    MissingSubject,

    #[error("token verification unavailable")]
    KeySetUnavailable,
}

impl AuthError {
    /// Stable name for structured logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::MissingCredential => "missing",
            AuthError::MalformedCredential => "malformed",
            AuthError::UnsupportedAlgorithm => "unsupported_algorithm",
            AuthError::BadSignature => "bad_signature",
            AuthError::Expired => "expired",
            AuthError::IssuerMismatch => "issuer_mismatch",
            AuthError::MissingSubject => "missing_subject",
            AuthError::KeySetUnavailable => "key_set_unavailable",
        }
    }
}

/// Claims read from a verified token. Everything is optional so that each
/// absence maps to its own rejection.
#[derive(Debug, Deserialize)]
struct Claims {
    sub: Option<String>,
    /// NumericDate: may be fractional or negative.
    exp: Option<f64>,
    iss: Option<String>,
}

/// Verifies bearer credentials and yields the caller's identity.
pub struct TokenVerifier {
    dev_bypass_token: Option<String>,
    secret: Option<DecodingKey>,
    expected_issuer: Option<String>,
    jwks: Option<Arc<JwksCache>>,
}

impl TokenVerifier {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let jwks = config
            .jwks_url
            .as_deref()
            .map(JwksCache::new)
            .transpose()?
            .map(Arc::new);

        tracing::info!(
            dev_bypass = config.dev_bypass_token.is_some(),
            shared_secret = config.jwt_secret.is_some(),
            jwks = jwks.is_some(),
            expected_issuer = ?config.expected_issuer,
            "Initialized token verifier"
        );

        Ok(Self {
            dev_bypass_token: config.dev_bypass_token.clone(),
            secret: config.jwt_secret.as_deref().map(DecodingKey::from_secret),
            expected_issuer: config
                .expected_issuer
                .as_deref()
                .map(canonicalize_issuer),
            jwks,
        })
    }

    /// Key set used for asymmetric tokens, if one is configured.
    pub fn jwks(&self) -> Option<&Arc<JwksCache>> {
        self.jwks.as_ref()
    }

    /// Verify a bearer credential.
    ///
    /// Only the remote key-set lookup suspends; every other check is CPU-only.
    pub async fn verify(&self, credential: &str) -> Result<Identity, AuthError> {
        if credential.is_empty() {
            return Err(AuthError::MissingCredential);
        }

        if self.is_dev_bypass(credential) {
            return Ok(Identity::dev_placeholder());
        }

        let header = decode_header(credential).map_err(|_| AuthError::MalformedCredential)?;

        if is_symmetric(header.alg) {
            let key = self
                .secret
                .as_ref()
                .ok_or(AuthError::UnsupportedAlgorithm)?;
            return self.verify_signed(credential, key, header.alg);
        }

        let jwks = self.jwks.as_ref().ok_or(AuthError::UnsupportedAlgorithm)?;
        let kid = header.kid.ok_or(AuthError::MalformedCredential)?;
        let key = jwks.decoding_key_for_kid(&kid, header.alg).await?;
        self.verify_signed(credential, key.as_ref(), header.alg)
    }

    fn is_dev_bypass(&self, credential: &str) -> bool {
        self.dev_bypass_token
            .as_deref()
            .is_some_and(|dev| bool::from(credential.as_bytes().ct_eq(dev.as_bytes())))
    }

    fn verify_signed(
        &self,
        token: &str,
        key: &DecodingKey,
        alg: Algorithm,
    ) -> Result<Identity, AuthError> {
        // Claims are checked by hand so each failure keeps its own kind.
        let mut validation = Validation::new(alg);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_aud = false;

        let data = decode::<Claims>(token, key, &validation).map_err(|e| map_jwt_error(e.kind()))?;

        check_claims(data.claims, self.expected_issuer.as_deref(), now_unix_secs())
    }
}

fn check_claims(
    claims: Claims,
    expected_issuer: Option<&str>,
    now: u64,
) -> Result<Identity, AuthError> {
    match claims.exp {
        Some(exp) if exp > now as f64 => {}
        _ => return Err(AuthError::Expired),
    }

    if let (Some(iss), Some(expected)) = (claims.iss.as_deref(), expected_issuer) {
        if canonicalize_issuer(iss) != expected {
            return Err(AuthError::IssuerMismatch);
        }
    }

    claims
        .sub
        .and_then(Identity::new)
        .ok_or(AuthError::MissingSubject)
}

fn map_jwt_error(kind: &ErrorKind) -> AuthError {
    match kind {
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidKeyFormat
        | ErrorKind::InvalidRsaKey(_)
        | ErrorKind::InvalidEcdsaKey => AuthError::BadSignature,
        ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
            AuthError::UnsupportedAlgorithm
        }
        ErrorKind::ExpiredSignature => AuthError::Expired,
        ErrorKind::InvalidIssuer => AuthError::IssuerMismatch,
        _ => AuthError::MalformedCredential,
    }
}

fn is_symmetric(alg: Algorithm) -> bool {
    matches!(alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)
}

fn canonicalize_issuer(issuer: &str) -> String {
    issuer.trim_end_matches('/').to_string()
}

fn now_unix_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}
