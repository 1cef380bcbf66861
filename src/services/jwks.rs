// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote JSON Web Key Set cache for asymmetric access tokens.
//!
//! The set is fetched lazily, kept for a short TTL (the response's
//! `Cache-Control: max-age`, or five minutes) and refreshed by one task at a
//! time. Readers keep using the previous set while a refresh is in flight.

use crate::services::token_verifier::AuthError;
use anyhow::Context;
use jsonwebtoken::jwk::{Jwk, JwkSet, PublicKeyUse};
use jsonwebtoken::{Algorithm, DecodingKey};
use reqwest::header::CACHE_CONTROL;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(300);

/// Minimum spacing between refreshes forced by an unknown `kid`.
pub const FORCED_REFRESH_COOLDOWN: Duration = Duration::from_secs(30);

/// Signing key from the set, with the algorithm it is restricted to, if any.
#[derive(Clone)]
struct CachedKey {
    key: Arc<DecodingKey>,
    alg: Option<Algorithm>,
}

#[derive(Clone)]
struct JwksCacheEntry {
    keys_by_kid: HashMap<String, CachedKey>,
    expires_at: Instant,
}

/// Key set cache owned by a single `TokenVerifier`.
pub struct JwksCache {
    http_client: reqwest::Client,
    jwks_url: String,
    cache: RwLock<Option<JwksCacheEntry>>,
    /// Serializes refreshes; holds the time of the last fetch attempt.
    refresh_lock: Mutex<Option<Instant>>,
}

impl JwksCache {
    pub fn new(jwks_url: impl Into<String>) -> anyhow::Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .build()
            .context("failed building JWKS HTTP client")?;

        let jwks_url = jwks_url.into();
        tracing::info!(jwks_url = %jwks_url, "Initialized JWKS cache");

        Ok(Self {
            http_client,
            jwks_url,
            cache: RwLock::new(None),
            refresh_lock: Mutex::new(None),
        })
    }

    /// Install a key set directly, as if it had just been fetched.
    pub async fn prime(&self, jwks: JwkSet, ttl: Duration) {
        let entry = JwksCacheEntry {
            keys_by_kid: keys_from_set(jwks),
            expires_at: Instant::now() + ttl,
        };
        *self.cache.write().await = Some(entry);
    }

    /// Find the decoding key for `kid` to verify a token signed with `alg`,
    /// refreshing the set when needed.
    pub async fn decoding_key_for_kid(
        &self,
        kid: &str,
        alg: Algorithm,
    ) -> Result<Arc<DecodingKey>, AuthError> {
        let cached = match self.find_key(kid).await? {
            Some(cached) => cached,
            None => {
                tracing::warn!(kid = %kid, "JWT kid not found in JWKS after refresh");
                return Err(AuthError::BadSignature);
            }
        };

        match cached.alg {
            Some(key_alg) if key_alg != alg => {
                tracing::warn!(kid = %kid, ?key_alg, token_alg = ?alg, "JWT alg does not match JWKS key");
                Err(AuthError::UnsupportedAlgorithm)
            }
            _ => Ok(cached.key),
        }
    }

    async fn find_key(&self, kid: &str) -> Result<Option<CachedKey>, AuthError> {
        if let Some(key) = self.lookup_cached_key(kid, false).await {
            return Ok(Some(key));
        }

        // Another task is refreshing: serve the expired entry instead of queueing.
        if self.refresh_lock.try_lock().is_err() {
            if let Some(key) = self.lookup_cached_key(kid, true).await {
                return Ok(Some(key));
            }
        }

        let fetched = self.refresh(false).await?;
        if let Some(key) = self.lookup_cached_key(kid, false).await {
            return Ok(Some(key));
        }

        // The set was current and still lacks the kid: it may have rotated.
        if !fetched && self.refresh(true).await? {
            return Ok(self.lookup_cached_key(kid, false).await);
        }

        Ok(None)
    }

    async fn lookup_cached_key(&self, kid: &str, allow_stale: bool) -> Option<CachedKey> {
        let cache = self.cache.read().await;
        let now = Instant::now();
        cache
            .as_ref()
            .filter(|entry| allow_stale || entry.expires_at > now)
            .and_then(|entry| entry.keys_by_kid.get(kid))
            .cloned()
    }

    /// Returns whether a fetch was made.
    async fn refresh(&self, force_refresh: bool) -> Result<bool, AuthError> {
        let mut last_fetch = self.refresh_lock.lock().await;

        if force_refresh {
            if last_fetch.is_some_and(|at| at.elapsed() < FORCED_REFRESH_COOLDOWN) {
                tracing::debug!("Skipping forced JWKS refresh during cooldown");
                return Ok(false);
            }
        } else {
            let cache = self.cache.read().await;
            if cache
                .as_ref()
                .is_some_and(|entry| entry.expires_at > Instant::now())
            {
                return Ok(false);
            }
        }

        tracing::debug!(jwks_url = %self.jwks_url, force_refresh, "Refreshing JWKS cache");
        *last_fetch = Some(Instant::now());

        let (jwks, ttl) = self.fetch().await.map_err(|e| {
            tracing::error!(error = %e, jwks_url = %self.jwks_url, "JWKS refresh failed");
            AuthError::KeySetUnavailable
        })?;

        let keys_by_kid = keys_from_set(jwks);
        if keys_by_kid.is_empty() {
            tracing::error!(jwks_url = %self.jwks_url, "JWKS response had no usable keys");
            return Err(AuthError::KeySetUnavailable);
        }

        let entry = JwksCacheEntry {
            keys_by_kid,
            expires_at: Instant::now() + ttl,
        };

        // Last writer wins.
        *self.cache.write().await = Some(entry);

        tracing::debug!(ttl_secs = ttl.as_secs(), "JWKS cache refreshed");
        Ok(true)
    }

    async fn fetch(&self) -> anyhow::Result<(JwkSet, Duration)> {
        let response = self
            .http_client
            .get(&self.jwks_url)
            .send()
            .await
            .context("JWKS request failed")?;

        if !response.status().is_success() {
            anyhow::bail!("JWKS request returned status {}", response.status());
        }

        let ttl = cache_ttl_from_headers(response.headers(), DEFAULT_CACHE_TTL);
        let jwks: JwkSet = response.json().await.context("invalid JWKS JSON")?;
        Ok((jwks, ttl))
    }
}

/// Keep signing keys with a `kid`; skip encryption keys and key algorithms
/// that cannot sign a JWT.
fn keys_from_set(jwks: JwkSet) -> HashMap<String, CachedKey> {
    let mut keys_by_kid = HashMap::new();

    for jwk in jwks.keys {
        let Some(kid) = jwk.common.key_id.clone().filter(|k| !k.trim().is_empty()) else {
            continue;
        };

        if let Some(key_use) = &jwk.common.public_key_use {
            if !matches!(key_use, PublicKeyUse::Signature) {
                continue;
            }
        }

        let alg = match signing_algorithm(&jwk) {
            Ok(alg) => alg,
            Err(()) => {
                tracing::debug!(kid = %kid, "Skipping non-signing JWKS key");
                continue;
            }
        };

        match DecodingKey::from_jwk(&jwk) {
            Ok(key) => {
                keys_by_kid.insert(
                    kid,
                    CachedKey {
                        key: Arc::new(key),
                        alg,
                    },
                );
            }
            Err(e) => {
                tracing::warn!(error = %e, kid = %kid, "Skipping unusable JWKS key");
            }
        }
    }

    keys_by_kid
}

/// The key's declared JWS algorithm; `Err` when it names a non-signing one.
fn signing_algorithm(jwk: &Jwk) -> Result<Option<Algorithm>, ()> {
    match &jwk.common.key_algorithm {
        None => Ok(None),
        Some(key_alg) => Algorithm::from_str(&format!("{key_alg:?}"))
            .map(Some)
            .map_err(|_| ()),
    }
}

fn cache_ttl_from_headers(headers: &reqwest::header::HeaderMap, fallback: Duration) -> Duration {
    headers
        .get(CACHE_CONTROL)
        .and_then(|v| v.to_str().ok())
        .and_then(parse_cache_control_max_age)
        .map(Duration::from_secs)
        .unwrap_or(fallback)
}

fn parse_cache_control_max_age(value: &str) -> Option<u64> {
    value.split(',').find_map(|directive| {
        directive
            .trim()
            .strip_prefix("max-age=")
            .and_then(|raw| raw.trim_matches('"').parse::<u64>().ok())
    })
}
