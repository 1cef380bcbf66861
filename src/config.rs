// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.

use std::env;

/// Static development credential accepted when the environment allows it.
pub const DEFAULT_DEV_BYPASS_TOKEN: &str = "salud";

const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";

/// Deployment environment, used to gate the development bypass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Test,
    Production,
}

impl AppEnv {
    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" => AppEnv::Development,
            "test" => AppEnv::Test,
            _ => AppEnv::Production,
        }
    }

    /// Whether the static development credential may be enabled by default.
    pub fn allows_dev_bypass(self) -> bool {
        !matches!(self, AppEnv::Production)
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Postgres connection URL
    pub database_url: String,
    /// Maximum pooled connections
    pub database_max_connections: u32,
    /// Origins allowed by the CORS layer
    pub allowed_origins: Vec<String>,
    pub app_env: AppEnv,

    // --- Token verification ---
    /// Shared secret for HS* tokens (raw bytes)
    pub jwt_secret: Option<Vec<u8>>,
    /// Expected `iss` claim, e.g. `https://xyz.supabase.co/auth/v1`
    pub expected_issuer: Option<String>,
    /// Remote key set for asymmetric tokens
    pub jwks_url: Option<String>,
    /// Development credential; `None` disables the bypass
    pub dev_bypass_token: Option<String>,
}

impl Config {
    /// Deterministic configuration for tests.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            database_url: "postgres://localhost:5432/gym_test".to_string(),
            database_max_connections: 2,
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            app_env: AppEnv::Test,
            jwt_secret: Some(b"test_jwt_secret_32_bytes_minimum!".to_vec()),
            expected_issuer: Some("https://test.supabase.co/auth/v1".to_string()),
            jwks_url: None,
            dev_bypass_token: Some(DEFAULT_DEV_BYPASS_TOKEN.to_string()),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let app_env = AppEnv::parse(&env::var("APP_ENV").unwrap_or_default());
        let supabase_url = non_empty_var("SUPABASE_URL").map(|u| u.trim_end_matches('/').to_string());

        let dev_bypass_token = match non_empty_var("DEV_BYPASS_TOKEN") {
            Some(token) => Some(token),
            None if app_env.allows_dev_bypass() => Some(DEFAULT_DEV_BYPASS_TOKEN.to_string()),
            None => None,
        };

        let config = Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            database_url: env::var("DATABASE_URL")
                .map_err(|_| ConfigError::Missing("DATABASE_URL"))?,
            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            allowed_origins: split_origins(
                &env::var("ALLOWED_ORIGINS").unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.to_string()),
            ),
            app_env,
            jwt_secret: non_empty_var("SUPABASE_JWT_SECRET").map(String::into_bytes),
            expected_issuer: supabase_url.as_ref().map(|u| format!("{u}/auth/v1")),
            jwks_url: non_empty_var("JWKS_URL").or_else(|| {
                supabase_url
                    .as_ref()
                    .map(|u| format!("{u}/auth/v1/.well-known/jwks.json"))
            }),
            dev_bypass_token,
        };

        if app_env == AppEnv::Production && config.dev_bypass_token.is_some() {
            tracing::warn!("DEV_BYPASS_TOKEN is set in a production environment");
        }

        config.check_auth_configured()?;
        Ok(config)
    }

    fn check_auth_configured(&self) -> Result<(), ConfigError> {
        if self.jwt_secret.is_none() && self.jwks_url.is_none() && self.dev_bypass_token.is_none() {
            return Err(ConfigError::NoAuthMethod);
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("No token verification method configured (set SUPABASE_JWT_SECRET, SUPABASE_URL or JWKS_URL)")]
    NoAuthMethod,
}
