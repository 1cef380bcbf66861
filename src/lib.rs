// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Gym tracker: workout logging backend.
//!
//! Records exercise sets, groups them into one session per user and day, and
//! serves a read-only exercise and equipment catalog. Every request except the
//! health check is authenticated with a bearer token.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::{SessionResolver, TokenVerifier, WorkoutRecorder};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub token_verifier: Arc<TokenVerifier>,
    pub sessions: SessionResolver,
    pub workouts: WorkoutRecorder,
}

impl AppState {
    /// Wire the services on top of a database handle.
    pub fn new(config: Config, db: Db) -> anyhow::Result<Self> {
        let token_verifier = Arc::new(TokenVerifier::new(&config)?);
        let sessions = SessionResolver::new(db.clone());
        let workouts = WorkoutRecorder::new(db.clone(), sessions.clone());

        Ok(Self {
            config,
            db,
            token_verifier,
            sessions,
            workouts,
        })
    }
}
