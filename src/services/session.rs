// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-user, per-day workout session resolution.
//!
//! Exactly one session row exists per `(owner, date)`. Its `scope_id` is
//! minted when the row is created and stamped on every workout recorded that
//! day, so a day's sets always share one scope id.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::session::{CreateSessionRequest, ResolvedSession, SessionSeed};
use crate::models::{Identity, SessionPatch, WorkoutSession};
use chrono::NaiveDate;
use uuid::Uuid;
use validator::Validate;

#[derive(Clone)]
pub struct SessionResolver {
    db: Db,
}

impl SessionResolver {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Scope id of the owner's session for `date`, creating the session with
    /// the default daily name if none exists yet.
    pub async fn resolve(&self, owner: &Identity, date: NaiveDate) -> Result<Uuid> {
        let resolved = self.find_or_create(owner, date, &SessionSeed::daily()).await?;
        Ok(resolved.session.scope_id)
    }

    /// Explicit creation. An existing session for the date is returned as is.
    pub async fn create(
        &self,
        owner: &Identity,
        request: &CreateSessionRequest,
    ) -> Result<ResolvedSession> {
        request.validate()?;
        self.find_or_create(owner, request.session_date, &request.seed())
            .await
    }

    pub async fn list(&self, owner: &Identity) -> Result<Vec<WorkoutSession>> {
        self.db.list_sessions(owner).await
    }

    pub async fn update(
        &self,
        owner: &Identity,
        id: i64,
        patch: &SessionPatch,
    ) -> Result<WorkoutSession> {
        patch.validate()?;
        if patch.is_empty() {
            return Err(AppError::BadRequest("no fields to update".to_string()));
        }

        let session = self
            .db
            .update_session(owner, id, patch)
            .await?
            .ok_or_else(|| AppError::not_found("workout session", id))?;

        tracing::info!(user_id = %owner, session_id = session.id, "Workout session updated");
        Ok(session)
    }

    async fn find_or_create(
        &self,
        owner: &Identity,
        date: NaiveDate,
        seed: &SessionSeed,
    ) -> Result<ResolvedSession> {
        let resolved = self.db.find_or_create_session(owner, date, seed).await?;

        if resolved.created {
            tracing::info!(
                user_id = %owner,
                session_id = resolved.session.id,
                date = %date,
                "Created workout session"
            );
        } else {
            tracing::debug!(
                user_id = %owner,
                session_id = resolved.session.id,
                date = %date,
                "Reusing existing workout session"
            );
        }

        Ok(resolved)
    }
}
