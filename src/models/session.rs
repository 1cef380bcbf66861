// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout session (one training day for one user).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Display name given to sessions created implicitly by the first set of the day.
pub const DEFAULT_DAILY_SESSION_NAME: &str = "training session for the day";

/// Display name for sessions created explicitly without a name.
pub const DEFAULT_SESSION_NAME: &str = "Full-body routine";

/// Upper bound of the effort and mood ratings.
pub const MAX_RATING: i32 = 3;

/// Stored session row. `(user_id, session_date)` is unique.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct WorkoutSession {
    pub id: i64,
    pub user_id: String,
    pub session_date: NaiveDate,
    pub session_name: String,
    /// Number of sets recorded under this session's scope id
    pub total_exercises: i64,
    pub effort: i32,
    pub mood: i32,
    pub notes: Option<String>,
    /// Scope id stamped on every workout of this day
    pub scope_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Result of the per-day find-or-create.
#[derive(Debug, Clone)]
pub struct ResolvedSession {
    pub session: WorkoutSession,
    /// `false` when an existing row was returned unchanged
    pub created: bool,
}

/// Values used when a session row has to be created.
#[derive(Debug, Clone)]
pub struct SessionSeed {
    pub session_name: String,
    pub notes: Option<String>,
}

impl SessionSeed {
    /// Seed for the implicit session created by the first set of the day.
    pub fn daily() -> Self {
        Self {
            session_name: DEFAULT_DAILY_SESSION_NAME.to_string(),
            notes: None,
        }
    }
}

/// Body of `POST /api/workout-sessions`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSessionRequest {
    pub session_date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub session_name: Option<String>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl CreateSessionRequest {
    pub fn seed(&self) -> SessionSeed {
        let session_name = self
            .session_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_SESSION_NAME)
            .to_string();
        SessionSeed {
            session_name,
            notes: self.notes.clone(),
        }
    }
}

/// Body of `PUT /api/workout-sessions/{id}`: absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SessionPatch {
    #[validate(range(min = 0, max = MAX_RATING, message = "must be between 0 and 3"))]
    pub effort: Option<i32>,
    #[validate(range(min = 0, max = MAX_RATING, message = "must be between 0 and 3"))]
    pub mood: Option<i32>,
    #[validate(length(max = 2000, message = "must be at most 2000 characters"))]
    pub notes: Option<String>,
}

impl SessionPatch {
    pub fn is_empty(&self) -> bool {
        self.effort.is_none() && self.mood.is_none() && self.notes.is_none()
    }

    /// Apply the present fields to a session.
    pub fn apply(&self, session: &mut WorkoutSession) {
        if let Some(effort) = self.effort {
            session.effort = effort;
        }
        if let Some(mood) = self.mood {
            session.mood = mood;
        }
        if let Some(notes) = &self.notes {
            session.notes = Some(notes.clone());
        }
    }
}
