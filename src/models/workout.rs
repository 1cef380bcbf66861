// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout (single exercise set) model for storage and API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Stored set record, joined with its exercise name.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Workout {
    pub id: i64,
    /// Owner identity (immutable)
    pub user_id: String,
    /// Catalog exercise (immutable)
    pub exercise_id: i64,
    pub exercise_name: String,
    pub weight: f64,
    pub reps: i32,
    /// Set number within the exercise
    pub serie: Option<i32>,
    /// Duration in seconds, for timed exercises
    pub seconds: Option<i32>,
    pub observations: Option<String>,
    /// Session scope id shared by every set of the same training day
    pub exercise_session_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Body of `POST /api/workouts`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateWorkoutRequest {
    pub exercise_id: i64,
    pub weight: f64,
    pub reps: i32,
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub serie: Option<i32>,
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub seconds: Option<i32>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub observations: Option<String>,
}

/// Body of `PUT /api/workouts/{id}`: full replacement of the mutable fields.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateWorkoutRequest {
    pub weight: f64,
    pub reps: i32,
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub serie: Option<i32>,
    #[validate(range(min = 1, message = "must be greater than 0"))]
    pub seconds: Option<i32>,
    #[validate(length(max = 1000, message = "must be at most 1000 characters"))]
    pub observations: Option<String>,
}

/// Validated set ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub user_id: String,
    pub exercise_id: i64,
    pub weight: f64,
    pub reps: i32,
    pub serie: Option<i32>,
    pub seconds: Option<i32>,
    pub observations: Option<String>,
    pub scope_id: Uuid,
}

/// Validated replacement values for an existing set.
#[derive(Debug, Clone)]
pub struct WorkoutChanges {
    pub weight: f64,
    pub reps: i32,
    pub serie: Option<i32>,
    pub seconds: Option<i32>,
    pub observations: Option<String>,
}

impl From<UpdateWorkoutRequest> for WorkoutChanges {
    fn from(req: UpdateWorkoutRequest) -> Self {
        Self {
            weight: req.weight,
            reps: req.reps,
            serie: req.serie,
            seconds: req.seconds,
            observations: req.observations,
        }
    }
}

/// Filters accepted by the workout listing.
#[derive(Debug, Clone, Default)]
pub struct WorkoutFilter {
    /// Exact calendar day of `created_at` (UTC)
    pub date: Option<chrono::NaiveDate>,
    pub exercise_session_id: Option<Uuid>,
}
