// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout (exercise set) routes.

use super::{parse_id, JsonBody};
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::workout::{CreateWorkoutRequest, UpdateWorkoutRequest, WorkoutFilter};
use crate::models::Workout;
use crate::time_utils::parse_day;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/workouts", get(list_workouts).post(create_workout))
        .route(
            "/api/workouts/{id}",
            put(update_workout).delete(delete_workout),
        )
}

/// Raw query parameters, validated into a [`WorkoutFilter`].
#[derive(Debug, Default, Deserialize)]
pub struct WorkoutQuery {
    pub date: Option<String>,
    pub exercise_session_id: Option<String>,
}

impl TryFrom<WorkoutQuery> for WorkoutFilter {
    type Error = AppError;

    fn try_from(query: WorkoutQuery) -> Result<Self> {
        let date = match query.date.as_deref().filter(|d| !d.is_empty()) {
            Some(raw) => Some(
                parse_day(raw)
                    .ok_or_else(|| AppError::validation("date", "must be formatted YYYY-MM-DD"))?,
            ),
            None => None,
        };

        let exercise_session_id = match query.exercise_session_id.as_deref().filter(|s| !s.is_empty()) {
            Some(raw) => Some(
                Uuid::parse_str(raw.trim())
                    .map_err(|_| AppError::validation("exercise_session_id", "must be a UUID"))?,
            ),
            None => None,
        };

        Ok(WorkoutFilter {
            date,
            exercise_session_id,
        })
    }
}

async fn list_workouts(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<WorkoutQuery>,
) -> Result<Json<Vec<Workout>>> {
    let filter = WorkoutFilter::try_from(query)?;
    let workouts = state.workouts.list(&user.identity, &filter).await?;
    Ok(Json(workouts))
}

async fn create_workout(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(body): JsonBody<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<Workout>)> {
    let workout = state.workouts.create(&user.identity, body).await?;
    Ok((StatusCode::CREATED, Json(workout)))
}

async fn update_workout(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateWorkoutRequest>,
) -> Result<Json<Workout>> {
    let id = parse_id(&id)?;
    let workout = state.workouts.update(&user.identity, id, body).await?;
    Ok(Json(workout))
}

async fn delete_workout(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_id(&id)?;
    state.workouts.delete(&user.identity, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_parses_into_filter() {
        let filter = WorkoutFilter::try_from(WorkoutQuery {
            date: Some("2024-05-01".to_string()),
            exercise_session_id: Some("67e55044-10b1-426f-9247-bb680e5fe0c8".to_string()),
        })
        .unwrap();
        assert_eq!(filter.date, chrono::NaiveDate::from_ymd_opt(2024, 5, 1));
        assert!(filter.exercise_session_id.is_some());
    }

    #[test]
    fn empty_parameters_mean_no_filter() {
        let filter = WorkoutFilter::try_from(WorkoutQuery {
            date: Some(String::new()),
            exercise_session_id: Some(String::new()),
        })
        .unwrap();
        assert!(filter.date.is_none());
        assert!(filter.exercise_session_id.is_none());
    }

    #[test]
    fn malformed_parameters_are_rejected() {
        let bad_date = WorkoutQuery {
            date: Some("May 1".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            WorkoutFilter::try_from(bad_date),
            Err(AppError::Validation { field, .. }) if field == "date"
        ));

        let bad_scope = WorkoutQuery {
            exercise_session_id: Some("not-a-uuid".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            WorkoutFilter::try_from(bad_scope),
            Err(AppError::Validation { field, .. }) if field == "exercise_session_id"
        ));
    }
}
