// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Workout recording: validation, session binding and owner-scoped edits.

use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::workout::{CreateWorkoutRequest, UpdateWorkoutRequest, WorkoutFilter};
use crate::models::{Identity, NewWorkout, Workout, WorkoutChanges};
use crate::services::session::SessionResolver;
use crate::time_utils::today_utc;
use validator::Validate;

#[derive(Clone)]
pub struct WorkoutRecorder {
    db: Db,
    sessions: SessionResolver,
}

impl WorkoutRecorder {
    pub fn new(db: Db, sessions: SessionResolver) -> Self {
        Self { db, sessions }
    }

    /// Validate and persist a set, attaching it to today's session.
    ///
    /// Checks run in order and stop at the first failure: weight, reps,
    /// optional fields, then catalog existence of the exercise.
    pub async fn create(&self, owner: &Identity, request: CreateWorkoutRequest) -> Result<Workout> {
        check_weight_and_reps(request.weight, request.reps)?;
        request.validate()?;

        if !self.db.exercise_exists(request.exercise_id).await? {
            return Err(AppError::validation(
                "exercise_id",
                format!("exercise {} does not exist", request.exercise_id),
            ));
        }

        let scope_id = self.sessions.resolve(owner, today_utc()).await?;

        let new = NewWorkout {
            user_id: owner.as_str().to_string(),
            exercise_id: request.exercise_id,
            weight: request.weight,
            reps: request.reps,
            serie: request.serie,
            seconds: request.seconds,
            observations: request.observations,
            scope_id,
        };
        let workout = self.db.insert_workout(&new).await?;

        tracing::info!(
            user_id = %owner,
            workout_id = workout.id,
            exercise_id = workout.exercise_id,
            scope_id = %scope_id,
            "Workout recorded"
        );
        Ok(workout)
    }

    pub async fn list(&self, owner: &Identity, filter: &WorkoutFilter) -> Result<Vec<Workout>> {
        self.db.list_workouts(owner, filter).await
    }

    /// Replace the mutable fields of one of the owner's sets.
    pub async fn update(
        &self,
        owner: &Identity,
        id: i64,
        request: UpdateWorkoutRequest,
    ) -> Result<Workout> {
        check_weight_and_reps(request.weight, request.reps)?;
        request.validate()?;

        let changes = WorkoutChanges::from(request);
        self.db
            .update_workout(owner, id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("workout", id))
    }

    pub async fn delete(&self, owner: &Identity, id: i64) -> Result<()> {
        if !self.db.delete_workout(owner, id).await? {
            return Err(AppError::not_found("workout", id));
        }
        tracing::info!(user_id = %owner, workout_id = id, "Workout deleted");
        Ok(())
    }
}

fn check_weight_and_reps(weight: f64, reps: i32) -> Result<()> {
    if !weight.is_finite() || weight <= 0.0 {
        return Err(AppError::validation("weight", "must be greater than 0"));
    }
    if reps <= 0 {
        return Err(AppError::validation("reps", "must be greater than 0"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (WorkoutRecorder, i64) {
        let db = Db::new_in_memory();
        let exercise = db
            .memory()
            .unwrap()
            .add_exercise("Bench Press", "chest", None);
        let sessions = SessionResolver::new(db.clone());
        (WorkoutRecorder::new(db, sessions), exercise.id)
    }

    fn request(exercise_id: i64, weight: f64, reps: i32) -> CreateWorkoutRequest {
        CreateWorkoutRequest {
            exercise_id,
            weight,
            reps,
            serie: None,
            seconds: None,
            observations: None,
        }
    }

    fn owner() -> Identity {
        Identity::new("u1").unwrap()
    }

    fn field_of(err: AppError) -> String {
        match err {
            AppError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn weight_checked_before_reps() {
        assert_eq!(field_of(check_weight_and_reps(0.0, 0).unwrap_err()), "weight");
        assert_eq!(field_of(check_weight_and_reps(f64::NAN, 5).unwrap_err()), "weight");
        assert_eq!(field_of(check_weight_and_reps(10.0, -1).unwrap_err()), "reps");
        assert!(check_weight_and_reps(0.5, 1).is_ok());
    }

    #[tokio::test]
    async fn unknown_exercise_is_a_validation_error() {
        let (recorder, _) = recorder();
        let err = recorder.create(&owner(), request(999, 50.0, 5)).await.unwrap_err();
        assert_eq!(field_of(err), "exercise_id");
    }

    #[tokio::test]
    async fn sets_on_the_same_day_share_a_scope() {
        let (recorder, exercise_id) = recorder();
        let a = recorder.create(&owner(), request(exercise_id, 50.0, 5)).await.unwrap();
        let b = recorder.create(&owner(), request(exercise_id, 55.0, 3)).await.unwrap();

        assert_eq!(a.exercise_session_id, b.exercise_session_id);
        assert_eq!(a.exercise_name, "Bench Press");

        let filter = WorkoutFilter {
            exercise_session_id: Some(a.exercise_session_id),
            ..Default::default()
        };
        assert_eq!(recorder.list(&owner(), &filter).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn invalid_optional_fields_are_rejected() {
        let (recorder, exercise_id) = recorder();
        let mut req = request(exercise_id, 50.0, 5);
        req.serie = Some(0);
        let err = recorder.create(&owner(), req).await.unwrap_err();
        assert_eq!(field_of(err), "serie");
    }

    #[tokio::test]
    async fn delete_of_missing_workout_is_not_found() {
        let (recorder, _) = recorder();
        let err = recorder.delete(&owner(), 42).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
