// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Postgres integration tests.
//!
//! Run with a disposable database:
//! `DATABASE_URL=postgres://localhost/gym_test cargo test --test postgres_integration`

use chrono::NaiveDate;
use gym_tracker::models::catalog::ExerciseFilter;
use gym_tracker::models::session::SessionSeed;
use gym_tracker::models::workout::WorkoutFilter;
use gym_tracker::models::{Identity, NewWorkout, SessionPatch, WorkoutChanges};

mod common;

fn unique_user() -> Identity {
    Identity::new(uuid::Uuid::new_v4().to_string()).unwrap()
}

/// Insert a throwaway catalog exercise; the API never writes the catalog.
async fn insert_exercise(name: &str) -> i64 {
    let url = std::env::var("DATABASE_URL").unwrap();
    let pool = sqlx::PgPool::connect(&url).await.unwrap();
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO exercises (name, muscle_group) VALUES ($1, 'test') RETURNING id",
    )
    .bind(name)
    .fetch_one(&pool)
    .await
    .unwrap()
}

#[tokio::test]
async fn test_concurrent_find_or_create() {
    require_database!();
    let db = common::test_db().await;
    let user = unique_user();
    let day = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();

    let tasks: Vec<_> = (0..10)
        .map(|_| {
            let db = db.clone();
            let user = user.clone();
            tokio::spawn(async move {
                db.find_or_create_session(&user, day, &SessionSeed::daily())
                    .await
                    .unwrap()
            })
        })
        .collect();

    let mut results = Vec::new();
    for task in tasks {
        results.push(task.await.unwrap());
    }

    assert_eq!(results.iter().filter(|r| r.created).count(), 1);
    let scope = results[0].session.scope_id;
    assert!(results.iter().all(|r| r.session.scope_id == scope));
    assert_eq!(db.list_sessions(&user).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_session_patch_keeps_absent_fields() {
    require_database!();
    let db = common::test_db().await;
    let user = unique_user();
    let day = NaiveDate::from_ymd_opt(2024, 5, 2).unwrap();

    let seed = SessionSeed {
        session_name: "Pull".to_string(),
        notes: Some("start".to_string()),
    };
    let session = db
        .find_or_create_session(&user, day, &seed)
        .await
        .unwrap()
        .session;

    let patch = SessionPatch {
        effort: Some(2),
        ..Default::default()
    };
    let updated = db
        .update_session(&user, session.id, &patch)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.effort, 2);
    assert_eq!(updated.mood, 0);
    assert_eq!(updated.notes.as_deref(), Some("start"));

    assert!(db
        .update_session(&unique_user(), session.id, &patch)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_workout_lifecycle() {
    require_database!();
    let db = common::test_db().await;
    let exercise_id = insert_exercise("Integration Deadlift").await;
    let user = unique_user();
    let today = gym_tracker::time_utils::today_utc();

    let session = db
        .find_or_create_session(&user, today, &SessionSeed::daily())
        .await
        .unwrap()
        .session;

    let workout = db
        .insert_workout(&NewWorkout {
            user_id: user.as_str().to_string(),
            exercise_id,
            weight: 42.5,
            reps: 10,
            serie: Some(1),
            seconds: None,
            observations: None,
            scope_id: session.scope_id,
        })
        .await
        .unwrap();
    assert_eq!(workout.exercise_name, "Integration Deadlift");

    let found = db
        .list_exercises(&ExerciseFilter {
            search: Some("integration dead".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert!(found.iter().any(|e| e.id == exercise_id));

    let filter = WorkoutFilter {
        date: Some(today),
        exercise_session_id: Some(session.scope_id),
    };
    assert_eq!(db.list_workouts(&user, &filter).await.unwrap().len(), 1);

    let sessions = db.list_sessions(&user).await.unwrap();
    assert_eq!(sessions[0].total_exercises, 1);

    let changes = WorkoutChanges {
        weight: 45.0,
        reps: 8,
        serie: Some(2),
        seconds: None,
        observations: Some("heavier".to_string()),
    };
    let intruder = unique_user();
    assert!(db
        .update_workout(&intruder, workout.id, &changes)
        .await
        .unwrap()
        .is_none());
    assert!(!db.delete_workout(&intruder, workout.id).await.unwrap());

    let updated = db
        .update_workout(&user, workout.id, &changes)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.weight, 45.0);
    assert_eq!(updated.created_at, workout.created_at);

    let stats = db.user_stats(&user).await.unwrap();
    assert_eq!(stats.total_workouts, 1);
    assert_eq!(stats.workout_days, 1);

    assert!(db.delete_workout(&user, workout.id).await.unwrap());
    assert!(db.list_workouts(&user, &WorkoutFilter::default()).await.unwrap().is_empty());
}
