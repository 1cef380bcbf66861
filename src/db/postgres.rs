// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! PostgreSQL queries.
//!
//! Every statement is static and fully parameterized. Optional filters use
//! `($n IS NULL OR …)` and partial updates use `COALESCE($n, column)`.

use crate::models::catalog::{EquipmentFilter, ExerciseFilter};
use crate::models::session::{ResolvedSession, SessionSeed};
use crate::models::workout::WorkoutFilter;
use crate::models::{
    Equipment, Exercise, NewWorkout, SessionPatch, UserStats, Workout, WorkoutChanges,
    WorkoutSession,
};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Run all embedded database migrations against the given pool.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

// ─── Catalog ─────────────────────────────────────────────────

pub async fn exercise_exists(pool: &PgPool, exercise_id: i64) -> Result<bool, sqlx::Error> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM exercises WHERE id = $1)")
        .bind(exercise_id)
        .fetch_one(pool)
        .await
}

pub async fn list_exercises(
    pool: &PgPool,
    filter: &ExerciseFilter,
) -> Result<Vec<Exercise>, sqlx::Error> {
    sqlx::query_as::<_, Exercise>(
        r#"
        SELECT e.id, e.name, e.muscle_group, e.primary_muscles, e.secondary_muscles,
               eq.name AS equipment, e.video_url, e.created_at
        FROM exercises e
        LEFT JOIN equipment eq ON eq.id = e.equipment_id
        WHERE ($1::text IS NULL OR e.muscle_group = $1)
          AND ($2::text IS NULL OR eq.name ILIKE $2)
          AND ($3::text IS NULL OR e.name ILIKE $3)
        ORDER BY e.name ASC
        "#,
    )
    .bind(filter.muscle_group.as_deref())
    .bind(filter.equipment.as_deref().map(contains_pattern))
    .bind(filter.search.as_deref().map(contains_pattern))
    .fetch_all(pool)
    .await
}

pub async fn get_exercise(pool: &PgPool, id: i64) -> Result<Option<Exercise>, sqlx::Error> {
    sqlx::query_as::<_, Exercise>(
        r#"
        SELECT e.id, e.name, e.muscle_group, e.primary_muscles, e.secondary_muscles,
               eq.name AS equipment, e.video_url, e.created_at
        FROM exercises e
        LEFT JOIN equipment eq ON eq.id = e.equipment_id
        WHERE e.id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn list_equipment(
    pool: &PgPool,
    filter: &EquipmentFilter,
) -> Result<Vec<Equipment>, sqlx::Error> {
    sqlx::query_as::<_, Equipment>(
        r#"
        SELECT id, name, category, description, image_url, created_at
        FROM equipment
        WHERE ($1::text IS NULL OR category = $1)
        ORDER BY name ASC
        "#,
    )
    .bind(filter.category.as_deref())
    .fetch_all(pool)
    .await
}

pub async fn get_equipment(pool: &PgPool, id: i64) -> Result<Option<Equipment>, sqlx::Error> {
    sqlx::query_as::<_, Equipment>(
        "SELECT id, name, category, description, image_url, created_at FROM equipment WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

// ─── Sessions ────────────────────────────────────────────────

#[derive(sqlx::FromRow)]
struct ResolvedSessionRow {
    #[sqlx(flatten)]
    session: WorkoutSession,
    created: bool,
}

/// Atomically find or create the session for `(user_id, date)`.
///
/// The no-op `DO UPDATE` makes the existing row visible to `RETURNING`;
/// `xmax = 0` only holds for a freshly inserted tuple.
pub async fn find_or_create_session(
    pool: &PgPool,
    user_id: &str,
    date: NaiveDate,
    seed: &SessionSeed,
    scope_id: Uuid,
) -> Result<ResolvedSession, sqlx::Error> {
    let row = sqlx::query_as::<_, ResolvedSessionRow>(
        r#"
        WITH upserted AS (
            INSERT INTO workout_sessions (user_id, session_date, session_name, notes, scope_id)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, session_date)
            DO UPDATE SET user_id = EXCLUDED.user_id
            RETURNING *, (xmax = 0) AS created
        )
        SELECT u.id, u.user_id, u.session_date, u.session_name, u.effort, u.mood, u.notes,
               u.scope_id, u.created_at, u.updated_at,
               (SELECT COUNT(*) FROM workouts w WHERE w.exercise_session_id = u.scope_id)
                   AS total_exercises,
               u.created
        FROM upserted u
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(&seed.session_name)
    .bind(seed.notes.as_deref())
    .bind(scope_id)
    .fetch_one(pool)
    .await?;

    Ok(ResolvedSession {
        session: row.session,
        created: row.created,
    })
}

pub async fn list_sessions(pool: &PgPool, user_id: &str) -> Result<Vec<WorkoutSession>, sqlx::Error> {
    sqlx::query_as::<_, WorkoutSession>(
        r#"
        SELECT s.id, s.user_id, s.session_date, s.session_name, s.effort, s.mood, s.notes,
               s.scope_id, s.created_at, s.updated_at,
               (SELECT COUNT(*) FROM workouts w WHERE w.exercise_session_id = s.scope_id)
                   AS total_exercises
        FROM workout_sessions s
        WHERE s.user_id = $1
        ORDER BY s.session_date DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn update_session(
    pool: &PgPool,
    user_id: &str,
    id: i64,
    patch: &SessionPatch,
) -> Result<Option<WorkoutSession>, sqlx::Error> {
    sqlx::query_as::<_, WorkoutSession>(
        r#"
        UPDATE workout_sessions
        SET effort = COALESCE($3, effort),
            mood = COALESCE($4, mood),
            notes = COALESCE($5, notes),
            updated_at = now()
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, session_date, session_name, effort, mood, notes,
                  scope_id, created_at, updated_at,
                  (SELECT COUNT(*) FROM workouts w
                   WHERE w.exercise_session_id = workout_sessions.scope_id) AS total_exercises
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(patch.effort)
    .bind(patch.mood)
    .bind(patch.notes.as_deref())
    .fetch_optional(pool)
    .await
}

// ─── Workouts ────────────────────────────────────────────────

pub async fn insert_workout(pool: &PgPool, new: &NewWorkout) -> Result<Workout, sqlx::Error> {
    sqlx::query_as::<_, Workout>(
        r#"
        WITH inserted AS (
            INSERT INTO workouts
                (user_id, exercise_id, weight, reps, serie, seconds, observations, exercise_session_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
        )
        SELECT i.id, i.user_id, i.exercise_id, e.name AS exercise_name, i.weight, i.reps,
               i.serie, i.seconds, i.observations, i.exercise_session_id, i.created_at
        FROM inserted i
        JOIN exercises e ON e.id = i.exercise_id
        "#,
    )
    .bind(&new.user_id)
    .bind(new.exercise_id)
    .bind(new.weight)
    .bind(new.reps)
    .bind(new.serie)
    .bind(new.seconds)
    .bind(new.observations.as_deref())
    .bind(new.scope_id)
    .fetch_one(pool)
    .await
}

pub async fn list_workouts(
    pool: &PgPool,
    user_id: &str,
    filter: &WorkoutFilter,
) -> Result<Vec<Workout>, sqlx::Error> {
    sqlx::query_as::<_, Workout>(
        r#"
        SELECT w.id, w.user_id, w.exercise_id, e.name AS exercise_name, w.weight, w.reps,
               w.serie, w.seconds, w.observations, w.exercise_session_id, w.created_at
        FROM workouts w
        JOIN exercises e ON e.id = w.exercise_id
        WHERE w.user_id = $1
          AND ($2::date IS NULL OR (w.created_at AT TIME ZONE 'UTC')::date = $2)
          AND ($3::uuid IS NULL OR w.exercise_session_id = $3)
        ORDER BY w.created_at DESC, w.id DESC
        "#,
    )
    .bind(user_id)
    .bind(filter.date)
    .bind(filter.exercise_session_id)
    .fetch_all(pool)
    .await
}

pub async fn update_workout(
    pool: &PgPool,
    user_id: &str,
    id: i64,
    changes: &WorkoutChanges,
) -> Result<Option<Workout>, sqlx::Error> {
    sqlx::query_as::<_, Workout>(
        r#"
        WITH updated AS (
            UPDATE workouts
            SET weight = $3, reps = $4, serie = $5, seconds = $6, observations = $7
            WHERE id = $1 AND user_id = $2
            RETURNING *
        )
        SELECT u.id, u.user_id, u.exercise_id, e.name AS exercise_name, u.weight, u.reps,
               u.serie, u.seconds, u.observations, u.exercise_session_id, u.created_at
        FROM updated u
        JOIN exercises e ON e.id = u.exercise_id
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(changes.weight)
    .bind(changes.reps)
    .bind(changes.serie)
    .bind(changes.seconds)
    .bind(changes.observations.as_deref())
    .fetch_optional(pool)
    .await
}

pub async fn delete_workout(pool: &PgPool, user_id: &str, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM workouts WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ─── Stats ───────────────────────────────────────────────────

pub async fn user_stats(pool: &PgPool, user_id: &str) -> Result<UserStats, sqlx::Error> {
    sqlx::query_as::<_, UserStats>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM workouts WHERE user_id = $1) AS total_workouts,
            (SELECT COUNT(*) FROM workout_sessions WHERE user_id = $1) AS total_sessions,
            (SELECT COUNT(DISTINCT (created_at AT TIME ZONE 'UTC')::date)
             FROM workouts WHERE user_id = $1) AS workout_days,
            (SELECT COALESCE(AVG(effort), 0)::float8 FROM workout_sessions WHERE user_id = $1)
                AS avg_effort,
            (SELECT COALESCE(AVG(mood), 0)::float8 FROM workout_sessions WHERE user_id = $1)
                AS avg_mood
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
}

/// `ILIKE` pattern matching `needle` anywhere, with wildcards in the input escaped.
fn contains_pattern(needle: &str) -> String {
    let escaped = needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}
