// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Database layer (PostgreSQL, with an in-memory store for tests).
//!
//! Every user-owned read and write takes the owner identity and filters on
//! it, so another user's row is indistinguishable from a missing one.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;

use crate::error::{AppError, Result};
use crate::models::catalog::{EquipmentFilter, ExerciseFilter};
use crate::models::session::{ResolvedSession, SessionSeed};
use crate::models::workout::WorkoutFilter;
use crate::models::{
    Equipment, Exercise, Identity, NewWorkout, SessionPatch, UserStats, Workout, WorkoutChanges,
    WorkoutSession,
};
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Clone)]
enum Backend {
    Postgres(PgPool),
    Memory(Arc<MemoryStore>),
}

/// Database client wrapper.
#[derive(Clone)]
pub struct Db {
    backend: Backend,
}

impl Db {
    /// Connect to Postgres.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(AppError::storage("connect"))?;

        tracing::info!(max_connections, "Connected to Postgres");
        Ok(Self::from_pool(pool))
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            backend: Backend::Postgres(pool),
        }
    }

    /// Create an offline store that keeps everything in process memory.
    pub fn new_in_memory() -> Self {
        Self {
            backend: Backend::Memory(Arc::new(MemoryStore::new())),
        }
    }

    /// The in-memory store, for seeding the catalog in tests.
    pub fn memory(&self) -> Option<&MemoryStore> {
        match &self.backend {
            Backend::Memory(store) => Some(store),
            Backend::Postgres(_) => None,
        }
    }

    /// Apply pending migrations. No-op for the in-memory store.
    pub async fn migrate(&self) -> Result<()> {
        if let Backend::Postgres(pool) = &self.backend {
            postgres::migrate(pool)
                .await
                .map_err(AppError::storage("migrate"))?;
            tracing::info!("Database migrations applied");
        }
        Ok(())
    }

    // ─── Catalog ─────────────────────────────────────────────

    pub async fn exercise_exists(&self, exercise_id: i64) -> Result<bool> {
        match &self.backend {
            Backend::Postgres(pool) => postgres::exercise_exists(pool, exercise_id)
                .await
                .map_err(AppError::storage("check exercise")),
            Backend::Memory(store) => Ok(store.exercise_exists(exercise_id)),
        }
    }

    pub async fn list_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        match &self.backend {
            Backend::Postgres(pool) => postgres::list_exercises(pool, filter)
                .await
                .map_err(AppError::storage("list exercises")),
            Backend::Memory(store) => Ok(store.list_exercises(filter)),
        }
    }

    pub async fn get_exercise(&self, id: i64) -> Result<Option<Exercise>> {
        match &self.backend {
            Backend::Postgres(pool) => postgres::get_exercise(pool, id)
                .await
                .map_err(AppError::storage("get exercise")),
            Backend::Memory(store) => Ok(store.get_exercise(id)),
        }
    }

    pub async fn list_equipment(&self, filter: &EquipmentFilter) -> Result<Vec<Equipment>> {
        match &self.backend {
            Backend::Postgres(pool) => postgres::list_equipment(pool, filter)
                .await
                .map_err(AppError::storage("list equipment")),
            Backend::Memory(store) => Ok(store.list_equipment(filter)),
        }
    }

    pub async fn get_equipment(&self, id: i64) -> Result<Option<Equipment>> {
        match &self.backend {
            Backend::Postgres(pool) => postgres::get_equipment(pool, id)
                .await
                .map_err(AppError::storage("get equipment")),
            Backend::Memory(store) => Ok(store.get_equipment(id)),
        }
    }

    // ─── Sessions ────────────────────────────────────────────

    /// Atomically return the owner's session for `date`, creating it from
    /// `seed` if none exists. An existing row is returned unchanged.
    pub async fn find_or_create_session(
        &self,
        owner: &Identity,
        date: NaiveDate,
        seed: &SessionSeed,
    ) -> Result<ResolvedSession> {
        let scope_id = Uuid::new_v4();
        match &self.backend {
            Backend::Postgres(pool) => {
                postgres::find_or_create_session(pool, owner.as_str(), date, seed, scope_id)
                    .await
                    .map_err(AppError::storage("resolve session"))
            }
            Backend::Memory(store) => {
                Ok(store.find_or_create_session(owner.as_str(), date, seed, scope_id))
            }
        }
    }

    pub async fn list_sessions(&self, owner: &Identity) -> Result<Vec<WorkoutSession>> {
        match &self.backend {
            Backend::Postgres(pool) => postgres::list_sessions(pool, owner.as_str())
                .await
                .map_err(AppError::storage("list sessions")),
            Backend::Memory(store) => Ok(store.list_sessions(owner.as_str())),
        }
    }

    pub async fn update_session(
        &self,
        owner: &Identity,
        id: i64,
        patch: &SessionPatch,
    ) -> Result<Option<WorkoutSession>> {
        match &self.backend {
            Backend::Postgres(pool) => postgres::update_session(pool, owner.as_str(), id, patch)
                .await
                .map_err(AppError::storage("update session")),
            Backend::Memory(store) => Ok(store.update_session(owner.as_str(), id, patch)),
        }
    }

    // ─── Workouts ────────────────────────────────────────────

    pub async fn insert_workout(&self, new: &NewWorkout) -> Result<Workout> {
        match &self.backend {
            Backend::Postgres(pool) => postgres::insert_workout(pool, new)
                .await
                .map_err(AppError::storage("insert workout")),
            Backend::Memory(store) => store.insert_workout(new).ok_or_else(|| {
                AppError::storage("insert workout")(format!(
                    "exercise {} vanished before insert",
                    new.exercise_id
                ))
            }),
        }
    }

    pub async fn list_workouts(
        &self,
        owner: &Identity,
        filter: &WorkoutFilter,
    ) -> Result<Vec<Workout>> {
        match &self.backend {
            Backend::Postgres(pool) => postgres::list_workouts(pool, owner.as_str(), filter)
                .await
                .map_err(AppError::storage("list workouts")),
            Backend::Memory(store) => Ok(store.list_workouts(owner.as_str(), filter)),
        }
    }

    pub async fn update_workout(
        &self,
        owner: &Identity,
        id: i64,
        changes: &WorkoutChanges,
    ) -> Result<Option<Workout>> {
        match &self.backend {
            Backend::Postgres(pool) => {
                postgres::update_workout(pool, owner.as_str(), id, changes)
                    .await
                    .map_err(AppError::storage("update workout"))
            }
            Backend::Memory(store) => Ok(store.update_workout(owner.as_str(), id, changes)),
        }
    }

    /// Returns `false` when nothing owned by `owner` had this id.
    pub async fn delete_workout(&self, owner: &Identity, id: i64) -> Result<bool> {
        match &self.backend {
            Backend::Postgres(pool) => postgres::delete_workout(pool, owner.as_str(), id)
                .await
                .map_err(AppError::storage("delete workout")),
            Backend::Memory(store) => Ok(store.delete_workout(owner.as_str(), id)),
        }
    }

    // ─── Stats ───────────────────────────────────────────────

    pub async fn user_stats(&self, owner: &Identity) -> Result<UserStats> {
        match &self.backend {
            Backend::Postgres(pool) => postgres::user_stats(pool, owner.as_str())
                .await
                .map_err(AppError::storage("user stats")),
            Backend::Memory(store) => Ok(store.user_stats(owner.as_str())),
        }
    }
}
