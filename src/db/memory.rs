// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! In-process store used by tests and local runs without Postgres.
//!
//! Sessions are keyed by `(user_id, date)` so the find-or-create goes through
//! a single `DashMap::entry`, which holds the shard lock for the whole
//! check-and-insert.

use crate::models::catalog::{EquipmentFilter, ExerciseFilter};
use crate::models::session::{ResolvedSession, SessionSeed};
use crate::models::workout::WorkoutFilter;
use crate::models::{
    Equipment, Exercise, NewWorkout, SessionPatch, UserStats, Workout, WorkoutChanges,
    WorkoutSession,
};
use crate::time_utils::day_of;
use chrono::{NaiveDate, Utc};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    next_id: AtomicI64,
    equipment: DashMap<i64, Equipment>,
    exercises: DashMap<i64, Exercise>,
    sessions: DashMap<(String, NaiveDate), WorkoutSession>,
    workouts: DashMap<i64, Workout>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    // ─── Catalog seeding ─────────────────────────────────────

    pub fn add_equipment(&self, name: &str, category: Option<&str>) -> Equipment {
        let equipment = Equipment {
            id: self.allocate_id(),
            name: name.to_string(),
            category: category.map(str::to_string),
            description: None,
            image_url: None,
            created_at: Utc::now(),
        };
        self.equipment.insert(equipment.id, equipment.clone());
        equipment
    }

    pub fn add_exercise(
        &self,
        name: &str,
        muscle_group: &str,
        equipment: Option<&Equipment>,
    ) -> Exercise {
        let exercise = Exercise {
            id: self.allocate_id(),
            name: name.to_string(),
            muscle_group: muscle_group.to_string(),
            primary_muscles: vec![muscle_group.to_string()],
            secondary_muscles: Vec::new(),
            equipment: equipment.map(|e| e.name.clone()),
            video_url: None,
            created_at: Utc::now(),
        };
        self.exercises.insert(exercise.id, exercise.clone());
        exercise
    }

    // ─── Catalog ─────────────────────────────────────────────

    pub fn exercise_exists(&self, exercise_id: i64) -> bool {
        self.exercises.contains_key(&exercise_id)
    }

    pub fn list_exercises(&self, filter: &ExerciseFilter) -> Vec<Exercise> {
        let mut exercises: Vec<Exercise> = self
            .exercises
            .iter()
            .filter(|e| filter.matches(e.value()))
            .map(|e| e.value().clone())
            .collect();
        exercises.sort_by(|a, b| a.name.cmp(&b.name));
        exercises
    }

    pub fn get_exercise(&self, id: i64) -> Option<Exercise> {
        self.exercises.get(&id).map(|e| e.value().clone())
    }

    pub fn list_equipment(&self, filter: &EquipmentFilter) -> Vec<Equipment> {
        let mut equipment: Vec<Equipment> = self
            .equipment
            .iter()
            .filter(|e| {
                filter
                    .category
                    .as_deref()
                    .map_or(true, |c| e.category.as_deref() == Some(c))
            })
            .map(|e| e.value().clone())
            .collect();
        equipment.sort_by(|a, b| a.name.cmp(&b.name));
        equipment
    }

    pub fn get_equipment(&self, id: i64) -> Option<Equipment> {
        self.equipment.get(&id).map(|e| e.value().clone())
    }

    // ─── Sessions ────────────────────────────────────────────

    pub fn find_or_create_session(
        &self,
        user_id: &str,
        date: NaiveDate,
        seed: &SessionSeed,
        scope_id: Uuid,
    ) -> ResolvedSession {
        let mut created = false;
        let mut session = self
            .sessions
            .entry((user_id.to_string(), date))
            .or_insert_with(|| {
                created = true;
                let now = Utc::now();
                WorkoutSession {
                    id: self.allocate_id(),
                    user_id: user_id.to_string(),
                    session_date: date,
                    session_name: seed.session_name.clone(),
                    total_exercises: 0,
                    effort: 0,
                    mood: 0,
                    notes: seed.notes.clone(),
                    scope_id,
                    created_at: now,
                    updated_at: now,
                }
            })
            .value()
            .clone();

        session.total_exercises = self.count_in_scope(session.scope_id);
        ResolvedSession { session, created }
    }

    pub fn list_sessions(&self, user_id: &str) -> Vec<WorkoutSession> {
        let mut sessions: Vec<WorkoutSession> = self
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .map(|s| s.value().clone())
            .collect();
        sessions.sort_by(|a, b| b.session_date.cmp(&a.session_date));
        for session in &mut sessions {
            session.total_exercises = self.count_in_scope(session.scope_id);
        }
        sessions
    }

    pub fn update_session(
        &self,
        user_id: &str,
        id: i64,
        patch: &SessionPatch,
    ) -> Option<WorkoutSession> {
        let mut updated = self
            .sessions
            .iter_mut()
            .find(|s| s.id == id && s.user_id == user_id)
            .map(|mut s| {
                patch.apply(s.value_mut());
                s.updated_at = Utc::now();
                s.value().clone()
            })?;

        updated.total_exercises = self.count_in_scope(updated.scope_id);
        Some(updated)
    }

    fn count_in_scope(&self, scope_id: Uuid) -> i64 {
        self.workouts
            .iter()
            .filter(|w| w.exercise_session_id == scope_id)
            .count() as i64
    }

    // ─── Workouts ────────────────────────────────────────────

    /// Returns `None` when the referenced exercise is not in the catalog.
    pub fn insert_workout(&self, new: &NewWorkout) -> Option<Workout> {
        let exercise_name = self.exercises.get(&new.exercise_id)?.name.clone();
        let workout = Workout {
            id: self.allocate_id(),
            user_id: new.user_id.clone(),
            exercise_id: new.exercise_id,
            exercise_name,
            weight: new.weight,
            reps: new.reps,
            serie: new.serie,
            seconds: new.seconds,
            observations: new.observations.clone(),
            exercise_session_id: new.scope_id,
            created_at: Utc::now(),
        };
        self.workouts.insert(workout.id, workout.clone());
        Some(workout)
    }

    pub fn list_workouts(&self, user_id: &str, filter: &WorkoutFilter) -> Vec<Workout> {
        let mut workouts: Vec<Workout> = self
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id)
            .filter(|w| filter.date.map_or(true, |d| day_of(w.created_at) == d))
            .filter(|w| {
                filter
                    .exercise_session_id
                    .map_or(true, |scope| w.exercise_session_id == scope)
            })
            .map(|w| w.value().clone())
            .collect();
        workouts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        workouts
    }

    pub fn update_workout(
        &self,
        user_id: &str,
        id: i64,
        changes: &WorkoutChanges,
    ) -> Option<Workout> {
        let mut workout = self.workouts.get_mut(&id)?;
        if workout.user_id != user_id {
            return None;
        }
        workout.weight = changes.weight;
        workout.reps = changes.reps;
        workout.serie = changes.serie;
        workout.seconds = changes.seconds;
        workout.observations = changes.observations.clone();
        Some(workout.value().clone())
    }

    pub fn delete_workout(&self, user_id: &str, id: i64) -> bool {
        self.workouts
            .remove_if(&id, |_, w| w.user_id == user_id)
            .is_some()
    }

    // ─── Stats ───────────────────────────────────────────────

    pub fn user_stats(&self, user_id: &str) -> UserStats {
        let mut total_workouts = 0;
        let mut days = HashSet::new();
        for w in self.workouts.iter().filter(|w| w.user_id == user_id) {
            total_workouts += 1;
            days.insert(day_of(w.created_at));
        }

        let (mut total_sessions, mut effort_sum, mut mood_sum) = (0i64, 0i64, 0i64);
        for s in self.sessions.iter().filter(|s| s.user_id == user_id) {
            total_sessions += 1;
            effort_sum += i64::from(s.effort);
            mood_sum += i64::from(s.mood);
        }

        let average = |sum: i64| {
            if total_sessions == 0 {
                0.0
            } else {
                sum as f64 / total_sessions as f64
            }
        };

        UserStats {
            total_workouts,
            total_sessions,
            workout_days: days.len() as i64,
            avg_effort: average(effort_sum),
            avg_mood: average(mood_sum),
        }
    }
}
