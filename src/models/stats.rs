// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Per-user training statistics.

use serde::Serialize;

/// Aggregates over a user's workouts and sessions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, sqlx::FromRow)]
pub struct UserStats {
    pub total_workouts: i64,
    pub total_sessions: i64,
    /// Distinct calendar days with at least one recorded set
    pub workout_days: i64,
    /// Mean session effort (0 when there are no sessions)
    pub avg_effort: f64,
    pub avg_mood: f64,
}
