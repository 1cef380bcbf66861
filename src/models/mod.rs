// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod catalog;
pub mod identity;
pub mod session;
pub mod stats;
pub mod workout;

pub use catalog::{Equipment, Exercise};
pub use identity::Identity;
pub use session::{ResolvedSession, SessionPatch, WorkoutSession};
pub use stats::UserStats;
pub use workout::{NewWorkout, Workout, WorkoutChanges};
