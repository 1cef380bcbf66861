// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod jwks;
pub mod session;
pub mod token_verifier;
pub mod workouts;

pub use jwks::JwksCache;
pub use session::SessionResolver;
pub use token_verifier::{AuthError, TokenVerifier};
pub use workouts::WorkoutRecorder;
