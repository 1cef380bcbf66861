// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::UserStats;
use crate::AppState;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/stats", get(get_stats))
}

/// Training aggregates for the caller.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<UserStats>> {
    Ok(Json(state.db.user_stats(&user.identity).await?))
}
