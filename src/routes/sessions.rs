// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout session routes.

use super::{parse_id, JsonBody};
use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::session::CreateSessionRequest;
use crate::models::{SessionPatch, WorkoutSession};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/api/workout-sessions",
            get(list_sessions).post(create_session),
        )
        .route("/api/workout-sessions/{id}", put(update_session))
}

async fn list_sessions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<Json<Vec<WorkoutSession>>> {
    Ok(Json(state.sessions.list(&user.identity).await?))
}

/// 201 when the session was created, 200 when one already existed for the day.
async fn create_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    JsonBody(body): JsonBody<CreateSessionRequest>,
) -> Result<(StatusCode, Json<WorkoutSession>)> {
    let resolved = state.sessions.create(&user.identity, &body).await?;
    let status = if resolved.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(resolved.session)))
}

async fn update_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<String>,
    JsonBody(patch): JsonBody<SessionPatch>,
) -> Result<Json<WorkoutSession>> {
    let id = parse_id(&id)?;
    let session = state.sessions.update(&user.identity, id, &patch).await?;
    Ok(Json(session))
}
