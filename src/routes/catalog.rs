// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Read-only exercise and equipment catalog routes.

use super::parse_id;
use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::catalog::{EquipmentFilter, ExerciseFilter};
use crate::models::{Equipment, Exercise};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/exercises", get(list_exercises))
        .route("/api/exercises/{id}", get(get_exercise))
        .route("/api/equipment", get(list_equipment))
        .route("/api/equipment/{id}", get(get_equipment))
}

async fn list_exercises(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(filter): Query<ExerciseFilter>,
) -> Result<Json<Vec<Exercise>>> {
    let exercises = state.db.list_exercises(&filter.normalized()).await?;
    Ok(Json(exercises))
}

async fn get_exercise(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Exercise>> {
    let id = parse_id(&id)?;
    state
        .db
        .get_exercise(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("exercise", id))
}

async fn list_equipment(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Query(filter): Query<EquipmentFilter>,
) -> Result<Json<Vec<Equipment>>> {
    let filter = EquipmentFilter {
        category: filter.category.filter(|c| !c.trim().is_empty()),
    };
    Ok(Json(state.db.list_equipment(&filter).await?))
}

async fn get_equipment(
    State(state): State<Arc<AppState>>,
    _user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<Equipment>> {
    let id = parse_id(&id)?;
    state
        .db
        .get_equipment(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found("equipment", id))
}
