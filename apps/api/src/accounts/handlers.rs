use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::accounts::{get_user, get_user_by_username, register_user, RegisterRequest};
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

/// POST /api/v1/users
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = register_user(&state.db, req).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/v1/users/:id
pub async fn handle_get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    Ok(Json(get_user(&state.db, user_id).await?))
}

/// GET /api/v1/users?username=
pub async fn handle_find_user(
    State(state): State<AppState>,
    Query(params): Query<UsernameQuery>,
) -> Result<Json<User>, AppError> {
    Ok(Json(get_user_by_username(&state.db, &params.username).await?))
}
