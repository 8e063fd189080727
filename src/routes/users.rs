use axum::{extract::State, Json};
use tracing::info;

use crate::{
    error::{validation::require_text, AppResult},
    extract::JsonOrForm,
    state::AppState,
    store::NewUser,
    types::{CreateUserRequest, UserResponse},
};

pub async fn create_user(
    State(state): State<AppState>,
    JsonOrForm(req): JsonOrForm<CreateUserRequest>,
) -> AppResult<Json<UserResponse>> {
    if state.strict() {
        require_text(req.username.as_deref(), "username")?;
    }

    // Stored verbatim; in lenient mode a missing name is left to the NOT NULL constraint
    let user = state.store.create_user(NewUser { username: req.username }).await?;
    state.metrics.inc_users_created();
    info!(user_id = %user.id, "created user {:?}", user.username);

    Ok(Json(UserResponse { id: user.id, username: user.username }))
}

pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.store.list_users().await?;
    let items = users.into_iter().map(|u| UserResponse { id: u.id, username: u.username }).collect();
    Ok(Json(items))
}
