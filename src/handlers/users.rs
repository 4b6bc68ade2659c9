use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::{
    error::Result,
    models::session::AuthSession,
    models::user::PublicUser,
    services::{rbac, users as user_service},
    state::AppState,
    validation::auth::check,
    validation::users::{ListUsersQuery, UpdateUserRequest},
};

/// The response payload for the user list.
#[derive(Serialize)]
pub struct UserListResponse {
    pub users: Vec<PublicUser>,
    pub count: usize,
}

/// Lists users. The route is admin-only; the requirement is declared on
/// the router, not here.
pub async fn list_users(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> Result<impl IntoResponse> {
    let users = user_service::list_users(&state, query.limit, query.offset).await?;

    let users: Vec<PublicUser> = users.into_iter().map(PublicUser::from).collect();
    let count = users.len();

    Ok(Json(UserListResponse { users, count }))
}

/// Fetches a single user. Users may read their own record; admins any.
pub async fn get_user(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(user_id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    rbac::authorize_self_or_admin(&session, user_id)?;

    let user = user_service::get_user(&state, user_id).await?;
    Ok(Json(PublicUser::from(user)))
}

/// Applies a partial update to a user record.
pub async fn update_user(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(user_id): Path<Uuid>,
    Json(mut payload): Json<UpdateUserRequest>,
) -> Result<impl IntoResponse> {
    check(&mut payload)?;

    let user = user_service::update_user(&state, &session, user_id, payload).await?;
    Ok(Json(PublicUser::from(user)))
}

/// Deletes a user record.
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(session): Extension<AuthSession>,
    Path(user_id): Path<Uuid>,
) -> Result<Response> {
    user_service::delete_user(&state, &session, user_id).await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
