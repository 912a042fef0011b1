use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::instrument;

use crate::{
    error::{method_not_allowed, ApiError},
    extract::{FormBody, JsonBody},
    pages,
    state::AppState,
    users::{
        dto::{DeleteUserRequest, RegisterForm, UserPayload, UserResponse},
        services,
    },
};

pub fn register_routes() -> Router<AppState> {
    Router::new().route(
        "/register",
        get(pages::register_form)
            .post(register)
            .fallback(method_not_allowed),
    )
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).fallback(method_not_allowed))
        .route(
            "/users/create",
            post(create_user).fallback(method_not_allowed),
        )
        .route(
            "/users/update",
            put(update_user).fallback(method_not_allowed),
        )
        .route(
            "/users/delete",
            delete(delete_user).fallback(method_not_allowed),
        )
}

#[instrument(skip(state, form))]
pub async fn register(
    State(state): State<AppState>,
    FormBody(form): FormBody<RegisterForm>,
) -> Result<String, ApiError> {
    let user = services::register_user(state.users.as_ref(), &state.config.users, form).await?;
    Ok(format!("Registration successful! Welcome, {}!", user.name))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let include_password = state.config.users.list_include_password;
    let users = services::list_users(state.users.as_ref()).await?;
    Ok(Json(
        users
            .into_iter()
            .map(|u| UserResponse::project(u, include_password))
            .collect(),
    ))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = services::create_user(state.users.as_ref(), &state.config.users, payload).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<UserPayload>,
) -> Result<StatusCode, ApiError> {
    services::update_user(state.users.as_ref(), &state.config.users, payload).await?;
    Ok(StatusCode::OK)
}

#[instrument(skip(state, body))]
pub async fn delete_user(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<DeleteUserRequest>,
) -> Result<StatusCode, ApiError> {
    services::delete_user(state.users.as_ref(), body.id).await?;
    Ok(StatusCode::OK)
}
