//! Route registration for the accounts endpoints

use axum::{
    routing::{get, post},
    Extension, Router,
};
use std::sync::Arc;

use super::{dto::*, extract::CurrentUser, handlers};
use crate::domain::Service;
use stockroom_rest::{Page, PageQuery, Problem};

/// Build the accounts router. The server mounts this under `/api/user`
/// and installs [`super::extract::AuthState`] as an extension so the
/// protected endpoints can resolve the caller.
pub fn router(service: Arc<Service>) -> Router {
    Router::new()
        .route("/create-user", post(create_user_handler))
        .route("/login", post(login_handler))
        .route("/update-password", post(update_password_handler))
        .route("/me", get(me_handler))
        .route("/users-list", get(users_list_handler))
        .route("/users-activities", get(users_activities_handler))
        .layer(Extension(service))
}

// ===== Handler wrappers that extract service from Extension =====

async fn create_user_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    json: axum::Json<CreateUserRequest>,
) -> Result<(axum::http::StatusCode, axum::Json<MessageResponse>), Problem> {
    handlers::create_user(service, actor, json).await
}

async fn login_handler(
    Extension(service): Extension<Arc<Service>>,
    json: axum::Json<LoginRequest>,
) -> Result<axum::Json<LoginResponse>, Problem> {
    handlers::login(service, json).await
}

async fn update_password_handler(
    Extension(service): Extension<Arc<Service>>,
    json: axum::Json<UpdatePasswordRequest>,
) -> Result<axum::Json<MessageResponse>, Problem> {
    handlers::update_password(service, json).await
}

async fn me_handler(actor: CurrentUser) -> axum::Json<UserDto> {
    handlers::me(actor).await
}

async fn users_list_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    query: axum::extract::Query<PageQuery>,
) -> Result<axum::Json<Page<UserDto>>, Problem> {
    handlers::list_users(service, actor, query).await
}

async fn users_activities_handler(
    Extension(service): Extension<Arc<Service>>,
    actor: CurrentUser,
    query: axum::extract::Query<PageQuery>,
) -> Result<axum::Json<Page<UserActivityDto>>, Problem> {
    handlers::list_activities(service, actor, query).await
}
