//! HTTP request handlers - thin layer that delegates to domain service

use axum::{extract::Query, http::StatusCode, Json};
use std::sync::Arc;

use stockroom_rest::{Page, PageQuery, Problem};

use super::dto::*;
use super::error::map_domain_error;
use super::extract::CurrentUser;
use crate::contract::model::{LoginOutcome, NewUser, UserRole};
use crate::domain::Service;

/// Register a new account on behalf of the authenticated caller. The
/// account starts without a password and completes setup through the
/// first-login flow.
pub async fn create_user(
    service: Arc<Service>,
    CurrentUser(actor): CurrentUser,
    Json(req): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), Problem> {
    let role = UserRole::parse(&req.role).ok_or_else(|| {
        Problem::new(StatusCode::BAD_REQUEST, "Validation Error")
            .with_detail(format!("unknown role '{}'", req.role))
    })?;

    service
        .create_user(
            &actor,
            NewUser {
                email: req.email,
                fullname: req.fullname,
                role,
            },
        )
        .await
        .map_err(map_domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            success: "User created successfully!".to_string(),
        }),
    ))
}

/// Authenticate, or probe the first-login state when `is_new_user` is
/// set.
pub async fn login(
    service: Arc<Service>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, Problem> {
    let outcome = service
        .login(&req.email, req.password.as_deref(), req.is_new_user)
        .await
        .map_err(map_domain_error)?;

    let response = match outcome {
        LoginOutcome::Authenticated { access_token, .. } => LoginResponse::Token {
            access: access_token,
        },
        LoginOutcome::PasswordSetupRequired { user_id } => {
            LoginResponse::PasswordSetup { user_id }
        }
    };

    Ok(Json(response))
}

/// Set a password, completing first login or rotating an existing one.
pub async fn update_password(
    service: Arc<Service>,
    Json(req): Json<UpdatePasswordRequest>,
) -> Result<Json<MessageResponse>, Problem> {
    service
        .update_password(req.user_id, &req.password)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(MessageResponse {
        success: "User password updated!".to_string(),
    }))
}

/// The authenticated caller's own profile.
pub async fn me(CurrentUser(user): CurrentUser) -> Json<UserDto> {
    Json(user.into())
}

/// List non-superuser accounts, newest first.
pub async fn list_users(
    service: Arc<Service>,
    _actor: CurrentUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<UserDto>>, Problem> {
    let (users, total) = service
        .list_regular_users(page.page(), page.page_size())
        .await
        .map_err(map_domain_error)?;

    let items: Vec<UserDto> = users.into_iter().map(UserDto::from).collect();

    Ok(Json(Page::new(items, total, &page)))
}

/// List the activity trail, newest first.
pub async fn list_activities(
    service: Arc<Service>,
    _actor: CurrentUser,
    Query(page): Query<PageQuery>,
) -> Result<Json<Page<UserActivityDto>>, Problem> {
    let (activities, total) = service
        .list_activities(page.page(), page.page_size())
        .await
        .map_err(map_domain_error)?;

    let items: Vec<UserActivityDto> = activities
        .into_iter()
        .map(UserActivityDto::from)
        .collect();

    Ok(Json(Page::new(items, total, &page)))
}
