//! Bearer-token request authentication

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use stockroom_rest::Problem;

use crate::contract::client::AccountsApi;
use crate::contract::model::User;
use crate::domain::token::TokenCodec;

/// Shared authentication state. The server binary installs this as a
/// router-wide extension; [`CurrentUser`] reads it back out.
#[derive(Clone)]
pub struct AuthState {
    tokens: TokenCodec,
    accounts: Arc<dyn AccountsApi>,
}

impl AuthState {
    pub fn new(tokens: TokenCodec, accounts: Arc<dyn AccountsApi>) -> Self {
        Self { tokens, accounts }
    }
}

/// The authenticated caller, resolved from `Authorization: Bearer`.
///
/// Any failure along the way (missing header, bad signature, expired
/// token, unknown or deactivated account) rejects the request with a
/// 401 Problem response.
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let auth = parts.extensions.get::<AuthState>().cloned().ok_or_else(|| {
            tracing::error!("AuthState extension is not installed on this router");
            Problem::internal()
        })?;

        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| Problem::unauthorized("missing Authorization header"))?;
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or_else(|| Problem::unauthorized("expected a bearer token"))?;

        let claims = auth
            .tokens
            .verify(token)
            .map_err(|_| Problem::unauthorized("invalid or expired access token"))?;

        let user = auth
            .accounts
            .user_by_id(claims.user_id)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "failed to resolve token user");
                Problem::internal()
            })?
            .ok_or_else(|| Problem::unauthorized("token refers to an unknown user"))?;

        if !user.is_active {
            return Err(Problem::unauthorized("account is deactivated"));
        }

        Ok(CurrentUser(user))
    }
}
