//! Accounts business logic.

use std::sync::Arc;

use chrono::Utc;

use crate::contract::error::AccountsError;
use crate::contract::model::{LoginOutcome, NewActivity, NewUser, User, UserActivity};

use super::password::{hash_password, verify_password};
use super::repository::{ActivityRepository, UserRepository};
use super::token::TokenCodec;

pub struct Service {
    users: Arc<dyn UserRepository>,
    activities: Arc<dyn ActivityRepository>,
    tokens: TokenCodec,
}

impl Service {
    pub fn new(
        users: Arc<dyn UserRepository>,
        activities: Arc<dyn ActivityRepository>,
        tokens: TokenCodec,
    ) -> Self {
        Self {
            users,
            activities,
            tokens,
        }
    }

    /// Register a new account on behalf of `actor`. The account starts
    /// without a password; the user sets one through the first-login
    /// flow.
    pub async fn create_user(
        &self,
        actor: &User,
        new_user: NewUser,
    ) -> Result<User, AccountsError> {
        let email = new_user.email.trim().to_string();
        validate_email(&email)?;
        if new_user.fullname.trim().is_empty() {
            return Err(AccountsError::validation("fullname must not be empty"));
        }

        if self
            .users
            .find_by_email(&email)
            .await
            .map_err(internal("failed to check email uniqueness"))?
            .is_some()
        {
            return Err(AccountsError::email_taken(email));
        }

        let new_user = NewUser {
            email,
            fullname: new_user.fullname.trim().to_string(),
            role: new_user.role,
        };
        // The unique index backstops the pre-check above; a concurrent
        // insert surfaces here as a typed error from the repository.
        let user = self.users.create(&new_user).await.map_err(|err| {
            match err.downcast::<AccountsError>() {
                Ok(typed) => typed,
                Err(err) => {
                    tracing::error!(error = %err, "failed to insert user");
                    AccountsError::internal("failed to insert user")
                }
            }
        })?;

        tracing::info!(user_id = user.id, email = %user.email, "user created");
        self.log_activity(actor, "added new user").await;
        Ok(user)
    }

    /// Authenticate with email and password, or probe the first-login
    /// state when `is_new_user` is set.
    ///
    /// The probe distinguishes "account exists but has no password yet"
    /// (proceed to password setup) from "account already set up". Real
    /// logins fail uniformly with [`AccountsError::InvalidCredentials`]
    /// so the response never reveals which part was wrong.
    pub async fn login(
        &self,
        email: &str,
        password: Option<&str>,
        is_new_user: bool,
    ) -> Result<LoginOutcome, AccountsError> {
        let email = email.trim();

        if is_new_user {
            let user = self
                .users
                .find_by_email(email)
                .await
                .map_err(internal("failed to load user"))?
                .ok_or_else(|| AccountsError::user_not_found(email))?;
            return if user.password_hash.is_some() {
                Err(AccountsError::PasswordAlreadySet)
            } else {
                Ok(LoginOutcome::PasswordSetupRequired { user_id: user.id })
            };
        }

        let user = self
            .users
            .find_by_email(email)
            .await
            .map_err(internal("failed to load user"))?
            .ok_or(AccountsError::InvalidCredentials)?;
        let stored = user
            .password_hash
            .as_deref()
            .ok_or(AccountsError::InvalidCredentials)?;
        let password = password.ok_or(AccountsError::InvalidCredentials)?;
        if !user.is_active || !verify_password(password, stored) {
            return Err(AccountsError::InvalidCredentials);
        }

        let access_token = self.tokens.issue(user.id)?;
        let now = Utc::now();
        self.users
            .set_last_login(user.id, now)
            .await
            .map_err(internal("failed to record last login"))?;

        self.log_activity(&user, "logged in").await;
        Ok(LoginOutcome::Authenticated {
            user: User {
                last_login: Some(now),
                ..user
            },
            access_token,
        })
    }

    /// Set the password for `user_id`, completing first login or
    /// rotating an existing password.
    pub async fn update_password(
        &self,
        user_id: i64,
        password: &str,
    ) -> Result<(), AccountsError> {
        if password.is_empty() {
            return Err(AccountsError::validation("password must not be empty"));
        }
        let user = self
            .users
            .find_by_id(user_id)
            .await
            .map_err(internal("failed to load user"))?
            .ok_or_else(|| AccountsError::user_not_found(user_id.to_string()))?;

        self.users
            .set_password_hash(user.id, &hash_password(password))
            .await
            .map_err(internal("failed to store password hash"))?;

        self.log_activity(&user, "updated password").await;
        Ok(())
    }

    pub async fn user_by_id(&self, id: i64) -> Result<Option<User>, AccountsError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(internal("failed to load user"))
    }

    /// Non-superuser accounts, newest first.
    pub async fn list_regular_users(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<User>, u64), AccountsError> {
        self.users
            .list_regular(page, per_page)
            .await
            .map_err(internal("failed to list users"))
    }

    /// Activity trail, newest first.
    pub async fn list_activities(
        &self,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<UserActivity>, u64), AccountsError> {
        self.activities
            .list(page, per_page)
            .await
            .map_err(internal("failed to list activities"))
    }

    pub async fn count_regular_users(&self) -> Result<u64, AccountsError> {
        self.users
            .count_regular()
            .await
            .map_err(internal("failed to count users"))
    }

    /// Append an activity entry, propagating failures to the caller.
    pub async fn record_activity(
        &self,
        actor: &User,
        action: &str,
    ) -> Result<(), AccountsError> {
        self.activities
            .append(&NewActivity {
                user_id: Some(actor.id),
                email: actor.email.clone(),
                fullname: actor.fullname.clone(),
                action: action.to_string(),
            })
            .await
            .map(|_| ())
            .map_err(internal("failed to append activity"))
    }

    /// Best-effort activity logging: a failed append must never fail
    /// the operation it annotates.
    async fn log_activity(&self, actor: &User, action: &str) {
        if let Err(err) = self.record_activity(actor, action).await {
            tracing::warn!(error = %err, action, "failed to record user activity");
        }
    }
}

fn validate_email(email: &str) -> Result<(), AccountsError> {
    let valid = email.len() >= 3
        && email.chars().filter(|c| *c == '@').count() == 1
        && !email.starts_with('@')
        && !email.ends_with('@')
        && !email.chars().any(char::is_whitespace);
    if valid {
        Ok(())
    } else {
        Err(AccountsError::validation("invalid email address"))
    }
}

fn internal(context: &'static str) -> impl FnOnce(anyhow::Error) -> AccountsError {
    move |err| {
        tracing::error!(error = %err, context, "accounts storage operation failed");
        AccountsError::internal(context)
    }
}
