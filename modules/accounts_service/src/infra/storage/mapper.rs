//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use anyhow::anyhow;
use chrono::Utc;
use sea_orm::ActiveValue::Set;

use super::entity;
use crate::contract::model::{NewActivity, NewUser, User, UserActivity, UserRole};

// ===== User Conversions =====

impl TryFrom<entity::user::Model> for User {
    type Error = anyhow::Error;

    fn try_from(entity: entity::user::Model) -> Result<Self, Self::Error> {
        let role = UserRole::parse(&entity.role)
            .ok_or_else(|| anyhow!("unknown role '{}' on user {}", entity.role, entity.id))?;
        Ok(Self {
            id: entity.id,
            email: entity.email,
            fullname: entity.fullname,
            role,
            password_hash: entity.password_hash,
            is_superuser: entity.is_superuser,
            is_active: entity.is_active,
            last_login: entity.last_login,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}

/// Active model for inserting a fresh user. Id stays unset so the
/// database assigns it; accounts start active, non-superuser and
/// without a password.
pub fn new_user_active_model(new_user: &NewUser) -> entity::user::ActiveModel {
    let now = Utc::now();
    entity::user::ActiveModel {
        email: Set(new_user.email.clone()),
        fullname: Set(new_user.fullname.clone()),
        role: Set(new_user.role.as_str().to_string()),
        password_hash: Set(None),
        is_superuser: Set(false),
        is_active: Set(true),
        last_login: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
}

// ===== Activity Conversions =====

impl From<entity::activity::Model> for UserActivity {
    fn from(entity: entity::activity::Model) -> Self {
        Self {
            id: entity.id,
            user_id: entity.user_id,
            email: entity.email,
            fullname: entity.fullname,
            action: entity.action,
            created_at: entity.created_at,
        }
    }
}

pub fn new_activity_active_model(activity: &NewActivity) -> entity::activity::ActiveModel {
    entity::activity::ActiveModel {
        user_id: Set(activity.user_id),
        email: Set(activity.email.clone()),
        fullname: Set(activity.fullname.clone()),
        action: Set(activity.action.clone()),
        created_at: Set(Utc::now()),
        ..Default::default()
    }
}
