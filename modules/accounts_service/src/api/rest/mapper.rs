//! Contract model to DTO mappers

use super::dto::{UserActivityDto, UserDto};
use crate::contract::model::{User, UserActivity};

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            fullname: user.fullname,
            role: user.role.as_str().to_string(),
            is_superuser: user.is_superuser,
            is_active: user.is_active,
            last_login: user.last_login,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<UserActivity> for UserActivityDto {
    fn from(activity: UserActivity) -> Self {
        Self {
            id: activity.id,
            user_id: activity.user_id,
            email: activity.email,
            fullname: activity.fullname,
            action: activity.action,
            created_at: activity.created_at,
        }
    }
}
