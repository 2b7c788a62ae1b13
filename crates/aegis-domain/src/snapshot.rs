//! Public user snapshot cached per session and returned over the wire.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::user::{Gender, UserRole, UserStatus};

/// The public subset of [`crate::user::UserAccount`], safe to hand to clients.
///
/// Stored as the `user_data` facet of a session and embedded in RPC responses.
/// `date_of_birth` stays a `YYYY-MM-DD` string to match the cache format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicUserData {
    pub uuid: Uuid,
    pub email: String,
    pub password_last_changed_at: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: String,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_login: i64,
    pub email_verified: bool,
    pub user_status: UserStatus,
    pub user_role: UserRole,
}
