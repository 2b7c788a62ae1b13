//! User account domain types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::snapshot::PublicUserData;

/// Lifecycle status of a user account.
///
/// Wire format: the variant name as a string (`"Active"`, `"Locked"`, ...).
///
/// Allowed transitions:
/// - `Unverified -> Inactive` on successful OTP verification
/// - `Inactive <-> Active` across the session lifecycle
/// - any accessible status `-> Locked` when the failure threshold is crossed
/// - `Locked -> Inactive` on an explicit unlock
/// - any `-> Terminated` / `-> Closed` (terminal, irreversible)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
    Terminated,
    Unverified,
    Locked,
    Closed,
}

impl UserStatus {
    /// Convert from the wire string. Returns `None` for unknown values.
    pub fn from_str_value(v: &str) -> Option<Self> {
        match v {
            "Active" => Some(Self::Active),
            "Inactive" => Some(Self::Inactive),
            "Terminated" => Some(Self::Terminated),
            "Unverified" => Some(Self::Unverified),
            "Locked" => Some(Self::Locked),
            "Closed" => Some(Self::Closed),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Terminated => "Terminated",
            Self::Unverified => "Unverified",
            Self::Locked => "Locked",
            Self::Closed => "Closed",
        }
    }
}

/// Self-reported gender of a user. `Deleted` is the tombstone value written
/// when an account is wiped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
    #[serde(rename = "Prefer Not To Say")]
    PreferNotToSay,
    #[serde(rename = "DELETED")]
    Deleted,
}

impl Gender {
    pub fn from_str_value(v: &str) -> Option<Self> {
        match v {
            "Male" => Some(Self::Male),
            "Female" => Some(Self::Female),
            "Other" => Some(Self::Other),
            "Prefer Not To Say" => Some(Self::PreferNotToSay),
            "DELETED" => Some(Self::Deleted),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
            Self::PreferNotToSay => "Prefer Not To Say",
            Self::Deleted => "DELETED",
        }
    }
}

/// Permission level of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserRole {
    Customer,
    Moderator,
    Admin,
}

impl UserRole {
    pub fn from_str_value(v: &str) -> Option<Self> {
        match v {
            "Customer" => Some(Self::Customer),
            "Moderator" => Some(Self::Moderator),
            "Admin" => Some(Self::Admin),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Customer => "Customer",
            Self::Moderator => "Moderator",
            Self::Admin => "Admin",
        }
    }
}

/// A user account row as owned by the account service.
///
/// Timestamps are unix seconds; `account_locked_until == 0` means never locked.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub uuid: Uuid,
    pub email: String,
    pub password_hash: String,
    pub password_last_changed_at: i64,
    pub failed_login_attempts: i32,
    pub account_locked_until: i64,
    pub first_name: String,
    pub last_name: String,
    pub gender: Gender,
    pub date_of_birth: NaiveDate,
    pub created_at: i64,
    pub updated_at: i64,
    pub last_login: i64,
    pub last_activity_at: i64,
    pub email_verified: bool,
    pub status: UserStatus,
    pub role: UserRole,
}

impl UserAccount {
    /// Whether the account can currently be used for authentication flows.
    pub fn is_accessible(&self) -> bool {
        matches!(
            self.status,
            UserStatus::Active | UserStatus::Inactive | UserStatus::Unverified
        )
    }

    /// Whether the account owner has completed email verification.
    pub fn is_verified(&self) -> bool {
        self.email_verified
    }

    /// Public-field snapshot stored in the session cache and sent over the wire.
    pub fn snapshot(&self) -> PublicUserData {
        PublicUserData {
            uuid: self.uuid,
            email: self.email.clone(),
            password_last_changed_at: self.password_last_changed_at,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            gender: self.gender,
            date_of_birth: self.date_of_birth.to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            last_login: self.last_login,
            email_verified: self.email_verified,
            user_status: self.status,
            user_role: self.role,
        }
    }
}
