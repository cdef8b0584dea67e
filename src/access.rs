//! Acting-user context passed explicitly into every service call.
//!
//! Authentication happens outside this crate; callers resolve the user and
//! role once per request and hand an [`ActingUser`] to the services.

use crate::board::domain::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// System-wide role of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Platform administrator; may manage every project.
    Admin,
    /// Administrator of the projects assigned to them.
    SystemAdmin,
    /// Regular project participant.
    User,
}

impl Role {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::SystemAdmin => "system_admin",
            Self::User => "user",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned while parsing a role claim.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(pub String);

impl TryFrom<&str> for Role {
    type Error = ParseRoleError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| !ch.is_whitespace() && *ch != '_' && *ch != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "admin" => Ok(Self::Admin),
            "systemadmin" => Ok(Self::SystemAdmin),
            "user" => Ok(Self::User),
            _ => Err(ParseRoleError(value.to_owned())),
        }
    }
}

/// Identity performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActingUser {
    user_id: UserId,
    role: Role,
}

impl ActingUser {
    /// Creates an acting-user context.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Returns the user identifier.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Returns the role.
    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }

    /// Returns `true` when the user may change the settings, members or
    /// board of a project administered by `project_admin`.
    #[must_use]
    pub fn can_manage_project(&self, project_admin: UserId) -> bool {
        match self.role {
            Role::Admin => true,
            Role::SystemAdmin => self.user_id == project_admin,
            Role::User => false,
        }
    }

    /// Returns `true` when the user may delete a project administered by
    /// `project_admin`.
    #[must_use]
    pub fn can_delete_project(&self, project_admin: UserId) -> bool {
        self.can_manage_project(project_admin)
    }
}

impl fmt::Display for ActingUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.user_id, self.role)
    }
}
