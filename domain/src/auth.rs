use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ban::BanHistory;
use crate::error::DomainError;

/// Account privilege level. Variants are declared in ascending order so the
/// derived `Ord` matches the privilege ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(i16)]
pub enum Role {
    User = 0,
    Admin = 1,
    SuperAdmin = 2,
}

impl Role {
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
            Role::SuperAdmin => "superadmin",
        }
    }

    /// An executor may only act on accounts strictly below its own role.
    pub fn can_act_on(self, target: Role) -> bool {
        can_act(self, target)
    }
}

pub fn can_act(executor: Role, target: Role) -> bool {
    executor > target
}

impl TryFrom<i16> for Role {
    type Error = DomainError;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::User),
            1 => Ok(Role::Admin),
            2 => Ok(Role::SuperAdmin),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            "superadmin" | "super_admin" => Ok(Role::SuperAdmin),
            other => Err(DomainError::InvalidRole(other.to_string())),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub role: Role,
    pub banned: bool,
    pub ban_history: BanHistory,
}

impl User {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
            banned: false,
            ban_history: BanHistory::default(),
        }
    }
}

/// The authenticated actor performing an admin operation, as supplied by the
/// upstream authentication layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Executor {
    pub email: String,
    pub role: Role,
}

impl Executor {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role >= Role::Admin
    }

    pub fn can_act_on(&self, target: &User) -> bool {
        self.role.can_act_on(target.role)
    }
}
