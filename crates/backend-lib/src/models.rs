// ============================
// userservice-lib/src/models.rs
// ============================
//! Users, roles and the closed set of role names.
use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The closed set of permission tiers a user can hold.
///
/// Variants are ordered from least to most privileged, which is also the
/// order role labels are reported in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RoleName {
    #[serde(rename = "ROLE_USER")]
    User,
    #[serde(rename = "ROLE_MODERATOR")]
    Moderator,
    #[serde(rename = "ROLE_ADMIN")]
    Admin,
}

impl RoleName {
    pub const ALL: [RoleName; 3] = [RoleName::User, RoleName::Moderator, RoleName::Admin];

    /// Authority label, e.g. `ROLE_ADMIN`
    pub fn as_str(self) -> &'static str {
        match self {
            RoleName::User => "ROLE_USER",
            RoleName::Moderator => "ROLE_MODERATOR",
            RoleName::Admin => "ROLE_ADMIN",
        }
    }

    /// Map a label requested at registration to a role.
    ///
    /// Only the exact lowercase labels `admin` and `mod` grant elevated roles;
    /// everything else falls back to the basic user role.
    pub fn from_label(label: &str) -> RoleName {
        match label {
            "admin" => RoleName::Admin,
            "mod" => RoleName::Moderator,
            _ => RoleName::User,
        }
    }

    /// Whether `from_label` recognises the label rather than defaulting
    pub fn is_known_label(label: &str) -> bool {
        matches!(label, "admin" | "mod")
    }
}

impl fmt::Display for RoleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored role row
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Role {
    pub id: i32,
    pub name: RoleName,
}

/// A stored user together with its resolved roles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// scrypt PHC string, never the plaintext
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
}

impl User {
    pub fn role_names(&self) -> BTreeSet<RoleName> {
        self.roles.iter().map(|role| role.name).collect()
    }
}

/// A user about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub roles: BTreeSet<Role>,
}
