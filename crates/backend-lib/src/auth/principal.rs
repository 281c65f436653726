//! The authenticated identity produced by a successful sign-in.
use std::collections::BTreeSet;

use crate::models::{RoleName, User};

/// Who a request acts as once credentials have been checked.
///
/// Returned by value from the sign-in workflow and passed on explicitly; there
/// is no ambient per-request security context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub roles: BTreeSet<RoleName>,
}

impl Principal {
    /// Role labels such as `ROLE_USER`, least privileged first
    pub fn authorities(&self) -> Vec<String> {
        self.roles.iter().map(|role| role.as_str().to_string()).collect()
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            roles: user.role_names(),
        }
    }
}

/// Result of a successful sign-in
#[derive(Debug, Clone)]
pub struct Authenticated {
    pub token: String,
    pub principal: Principal,
}
