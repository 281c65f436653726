//! Role resolution for new accounts.
use std::collections::BTreeSet;

use crate::error::AppError;
use crate::models::{Role, RoleName};
use crate::storage::CredentialStore;

/// Map requested labels to role names.
///
/// No labels (or an empty set) means the basic user role. Labels collapse, so
/// `{"admin", "admin"}` is a single administrator role.
pub fn requested_role_names(labels: Option<&BTreeSet<String>>) -> BTreeSet<RoleName> {
    match labels {
        Some(labels) if !labels.is_empty() => labels
            .iter()
            .map(|label| {
                if !RoleName::is_known_label(label) {
                    tracing::warn!(label = %label, "unrecognised role label, assigning ROLE_USER");
                }
                RoleName::from_label(label)
            })
            .collect(),
        _ => BTreeSet::from([RoleName::User]),
    }
}

/// Resolve requested labels to stored role rows
pub async fn resolve_roles<S: CredentialStore + ?Sized>(
    store: &S,
    labels: Option<&BTreeSet<String>>,
) -> Result<BTreeSet<Role>, AppError> {
    let mut roles = BTreeSet::new();
    for name in requested_role_names(labels) {
        let role = store
            .find_role_by_name(name)
            .await?
            .ok_or(AppError::RoleNotFound(name))?;
        roles.insert(role);
    }
    Ok(roles)
}
