//! Role label resolution through the public API
use std::collections::BTreeSet;
use userservice_lib::auth::{requested_role_names, resolve_roles};
use userservice_lib::error::AppError;
use userservice_lib::models::RoleName;
use userservice_lib::storage::{CredentialStore, MemoryStore};

fn labels(values: &[&str]) -> BTreeSet<String> {
    values.iter().map(|value| value.to_string()).collect()
}

#[test]
fn test_label_switch() {
    assert_eq!(RoleName::from_label("admin"), RoleName::Admin);
    assert_eq!(RoleName::from_label("mod"), RoleName::Moderator);
    assert_eq!(RoleName::from_label("moderator"), RoleName::User);
    assert_eq!(RoleName::from_label("ADMIN"), RoleName::User);
}

#[test]
fn test_duplicate_labels_collapse() {
    let names = requested_role_names(Some(&labels(&["admin", "bogus", "other"])));
    assert_eq!(names, BTreeSet::from([RoleName::User, RoleName::Admin]));
}

#[tokio::test]
async fn test_resolved_roles_are_store_rows() {
    let store = MemoryStore::with_seeded_roles();
    let roles = resolve_roles(&store, Some(&labels(&["admin", "mod", "bogus"])))
        .await
        .unwrap();
    assert_eq!(roles.len(), 3);

    for role in &roles {
        let stored = store.find_role_by_name(role.name).await.unwrap().unwrap();
        assert_eq!(stored, *role);
    }
}

#[tokio::test]
async fn test_partial_seed_reports_missing_role() {
    let store = MemoryStore::new();
    let err = resolve_roles(&store, Some(&labels(&["admin"])))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::RoleNotFound(RoleName::Admin)));
}
