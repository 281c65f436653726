// ============================
// userservice-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod password;
pub mod principal;
pub mod roles;
pub mod token;
mod service;
mod service_impl;

pub use password::{hash_password, verify_password};
pub use principal::{Authenticated, Principal};
pub use roles::{requested_role_names, resolve_roles};
pub use service::AuthService;
pub use service_impl::DefaultAuth;
pub use token::{Claims, TokenIssuer};
