// crates/backend-lib/src/middleware/mod.rs

//! Request extractors and layers shared by the handlers.

pub mod authenticated;

pub use authenticated::{bearer_token, AuthenticatedUser};
