// ==============
// crates/backend-lib/src/metrics.rs

//! Central place for metric keys
pub const SIGNIN_SUCCESS: &str = "auth.signin.success";
pub const SIGNIN_FAILURE: &str = "auth.signin.failure";
pub const REGISTRATION_SUCCESS: &str = "auth.register.success";
pub const REGISTRATION_REJECTED: &str = "auth.register.rejected";
