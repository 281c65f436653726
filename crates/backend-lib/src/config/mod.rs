// ============================
// userservice-lib/src/config/mod.rs
// ============================
//! Configuration management.
//!
//! Settings are layered with figment: built-in defaults, then a TOML file,
//! then `USERSERVICE_`-prefixed environment variables (`__` separates nested
//! keys, e.g. `USERSERVICE_JWT__SECRET`).
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;


/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "USERSERVICE_";

/// Config file read by [`Settings::load`]
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// Signing secret used when none is configured. Only suitable for local runs.
pub const DEV_JWT_SECRET: &str = "userservice-development-secret-change-me";

const MIN_JWT_SECRET_BYTES: usize = 32;
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] figment::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Directory holding the credential store
    pub data_dir: PathBuf,
    /// Log level
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
    /// Insert the three roles at startup if they are missing
    pub seed_roles: bool,
    /// Token signing
    pub jwt: JwtSettings,
    /// Password requirements enforced at registration
    pub password_requirements: PasswordRequirements,
    /// scrypt cost parameters for new hashes
    pub password_hash: HashSettings,
    /// Upper bound on scrypt computations running at once. Each one holds
    /// `128 * r * 2^log_n` bytes, about 128 MiB at the default cost.
    pub max_concurrent_hashes: usize,
    /// Cross-origin policy
    pub cors: CorsSettings,
}

/// Token signing settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JwtSettings {
    /// HMAC secret
    pub secret: String,
    /// Token lifetime in seconds
    pub expiration_secs: u64,
}

/// Password complexity requirements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PasswordRequirements {
    /// Minimum password length
    pub min_length: usize,
    /// Maximum password length
    pub max_length: usize,
    /// Require uppercase letters
    pub require_uppercase: bool,
    /// Require lowercase letters
    pub require_lowercase: bool,
    /// Require digits
    pub require_digit: bool,
    /// Require special characters
    pub require_special: bool,
}

/// scrypt cost parameters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HashSettings {
    pub log_n: u8,
    pub r: u32,
    pub p: u32,
}

/// CORS settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    /// Allowed origins; `*` allows any
    pub allowed_origins: Vec<String>,
    /// Preflight cache lifetime in seconds
    pub max_age_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            log_json: false,
            seed_roles: true,
            jwt: JwtSettings::default(),
            password_requirements: PasswordRequirements::default(),
            password_hash: HashSettings::default(),
            max_concurrent_hashes: 4,
            cors: CorsSettings::default(),
        }
    }
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: DEV_JWT_SECRET.to_string(),
            expiration_secs: 60 * 60 * 24, // 1 day
        }
    }
}

// The secret stays out of Debug output.
impl std::fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"<redacted>")
            .field("expiration_secs", &self.expiration_secs)
            .finish()
    }
}

impl Default for PasswordRequirements {
    fn default() -> Self {
        Self {
            min_length: 1,
            max_length: 128,
            require_uppercase: false,
            require_lowercase: false,
            require_digit: false,
            require_special: false,
        }
    }
}

impl Default for HashSettings {
    fn default() -> Self {
        Self {
            log_n: 17,
            r: 8,
            p: 1,
        }
    }
}

impl HashSettings {
    /// Output length of stored hashes in bytes
    pub const OUTPUT_LEN: usize = 32;

    /// Build scrypt parameters, rejecting combinations scrypt refuses
    pub fn params(&self) -> Result<scrypt::Params, ConfigError> {
        scrypt::Params::new(self.log_n, self.r, self.p, Self::OUTPUT_LEN)
            .map_err(|e| ConfigError::Invalid(format!("password_hash: {e}")))
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_string()],
            max_age_secs: 4000,
        }
    }
}

impl Settings {
    /// Load from `config.toml` in the working directory plus the environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    /// Load from the given TOML file plus the environment. A missing file is
    /// not an error; defaults and environment still apply.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings: Settings = Self::figment(path.as_ref()).extract()?;
        settings.validate()?;
        Ok(settings)
    }

    /// The provider stack settings are extracted from
    pub fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Check cross-field constraints serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Invalid(format!(
                "log_level must be one of {LOG_LEVELS:?}, got {:?}",
                self.log_level
            )));
        }

        if self.jwt.secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::Invalid(format!(
                "jwt.secret must be at least {MIN_JWT_SECRET_BYTES} bytes"
            )));
        }

        if self.jwt.expiration_secs == 0 {
            return Err(ConfigError::Invalid(
                "jwt.expiration_secs must be positive".to_string(),
            ));
        }

        let requirements = &self.password_requirements;
        if requirements.min_length == 0 || requirements.min_length > requirements.max_length {
            return Err(ConfigError::Invalid(format!(
                "password_requirements: need 1 <= min_length ({}) <= max_length ({})",
                requirements.min_length, requirements.max_length
            )));
        }

        self.password_hash.params()?;

        if self.max_concurrent_hashes == 0 {
            return Err(ConfigError::Invalid(
                "max_concurrent_hashes must be at least 1".to_string(),
            ));
        }

        if self.cors.allowed_origins.is_empty() {
            return Err(ConfigError::Invalid(
                "cors.allowed_origins must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// True when running with the built-in signing secret
    pub fn uses_development_secret(&self) -> bool {
        self.jwt.secret == DEV_JWT_SECRET
    }
}
