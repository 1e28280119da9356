//! Database credentials from the environment.
//!
//! Read once at startup and passed explicitly to the loader. A `.env` file
//! in the working directory is honoured by the binary before this runs.

use sqlx::postgres::PgConnectOptions;
use std::fmt;
use std::num::ParseIntError;
use thiserror::Error;

pub const DB_NAME: &str = "DB_NAME";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("DB_PORT is not a valid port: {value:?}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Connection settings for the destination database.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub name: String,
    pub user: String,
    pub password: Option<String>,
    pub host: String,
    pub port: u16,
}

impl DatabaseConfig {
    /// Read the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the configuration through `lookup`. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match get(DB_PORT) {
            Some(value) => value
                .trim()
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value, source })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            name: get(DB_NAME).ok_or(ConfigError::Missing(DB_NAME))?,
            user: get(DB_USER).ok_or(ConfigError::Missing(DB_USER))?,
            password: get(DB_PASSWORD),
            host: get(DB_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    /// sqlx connect options for this configuration.
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .database(&self.name);
        match &self.password {
            Some(password) => options.password(password),
            None => options,
        }
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_full_config() {
        let cfg = DatabaseConfig::from_lookup(lookup(&[
            (DB_NAME, "crypto"),
            (DB_USER, "etl"),
            (DB_PASSWORD, "s3cret"),
            (DB_HOST, "db.internal"),
            (DB_PORT, "6543"),
        ]))
        .unwrap();

        assert_eq!(cfg.name, "crypto");
        assert_eq!(cfg.user, "etl");
        assert_eq!(cfg.password.as_deref(), Some("s3cret"));
        assert_eq!(cfg.host, "db.internal");
        assert_eq!(cfg.port, 6543);
    }

    #[test]
    fn test_defaults() {
        let cfg = DatabaseConfig::from_lookup(lookup(&[(DB_NAME, "crypto"), (DB_USER, "etl")]))
            .unwrap();
        assert_eq!(cfg.password, None);
        assert_eq!(cfg.host, "localhost");
        assert_eq!(cfg.port, 5432);
    }

    #[test]
    fn test_missing_required() {
        let err = DatabaseConfig::from_lookup(lookup(&[(DB_USER, "etl")])).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(DB_NAME)));

        let err = DatabaseConfig::from_lookup(lookup(&[(DB_NAME, "crypto"), (DB_USER, " ")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Missing(DB_USER)));
    }

    #[test]
    fn test_invalid_port() {
        let err = DatabaseConfig::from_lookup(lookup(&[
            (DB_NAME, "crypto"),
            (DB_USER, "etl"),
            (DB_PORT, "postgres"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { ref value, .. } if value == "postgres"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let cfg = DatabaseConfig::from_lookup(lookup(&[
            (DB_NAME, "crypto"),
            (DB_USER, "etl"),
            (DB_PASSWORD, "s3cret"),
        ]))
        .unwrap();
        let shown = format!("{cfg:?}");
        assert!(!shown.contains("s3cret"));
        assert!(shown.contains("***"));
    }
}
