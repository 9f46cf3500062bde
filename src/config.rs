use std::env;
use std::net::SocketAddr;

use thiserror::Error;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://registrar.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_EMAIL_DOMAIN: &str = "ucatolica.edu.co";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has an invalid value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub max_connections: u32,
    pub email_domain: String,
}

impl Config {
    pub fn new_from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_addr.parse::<SocketAddr>().map_err(|e| ConfigError::Invalid {
            key: "BIND_ADDR",
            value: bind_addr.clone(),
            reason: e.to_string(),
        })?;

        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => match raw.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::Invalid {
                        key: "DB_MAX_CONNECTIONS",
                        value: raw,
                        reason: "expected a positive integer".to_string(),
                    });
                }
            },
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let email_domain = lookup("INSTITUTION_EMAIL_DOMAIN")
            .unwrap_or_else(|| DEFAULT_EMAIL_DOMAIN.to_string())
            .trim()
            .trim_start_matches('@')
            .to_lowercase();
        if email_domain.is_empty() || !email_domain.contains('.') {
            return Err(ConfigError::Invalid {
                key: "INSTITUTION_EMAIL_DOMAIN",
                value: email_domain,
                reason: "expected a domain such as ucatolica.edu.co".to_string(),
            });
        }

        Ok(Self {
            database_url,
            bind_addr,
            max_connections,
            email_domain,
        })
    }
}
