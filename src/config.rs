use std::env;

use thiserror::Error;

/// Errors raised while reading the server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Runtime settings read from the environment (and `.env` when present).
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub address: String,
    pub port: u16,
    /// Session cookie signing key; a random key is generated when unset.
    pub secret: Option<String>,
    pub domain: String,
    /// Directory recipe images are written to.
    pub media_root: String,
    /// Public URL prefix under which `media_root` is served.
    pub media_url: String,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value.parse::<u16>().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: value.clone(),
            })?,
            None => 8080,
        };

        let media_url = lookup("MEDIA_URL").unwrap_or_else(|| "/media".to_string());

        Ok(Self {
            database_url: lookup("DATABASE_URL").unwrap_or_else(|| "app.db".to_string()),
            address: lookup("ADDRESS").unwrap_or_else(|| "127.0.0.1".to_string()),
            port,
            secret: lookup("SECRET_KEY").filter(|value| !value.is_empty()),
            domain: lookup("DOMAIN").unwrap_or_else(|| "localhost".to_string()),
            media_root: lookup("MEDIA_ROOT").unwrap_or_else(|| "media".to_string()),
            media_url: media_url.trim_end_matches('/').to_string(),
        })
    }
}
