//! Application configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional; the defaults produce a working local setup.
//!
//! - `ALMACEN_HOST` - Bind address (default: 127.0.0.1)
//! - `ALMACEN_PORT` - Listen port (default: 3000)
//! - `ALMACEN_BASE_URL` - Public URL (default: http://localhost:3000)
//! - `ALMACEN_USER` - Username shown as the request creator
//!   (default: RCHAVARRIA)

use std::net::{IpAddr, SocketAddr};

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AlmacenConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the application
    pub base_url: String,
    /// Username recorded as the creator of new drafts
    pub user: String,
}

impl AlmacenConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but unparsable.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("ALMACEN_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("ALMACEN_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("ALMACEN_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("ALMACEN_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("ALMACEN_BASE_URL", "http://localhost:3000");
        let user = get_env_or_default("ALMACEN_USER", "RCHAVARRIA");

        Ok(Self {
            host,
            port,
            base_url,
            user,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AlmacenConfig {
            host: "127.0.0.1".parse().unwrap(),
            port: 3000,
            base_url: "http://localhost:3000".to_string(),
            user: "RCHAVARRIA".to_string(),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.ip().to_string(), "127.0.0.1");
        assert_eq!(addr.port(), 3000);
    }

    #[test]
    fn test_env_default_used_when_unset() {
        assert_eq!(
            get_env_or_default("ALMACEN_DOES_NOT_EXIST", "fallback"),
            "fallback"
        );
    }
}
