//! Service configuration.
//!
//! All configuration is loaded from environment variables, each with a
//! default so the service starts against a local `MongoDB` with no setup.
//! An empty variable counts as unset.

use std::time::Duration;

use upnext_api::ServerConfig;
use upnext_db::MongoConfig;

/// Errors raised while reading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A variable is set to a value that does not parse.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// Environment variable name.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Complete service configuration.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// `MongoDB` connection string.
    pub mongo_uri: String,
    /// Database holding the catalog collections.
    pub db_name: String,
    /// Address to bind the HTTP server to.
    pub host: String,
    /// TCP port for the HTTP server.
    pub port: u16,
    /// Deadline for each store call made by a request.
    pub request_timeout: Duration,
    /// Deadline for the initial connection and ping.
    pub connect_timeout: Duration,
}

impl ServiceConfig {
    /// Load configuration from the process environment.
    ///
    /// Optional variables:
    /// - `MONGO_URI` -- connection string (default `mongodb://localhost:27017`)
    /// - `DB_NAME` -- database name (default `upnext`)
    /// - `HOST` -- bind address (default `0.0.0.0`)
    /// - `PORT` -- listen port (default `8080`)
    /// - `REQUEST_TIMEOUT_MS` -- per-request store deadline (default 5000)
    /// - `CONNECT_TIMEOUT_MS` -- startup connection deadline (default 10000)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| {
            lookup(name)
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_owned())
        };

        let port = parse_var("PORT", &var("PORT", "8080"))?;
        let request_timeout_ms: u64 =
            parse_var("REQUEST_TIMEOUT_MS", &var("REQUEST_TIMEOUT_MS", "5000"))?;
        let connect_timeout_ms: u64 =
            parse_var("CONNECT_TIMEOUT_MS", &var("CONNECT_TIMEOUT_MS", "10000"))?;

        Ok(Self {
            mongo_uri: var("MONGO_URI", upnext_db::mongo::DEFAULT_URI),
            db_name: var("DB_NAME", upnext_db::mongo::DEFAULT_DATABASE),
            host: var("HOST", "0.0.0.0"),
            port,
            request_timeout: Duration::from_millis(request_timeout_ms),
            connect_timeout: Duration::from_millis(connect_timeout_ms),
        })
    }

    /// Connection settings for the store.
    pub fn mongo(&self) -> MongoConfig {
        MongoConfig::new(&self.mongo_uri, &self.db_name).with_connect_timeout(self.connect_timeout)
    }

    /// Listener settings for the HTTP server.
    pub fn server(&self) -> ServerConfig {
        ServerConfig {
            host: self.host.clone(),
            port: self.port,
        }
    }
}

fn parse_var<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        name,
        reason: format!("{value:?}: {e}"),
    })
}
