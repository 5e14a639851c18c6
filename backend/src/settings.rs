//! Server settings loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `USER_API_*` environment variables
//! and an optional configuration file.

use std::net::{AddrParseError, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Configuration values controlling the HTTP listener and the user store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_API")]
pub struct ServerSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string. When absent, accounts live in memory.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub database_max_connections: Option<u32>,
    /// Apply embedded migrations before serving. Defaults to `true`.
    pub run_migrations: Option<bool>,
}

impl ServerSettings {
    /// Return the configured bind address, falling back to the default.
    ///
    /// # Errors
    ///
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Return the configured database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn database_max_connections(&self) -> u32 {
        self.database_max_connections
            .unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }

    /// Whether embedded migrations run at startup; on unless disabled.
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 4] = [
        "USER_API_BIND_ADDR",
        "USER_API_DATABASE_URL",
        "USER_API_DATABASE_MAX_CONNECTIONS",
        "USER_API_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("user-api")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("default address parses"),
            DEFAULT_BIND_ADDR.parse::<SocketAddr>().expect("valid literal")
        );
        assert!(settings.database_url().is_none());
        assert_eq!(settings.database_max_connections(), DEFAULT_MAX_CONNECTIONS);
        assert!(settings.run_migrations());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("USER_API_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "USER_API_DATABASE_URL",
                Some("postgres://accounts@localhost/accounts".to_owned()),
            ),
            ("USER_API_DATABASE_MAX_CONNECTIONS", Some("4".to_owned())),
            ("USER_API_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("address parses"),
            "127.0.0.1:9000".parse::<SocketAddr>().expect("valid literal")
        );
        assert_eq!(
            settings.database_url(),
            Some("postgres://accounts@localhost/accounts")
        );
        assert_eq!(settings.database_max_connections(), 4);
        assert!(!settings.run_migrations());
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let _guard = lock_env([
            ("USER_API_BIND_ADDR", None::<String>),
            ("USER_API_DATABASE_URL", Some("   ".to_owned())),
            ("USER_API_DATABASE_MAX_CONNECTIONS", None::<String>),
            ("USER_API_RUN_MIGRATIONS", None::<String>),
        ]);

        assert!(load_from_empty_args().database_url().is_none());
    }

    #[rstest]
    fn database_url_alone_keeps_migrations_on() {
        let _guard = lock_env([
            ("USER_API_BIND_ADDR", None::<String>),
            (
                "USER_API_DATABASE_URL",
                Some("postgres://accounts@localhost/accounts".to_owned()),
            ),
            ("USER_API_DATABASE_MAX_CONNECTIONS", None::<String>),
            ("USER_API_RUN_MIGRATIONS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.database_url().is_some());
        assert!(settings.run_migrations());
    }

    #[rstest]
    fn malformed_bind_addr_is_reported() {
        let _guard = lock_env([
            ("USER_API_BIND_ADDR", Some("not-an-address".to_owned())),
            ("USER_API_DATABASE_URL", None::<String>),
            ("USER_API_DATABASE_MAX_CONNECTIONS", None::<String>),
            ("USER_API_RUN_MIGRATIONS", None::<String>),
        ]);

        assert!(load_from_empty_args().bind_addr().is_err());
    }
}
