//! Application configuration loaded from environment variables.

use std::env;

use blog_infra::DatabaseConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub database: Option<DatabaseConfig>,
}

/// Which database URL the server reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
}

impl Environment {
    fn from_env() -> Self {
        match env::var("APP_ENV") {
            Ok(v) if v.eq_ignore_ascii_case("test") => Environment::Test,
            _ => Environment::Development,
        }
    }

    /// Variable holding the database URL for this environment.
    pub fn database_url_var(self) -> &'static str {
        match self {
            Environment::Development => "DATABASE_URL",
            Environment::Test => "TEST_DATABASE_URL",
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let environment = Environment::from_env();

        let database = env::var(environment.database_url_var())
            .ok()
            .filter(|url| !url.is_empty())
            .map(|url| DatabaseConfig {
                url,
                max_connections: env::var("DB_MAX_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(10),
                min_connections: env::var("DB_MIN_CONNECTIONS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1),
            });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment,
            database,
        }
    }
}
