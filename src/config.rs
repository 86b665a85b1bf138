use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use sqlx::postgres::PgConnectOptions;

/// Connection descriptor for the credential database.
///
/// `DATABASE_URL` wins when present; otherwise the discrete `DB_*` parts are used.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,

    pub max_connections: u32,
    pub acquire_timeout: Duration,
    /// Upper bound for the registration transaction (statement and wall clock).
    pub tx_timeout: Duration,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        if let Some(url) = &self.url {
            return PgConnectOptions::from_str(url).context("DATABASE_URL is not a valid postgres URL");
        }

        Ok(PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }
}

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,
    pub database: DatabaseConfig,

    /// Signing secret; `None` means tokens cannot be issued and auth endpoints answer 500.
    pub jwt_secret: Option<String>,
    pub token_ttl: i64,

    // Rate limiting
    pub rate_login_per_min: u32,
    pub rate_register_per_min: u32,

    pub api_prefix: String,

    pub log_dir: String,
    pub log_level: tracing::Level,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var_or(key, default)
        .trim()
        .parse()
        .with_context(|| format!("{key} has an invalid value"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let database = DatabaseConfig {
            url: env::var("DATABASE_URL").ok().filter(|u| !u.trim().is_empty()),
            host: var_or("DB_HOST", "localhost"),
            port: parse_var("DB_PORT", "5432")?,
            user: var_or("DB_USER", "postgres"),
            password: var_or("DB_PASSWORD", ""),
            name: var_or("DB_NAME", "ems"),
            max_connections: parse_var("DB_MAX_CONNECTIONS", "10")?,
            acquire_timeout: Duration::from_millis(parse_var("DB_ACQUIRE_TIMEOUT_MS", "3000")?),
            tx_timeout: Duration::from_millis(parse_var("DB_TX_TIMEOUT_MS", "5000")?),
            run_migrations: parse_var("RUN_MIGRATIONS", "true")?,
        };

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:8080"),
            database,
            jwt_secret: env::var("JWT_SECRET")
                .ok()
                .filter(|s| !s.trim().is_empty()),
            token_ttl: parse_var("TOKEN_TTL_SECS", "3600")?, // 1 hour

            rate_login_per_min: parse_var("RATE_LOGIN_PER_MIN", "60")?,
            rate_register_per_min: parse_var("RATE_REGISTER_PER_MIN", "30")?,

            api_prefix: var_or("API_PREFIX", "/api"),

            log_dir: var_or("LOG_DIR", "logs"),
            log_level: parse_var::<tracing::Level>("LOG_LEVEL", "info")?,
        })
    }
}
