use std::fmt;
use std::net::IpAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?} ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("unsupported database URL scheme: {0}")]
    UnsupportedScheme(String),
}

fn invalid(key: &'static str, value: &str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        key,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Deployment role. Governs write gating and health semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Primary,
    Secondary,
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "primary" => Ok(Role::Primary),
            "secondary" => Ok(Role::Secondary),
            other => Err(format!("expected primary or secondary, got {other}")),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Primary => f.write_str("primary"),
            Role::Secondary => f.write_str("secondary"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    Postgres,
    Sqlite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SslMode {
    Disable,
    Prefer,
    Require,
}

impl SslMode {
    fn as_str(&self) -> &'static str {
        match self {
            SslMode::Disable => "disable",
            SslMode::Prefer => "prefer",
            SslMode::Require => "require",
        }
    }
}

impl FromStr for SslMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "disable" => Ok(SslMode::Disable),
            "prefer" => Ok(SslMode::Prefer),
            "require" => Ok(SslMode::Require),
            other => Err(format!("expected disable, prefer or require, got {other}")),
        }
    }
}

/// Database connection settings.
///
/// `url` carries credentials and is never serialized; the remaining fields are
/// what `/api/debug` reports.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub driver: Driver,
    pub url: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub name: Option<String>,
    pub ssl_mode: Option<SslMode>,
    pub pool_max: u32,
    pub connect_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub role: Role,
    pub region: String,
    pub host: IpAddr,
    pub port: u16,
    pub static_dir: PathBuf,
    pub database: DatabaseConfig,
}

impl Config {
    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let role = match get("ROLE") {
            Some(v) => v.parse().map_err(|e| invalid("ROLE", &v, e))?,
            None => Role::Primary,
        };
        let region = get("REGION").unwrap_or_else(|| "local".to_string());

        let host = match get("HOST") {
            Some(v) => v.parse().map_err(|e| invalid("HOST", &v, e))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };
        let port = parse_or("PORT", get("PORT"), 3000u16)?;
        let static_dir = PathBuf::from(get("STATIC_DIR").unwrap_or_else(|| "static".to_string()));

        let pool_max = parse_or("DB_POOL_MAX", get("DB_POOL_MAX"), 10u32)?;
        if pool_max == 0 {
            return Err(invalid("DB_POOL_MAX", "0", "pool needs at least one connection"));
        }
        let connect_timeout = Duration::from_secs(parse_or(
            "DB_CONNECT_TIMEOUT_SECS",
            get("DB_CONNECT_TIMEOUT_SECS"),
            5u64,
        )?);

        let database = match get("DATABASE_URL") {
            Some(raw) => database_from_url(&raw, pool_max, connect_timeout)?,
            None => {
                let host = get("DB_HOST").unwrap_or_else(|| "localhost".to_string());
                let port = parse_or("DB_PORT", get("DB_PORT"), 5432u16)?;
                let user = get("DB_USER").unwrap_or_else(|| "postgres".to_string());
                let password = lookup("DB_PASSWORD").unwrap_or_default();
                let name = get("DB_NAME").unwrap_or_else(|| "tournament".to_string());
                let ssl_mode = match get("DB_SSLMODE") {
                    Some(v) => v.parse().map_err(|e| invalid("DB_SSLMODE", &v, e))?,
                    None => SslMode::Prefer,
                };

                let url = postgres_url(&host, port, &user, &password, &name, ssl_mode)?;
                DatabaseConfig {
                    driver: Driver::Postgres,
                    url,
                    host: Some(host),
                    port: Some(port),
                    name: Some(name),
                    ssl_mode: Some(ssl_mode),
                    pool_max,
                    connect_timeout,
                }
            }
        };

        Ok(Config {
            role,
            region,
            host,
            port,
            static_dir,
            database,
        })
    }
}

fn parse_or<T>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match value {
        Some(v) => v.trim().parse().map_err(|e| invalid(key, &v, e)),
        None => Ok(default),
    }
}

fn postgres_url(
    host: &str,
    port: u16,
    user: &str,
    password: &str,
    name: &str,
    ssl_mode: SslMode,
) -> Result<String, ConfigError> {
    let mut url = Url::parse("postgres://localhost").map_err(|e| invalid("DB_HOST", host, e))?;
    url.set_host(Some(host)).map_err(|e| invalid("DB_HOST", host, e))?;
    url.set_port(Some(port))
        .map_err(|_| invalid("DB_PORT", &port.to_string(), "port rejected"))?;
    url.set_username(user)
        .map_err(|_| invalid("DB_USER", user, "username rejected"))?;
    if !password.is_empty() {
        url.set_password(Some(password))
            .map_err(|_| invalid("DB_PASSWORD", "***", "password rejected"))?;
    }
    url.set_path(name);
    url.query_pairs_mut().append_pair("sslmode", ssl_mode.as_str());
    Ok(url.to_string())
}

fn database_from_url(
    raw: &str,
    pool_max: u32,
    connect_timeout: Duration,
) -> Result<DatabaseConfig, ConfigError> {
    let Some((scheme, rest)) = raw.split_once(':') else {
        return Err(invalid("DATABASE_URL", raw, "expected <scheme>:<location>"));
    };
    let scheme = scheme.to_ascii_lowercase();
    let driver = match scheme.as_str() {
        "postgres" | "postgresql" => Driver::Postgres,
        "sqlite" => Driver::Sqlite,
        _ => return Err(ConfigError::UnsupportedScheme(scheme)),
    };

    let (host, port, name, ssl_mode) = match driver {
        Driver::Postgres => {
            let parsed = Url::parse(raw).map_err(|e| invalid("DATABASE_URL", "***", e))?;
            let ssl_mode = parsed
                .query_pairs()
                .find(|(k, _)| k == "sslmode")
                .and_then(|(_, v)| v.parse().ok());
            (
                parsed.host_str().map(str::to_string),
                parsed.port().or(Some(5432)),
                Some(parsed.path().trim_start_matches('/').to_string()).filter(|p| !p.is_empty()),
                ssl_mode,
            )
        }
        Driver::Sqlite => {
            let path = rest.trim_start_matches("//");
            let path = path.split('?').next().unwrap_or_default();
            (None, None, Some(path.to_string()), None)
        }
    };

    Ok(DatabaseConfig {
        driver,
        url: raw.to_string(),
        host,
        port,
        name,
        ssl_mode,
        pool_max,
        connect_timeout,
    })
}
