use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

use crate::scoring::{AccountManagerWeights, AdminBands, ScoringConfig};

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub tracker: TrackerConfig,
    pub scoring: ScoringConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let active_role_limit = parse_var("APP_ACTIVE_ROLE_LIMIT", 30usize)?;
        let count_round_three = parse_flag("APP_AM_COUNT_ROUND_THREE")?;

        let defaults = AdminBands::default();
        let admin_bands = AdminBands {
            excellent: parse_var("APP_ADMIN_BAND_EXCELLENT", defaults.excellent)?,
            good: parse_var("APP_ADMIN_BAND_GOOD", defaults.good)?,
            average: parse_var("APP_ADMIN_BAND_AVERAGE", defaults.average)?,
        };
        if !(admin_bands.excellent >= admin_bands.good && admin_bands.good >= admin_bands.average) {
            return Err(ConfigError::UnorderedBands);
        }

        let leaderboard_size = parse_var("APP_LEADERBOARD_SIZE", 5usize)?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            tracker: TrackerConfig { active_role_limit },
            scoring: ScoringConfig {
                account_manager_weights: AccountManagerWeights::default()
                    .counting_round_three(count_round_three),
                admin_bands,
                leaderboard_size,
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn parse_flag(name: &'static str) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" | "" => Ok(false),
            _ => Err(ConfigError::InvalidFlag { name, value: raw }),
        },
        Err(_) => Ok(false),
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Limits applied by the tracker services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Open roles an account manager may hold before creation is refused.
    pub active_role_limit: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            active_role_limit: 30,
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidNumber { name: &'static str, value: String },
    InvalidFlag { name: &'static str, value: String },
    UnorderedBands,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be numeric (got '{value}')")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false (got '{value}')")
            }
            ConfigError::UnorderedBands => write!(
                f,
                "admin bands must satisfy EXCELLENT >= GOOD >= AVERAGE"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            _ => None,
        }
    }
}
