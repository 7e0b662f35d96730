pub mod criteria;

use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

pub use criteria::{load_criteria, load_criteria_or_standard, parse_criteria, CriteriaError};

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

/// Top-level configuration for the scout.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub paths: PathsConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("SCOUT_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("SCOUT_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("SCOUT_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("SCOUT_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let criteria_path = optional_var("SCOUT_CRITERIA_PATH").map(PathBuf::from);
        let data_dir = directory_var("SCOUT_DATA_DIR", "data")?;
        let output_dir = directory_var("SCOUT_OUTPUT_DIR", "output")?;

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            paths: PathsConfig {
                criteria_path,
                data_dir,
                output_dir,
            },
        })
    }
}

fn optional_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn directory_var(name: &'static str, default: &str) -> Result<PathBuf, ConfigError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyDirectory { variable: name }),
        Ok(value) => Ok(PathBuf::from(value.trim())),
        Err(_) => Ok(PathBuf::from(default)),
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

/// Where criteria are read from and where run artifacts land.
#[derive(Debug, Clone)]
pub struct PathsConfig {
    pub criteria_path: Option<PathBuf>,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl PathsConfig {
    pub fn state_file(&self) -> PathBuf {
        self.data_dir.join("state.json")
    }

    pub fn candidates_file(&self) -> PathBuf {
        self.output_dir.join("candidates.csv")
    }

    pub fn report_file(&self) -> PathBuf {
        self.output_dir.join("daily_report.md")
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    EmptyDirectory { variable: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "SCOUT_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "SCOUT_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::EmptyDirectory { variable } => {
                write!(f, "{variable} must name a directory when set")
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidPort | ConfigError::EmptyDirectory { .. } => None,
            ConfigError::InvalidHost { source } => Some(source),
        }
    }
}
