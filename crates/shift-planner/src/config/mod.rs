use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};

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
    pub guarantee: GuaranteeConfig,
    pub eligibility: EligibilityConfig,
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

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            guarantee: GuaranteeConfig::from_env()?,
            eligibility: EligibilityConfig::from_env()?,
        })
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

/// Tracing and metrics controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

/// Business rules backing the income guarantee.
///
/// The threshold is the fraction of predicted earnings the platform
/// guarantees as a minimum payout; shifts shorter than `min_shift_hours`
/// can still be committed but are not covered.
#[derive(Debug, Clone, Copy)]
pub struct GuaranteeConfig {
    pub threshold: f64,
    pub min_shift_hours: f64,
}

impl GuaranteeConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let threshold = parse_fraction("GUARANTEE_THRESHOLD", 0.9)?;
        let min_shift_hours = parse_positive("MIN_SHIFT_HOURS", 4.0)?;
        Ok(Self {
            threshold,
            min_shift_hours,
        })
    }
}

impl Default for GuaranteeConfig {
    fn default() -> Self {
        Self {
            threshold: 0.9,
            min_shift_hours: 4.0,
        }
    }
}

/// Thresholds gating guarantee protection per worker.
#[derive(Debug, Clone, Copy)]
pub struct EligibilityConfig {
    pub min_active_hours_per_week: f64,
    pub min_acceptance_rate: f64,
    pub max_cancellation_rate: f64,
}

impl EligibilityConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            min_active_hours_per_week: parse_positive("MIN_ACTIVE_HOURS_PER_WEEK", 20.0)?,
            min_acceptance_rate: parse_fraction("MIN_ACCEPTANCE_RATE", 0.95)?,
            max_cancellation_rate: parse_fraction("MAX_CANCELLATION_RATE", 0.05)?,
        })
    }
}

impl Default for EligibilityConfig {
    fn default() -> Self {
        Self {
            min_active_hours_per_week: 20.0,
            min_acceptance_rate: 0.95,
            max_cancellation_rate: 0.05,
        }
    }
}

fn parse_fraction(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => {
            let value = raw
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidFraction { key })?;
            if (0.0..=1.0).contains(&value) {
                Ok(value)
            } else {
                Err(ConfigError::InvalidFraction { key })
            }
        }
        Err(_) => Ok(default),
    }
}

fn parse_positive(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(raw) => {
            let value = raw
                .parse::<f64>()
                .map_err(|_| ConfigError::InvalidNumber { key })?;
            if value.is_finite() && value > 0.0 {
                Ok(value)
            } else {
                Err(ConfigError::InvalidNumber { key })
            }
        }
        Err(_) => Ok(default),
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidFraction { key: &'static str },
    InvalidNumber { key: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidFraction { key } => {
                write!(f, "{key} must be a number between 0.0 and 1.0")
            }
            ConfigError::InvalidNumber { key } => {
                write!(f, "{key} must be a positive number")
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        env::remove_var("APP_ENV");
        env::remove_var("APP_HOST");
        env::remove_var("APP_PORT");
        env::remove_var("APP_LOG_LEVEL");
        env::remove_var("GUARANTEE_THRESHOLD");
        env::remove_var("MIN_SHIFT_HOURS");
        env::remove_var("MIN_ACTIVE_HOURS_PER_WEEK");
        env::remove_var("MIN_ACCEPTANCE_RATE");
        env::remove_var("MAX_CANCELLATION_RATE");
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.guarantee.threshold, 0.9);
        assert_eq!(config.guarantee.min_shift_hours, 4.0);
        assert_eq!(config.eligibility.min_acceptance_rate, 0.95);
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
        env::remove_var("APP_HOST");
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("GUARANTEE_THRESHOLD", "1.5");
        let err = AppConfig::load().expect_err("threshold above 1.0 rejected");
        assert!(matches!(err, ConfigError::InvalidFraction { .. }));
        env::remove_var("GUARANTEE_THRESHOLD");
    }

    #[test]
    fn reads_custom_guarantee_threshold() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("GUARANTEE_THRESHOLD", "0.8");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(config.guarantee.threshold, 0.8);
        env::remove_var("GUARANTEE_THRESHOLD");
    }
}
