use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:5173,http://localhost:3000";
const DEFAULT_RELAY_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

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

    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub store: StoreConfig,
    pub mail: MailConfig,
    pub client: ClientConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;
        let cors_origins = split_list(
            &env::var("APP_CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.to_string()),
        );

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let store = StoreConfig {
            url: env::var("APP_STORE_URL").unwrap_or_else(|_| "sqlite://school.db".to_string()),
            fallback_path: PathBuf::from(
                env::var("APP_FALLBACK_DATA").unwrap_or_else(|_| "data/fallback.json".to_string()),
            ),
        };

        let mail = MailConfig {
            host: env::var("APP_MAIL_HOST").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            port: env::var("APP_MAIL_PORT")
                .unwrap_or_else(|_| "465".to_string())
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidMailPort)?,
            user: non_empty_var("APP_MAIL_USER"),
            password: non_empty_var("APP_MAIL_PASSWORD"),
            recipient: non_empty_var("APP_MAIL_RECIPIENT"),
        };

        let client = ClientConfig {
            api_url: env::var("APP_API_URL")
                .unwrap_or_else(|_| format!("http://localhost:{port}")),
            transport: TransportKind::parse(
                &env::var("APP_SUBMIT_TRANSPORT").unwrap_or_else(|_| "backend".to_string()),
            )?,
            relay: RelayConfig {
                url: env::var("APP_RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string()),
                service_id: non_empty_var("APP_RELAY_SERVICE_ID"),
                public_key: non_empty_var("APP_RELAY_PUBLIC_KEY"),
                contact_template: non_empty_var("APP_RELAY_CONTACT_TEMPLATE"),
                admission_template: non_empty_var("APP_RELAY_ADMISSION_TEMPLATE"),
            },
        };

        Ok(Self {
            environment,
            server: ServerConfig {
                host,
                port,
                cors_origins,
            },
            telemetry: TelemetryConfig { log_level },
            store,
            mail,
            client,
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API from a browser.
    pub cors_origins: Vec<String>,
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

/// Document store location and the fallback dataset served when it is empty.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub url: String,
    pub fallback_path: PathBuf,
}

/// Outbound mail relay settings.
#[derive(Clone)]
pub struct MailConfig {
    pub host: String,
    pub port: u16,
    pub user: Option<String>,
    pub password: Option<String>,
    pub recipient: Option<String>,
}

impl MailConfig {
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.user, &self.password) {
            (Some(user), Some(password)) => Some((user.as_str(), password.as_str())),
            _ => None,
        }
    }

    /// Where notifications go when the caller does not name a recipient.
    pub fn default_recipient(&self) -> Option<&str> {
        self.recipient.as_deref().or(self.user.as_deref())
    }
}

impl fmt::Debug for MailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// Which path the client uses to deliver form submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Backend,
    Relay,
}

impl TransportKind {
    fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "backend" | "api" => Ok(Self::Backend),
            "relay" | "emailjs" => Ok(Self::Relay),
            other => Err(ConfigError::UnknownTransport(other.to_string())),
        }
    }
}

/// Client-side submission settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub transport: TransportKind,
    pub relay: RelayConfig,
}

/// Third-party email relay account used by the relay transport.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub url: String,
    pub service_id: Option<String>,
    pub public_key: Option<String>,
    pub contact_template: Option<String>,
    pub admission_template: Option<String>,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidMailPort,
    InvalidHost { source: std::net::AddrParseError },
    UnknownTransport(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidMailPort => write!(f, "APP_MAIL_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::UnknownTransport(value) => write!(
                f,
                "APP_SUBMIT_TRANSPORT must be 'backend' or 'relay', got '{value}'"
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidMailPort
            | ConfigError::UnknownTransport(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    const VARS: &[&str] = &[
        "APP_ENV",
        "APP_HOST",
        "APP_PORT",
        "APP_LOG_LEVEL",
        "APP_CORS_ORIGINS",
        "APP_STORE_URL",
        "APP_FALLBACK_DATA",
        "APP_MAIL_HOST",
        "APP_MAIL_PORT",
        "APP_MAIL_USER",
        "APP_MAIL_PASSWORD",
        "APP_MAIL_RECIPIENT",
        "APP_API_URL",
        "APP_SUBMIT_TRANSPORT",
        "APP_RELAY_URL",
        "APP_RELAY_SERVICE_ID",
        "APP_RELAY_PUBLIC_KEY",
        "APP_RELAY_CONTACT_TEMPLATE",
        "APP_RELAY_ADMISSION_TEMPLATE",
    ];

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5000);
        assert_eq!(
            config.server.cors_origins,
            vec!["http://localhost:5173", "http://localhost:3000"]
        );
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.mail.port, 465);
        assert!(config.mail.credentials().is_none());
        assert_eq!(config.client.transport, TransportKind::Backend);
        assert_eq!(config.client.api_url, "http://localhost:5000");
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 5000));
        reset_env();
    }

    #[test]
    fn recipient_falls_back_to_mail_user() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_MAIL_USER", "office@school.example");
        env::set_var("APP_MAIL_PASSWORD", "app-password");
        let config = AppConfig::load().expect("config loads");
        assert_eq!(
            config.mail.default_recipient(),
            Some("office@school.example")
        );
        assert!(!format!("{:?}", config.mail).contains("app-password"));
        reset_env();
    }

    #[test]
    fn rejects_unknown_transport() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_SUBMIT_TRANSPORT", "carrier-pigeon");
        let err = AppConfig::load().expect_err("transport is validated");
        assert!(matches!(err, ConfigError::UnknownTransport(_)));
        reset_env();
    }

    #[test]
    fn production_marker_is_recognised() {
        assert!(AppEnvironment::from_str("Production").is_production());
        assert!(!AppEnvironment::from_str("staging").is_production());
    }
}
