//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use serde::Deserialize;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Config {
    /// Webserver configuration.
    pub server: Server,

    /// [`service::Service`] configuration.
    pub service: Service,

    /// Postgres database configuration.
    pub postgres: Postgres,

    /// Logging configuration.
    pub log: Log,
}

impl Config {
    /// Loads a [`Config`] from the file at the provided `path` (if it
    /// exists), overlaid with `CONF`-prefixed environment variables, with
    /// defaults filling whatever is left unset.
    ///
    /// # Errors
    ///
    /// If the assembled configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Webserver configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host the webserver binds to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port the webserver binds to.
    #[default(8080)]
    pub port: u16,

    /// [CORS] configuration.
    ///
    /// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
    pub cors: Cors,
}

/// [CORS] configuration.
///
/// [CORS]: https://developer.mozilla.org/en-US/docs/Web/HTTP/CORS
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Cors {
    /// Origins allowed to query the API.
    #[default(vec!["*".to_owned()])]
    pub origins: Vec<String>,
}

/// [`service::Service`] configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Service {
    /// Background tasks configuration.
    pub tasks: Tasks,
}

impl From<Service> for service::Config {
    fn from(value: Service) -> Self {
        let Service {
            tasks: Tasks {
                purge_deleted_payments,
            },
        } = value;
        Self {
            purge_deleted_payments:
                service::task::purge_deleted_payments::Config {
                    interval: purge_deleted_payments.interval,
                    retention: purge_deleted_payments.retention,
                },
        }
    }
}

/// Background tasks configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Tasks {
    /// Soft-deleted payments purging task configuration.
    pub purge_deleted_payments: Task,
}

/// Single background task configuration.
#[derive(Clone, Copy, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Task {
    /// Interval the task runs with.
    #[default(time::Duration::from_secs(60 * 60))]
    #[serde(with = "humantime_serde")]
    pub interval: time::Duration,

    /// Period soft-deleted entities are retained before being purged.
    #[default(time::Duration::from_secs(60 * 60 * 24 * 30))]
    #[serde(with = "humantime_serde")]
    pub retention: time::Duration,
}

/// Postgres database configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Postgres {
    /// Host of the database to connect to.
    #[default("127.0.0.1".to_owned())]
    pub host: String,

    /// Port of the database to connect to.
    #[default(5432)]
    pub port: u16,

    /// User to connect to the database as.
    #[default("postgres".to_owned())]
    pub user: String,

    /// Password to authenticate with.
    #[default("postgres".to_owned())]
    pub password: String,

    /// Name of the database to connect to.
    #[default("postgres".to_owned())]
    pub dbname: String,
}

impl From<Postgres> for service::infra::postgres::Config {
    fn from(value: Postgres) -> Self {
        let Postgres {
            host,
            port,
            user,
            password,
            dbname,
        } = value;

        Self {
            host: Some(host),
            port: Some(port),
            user: Some(user),
            password: Some(password),
            dbname: Some(dbname),
            ..Self::default()
        }
    }
}

/// Logging configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Maximum verbosity of emitted logs.
    pub level: LogLevel,
}

/// Verbosity of emitted logs.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Extremely verbose diagnostic information.
    Trace,

    /// Verbose diagnostic information.
    Debug,

    /// Regular operational information.
    #[default]
    Info,

    /// Suspicious, but non-fatal, situations.
    Warn,

    /// Serious errors only.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
