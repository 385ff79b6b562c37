use std::net::SocketAddr;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[cfg(feature = "logging")]
use tracing_subscriber::filter::LevelFilter;

/// Database configuration.
#[derive(Deserialize)]
pub struct Database {
    /// Database URL string.
    pub url: String,
}

/// HTTP server configuration.
#[derive(Deserialize)]
pub struct Server {
    /// Address, that HTTP server will listen on.
    pub address: SocketAddr,
}

/// Implementation of [`serde`]'s deserializer for [`FromStr`] types.
#[cfg(feature = "logging")]
fn deserialize_from_str<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error,
    D: serde::de::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    std::str::FromStr::from_str(&s).map_err(serde::de::Error::custom)
}

/// Logging configuration.
#[cfg(feature = "logging")]
#[derive(Deserialize)]
pub struct Logging {
    /// Log level.
    #[serde(deserialize_with = "deserialize_from_str")]
    pub level: LevelFilter,
}

#[cfg(feature = "logging")]
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
        }
    }
}

/// Recommendation service configuration, including candidate pool heuristics.
#[derive(Deserialize)]
pub struct Recommendation {
    /// Root URL of the ranking service.
    pub url: String,

    /// Ranking request timeout, in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Recommendation count used when a client does not request one.
    #[serde(default = "default_count")]
    pub default_count: u64,

    /// Only propose users whose gender differs from the requesting user's gender.
    #[serde(default = "default_true")]
    pub opposite_gender: bool,

    /// Only propose users from the requesting user's region,
    /// if the requesting user has one.
    #[serde(default = "default_true")]
    pub narrow_by_region: bool,
}

fn default_timeout() -> u64 {
    10
}

fn default_count() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

/// General configuration.
#[derive(Deserialize)]
pub struct Config {
    /// General database configuration.
    pub database: Database,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: Option<Server>,

    /// Logging configuration.
    #[cfg(feature = "logging")]
    #[serde(default)]
    pub logging: Logging,

    /// Recommendation service configuration.
    #[serde(default)]
    pub recommendation: Option<Recommendation>,
}

impl Config {
    /// Create new config using default configuration file or environment variables.
    ///
    /// See [`Env`] for more details on how to use environment variables configuration.
    ///
    /// [`Env`]: figment::providers::Env
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("Config.toml"))
            .merge(Env::prefixed("CONFIG_").split("_"))
            .extract()
    }

    /// Create new config suitable for running unit tests.
    #[cfg(feature = "test-utils")]
    pub fn for_tests() -> Self {
        Self {
            database: Database {
                url: String::from("sqlite::memory:"),
            },
            server: Some(Server {
                address: "127.0.0.1:3000".parse().unwrap(),
            }),
            #[cfg(feature = "logging")]
            logging: Logging::default(),
            recommendation: Some(Recommendation {
                url: String::from("http://127.0.0.1:8000"),
                timeout: default_timeout(),
                default_count: default_count(),
                opposite_gender: true,
                narrow_by_region: true,
            }),
        }
    }
}
