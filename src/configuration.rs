use config::{Config, File, FileFormat};
use reqwest::Method;
use serde::Deserialize;
use std::env;
use std::fmt;
use std::time::Duration;
use tracing::info;

const BASE_CONFIG: &str = include_str!("../configuration/base.yaml");
const LOCAL_CONFIG: &str = include_str!("../configuration/local.yaml");
const PRODUCTION_CONFIG: &str = include_str!("../configuration/production.yaml");

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub probe: ProbeSettings,
    pub cors: CorsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Outbound client configuration, fixed for the lifetime of the process.
#[derive(Debug, Deserialize, Clone)]
pub struct ProbeSettings {
    pub method: ProbeMethod,
    /// When false, the first 3xx response is reported as-is.
    pub follow_redirects: bool,
    pub max_redirects: usize,
    pub timeout_seconds: u64,
    pub user_agent: String,
    pub accept: String,
}

impl ProbeSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum ProbeMethod {
    #[default]
    Get,
    Head,
}

impl ProbeMethod {
    pub fn as_method(&self) -> Method {
        match self {
            ProbeMethod::Get => Method::GET,
            ProbeMethod::Head => Method::HEAD,
        }
    }
}

impl fmt::Display for ProbeMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_method().as_str())
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    dotenvy::dotenv().ok();

    let environment = get_environment()?;
    info!(environment = environment.as_str(), "Loading configuration");
    build_configuration(environment)
}

fn get_environment() -> Result<Environment, config::ConfigError> {
    let env_var = env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "local".to_string());

    env_var
        .try_into()
        .map_err(|_| config::ConfigError::NotFound("Failed to parse APP_ENVIRONMENT".to_string()))
}

fn build_configuration(environment: Environment) -> Result<Settings, config::ConfigError> {
    let environment_config = match environment {
        Environment::Local => LOCAL_CONFIG,
        Environment::Production => PRODUCTION_CONFIG,
    };

    let config = Config::builder()
        .add_source(File::from_str(BASE_CONFIG, FileFormat::Yaml))
        .add_source(File::from_str(environment_config, FileFormat::Yaml))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize::<Settings>()
}

#[derive(Debug, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}
