use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use config::{builder::DefaultState, ConfigBuilder};
use std::env;
use std::path::PathBuf;

/// 5 MB, the largest `/api/generate` body accepted.
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 5 * 1024 * 1024;

#[derive(Deserialize, Clone, Default)]
pub struct RelaySettings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub upstream: UpstreamSettings,
    #[serde(default)]
    pub frontend: FrontendSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_body_limit")]
    pub body_limit_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            body_limit_bytes: default_body_limit(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3001
}

fn default_body_limit() -> usize {
    DEFAULT_BODY_LIMIT_BYTES
}

/// Where and how prompts are forwarded.
#[derive(Deserialize, Clone, Default)]
pub struct UpstreamSettings {
    /// Full generate endpoint, e.g.
    /// `https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent`.
    #[serde(default)]
    pub url: Option<String>,
    /// Sent as the `key` query parameter.
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
    /// No timeout unless set.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl UpstreamSettings {
    /// The configured key, unless it is missing or blank.
    pub fn api_key(&self) -> Option<&str> {
        use secrecy::ExposeSecret;

        self.api_key
            .as_ref()
            .map(|key| key.expose_secret().as_str())
            .filter(|key| !key.trim().is_empty())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_some()
    }
}

#[derive(Deserialize, Clone)]
pub struct FrontendSettings {
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

impl Default for FrontendSettings {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
        }
    }
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("prompt-relay/static")
}

#[derive(Deserialize, Clone)]
pub struct TelemetrySettings {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            otlp_endpoint: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load settings from `config/base.yaml`, `APP__*` variables and the
/// `PORT` / `API_KEY` / `PROVIDER_URL` (or `GEMINI_ENDPOINT`) variables, in
/// increasing precedence.
pub fn get_configuration() -> Result<RelaySettings, AppError> {
    let configuration_directory = core_config::config_directory("prompt-relay")?;
    let static_dir = configuration_directory
        .parent()
        .map(|dir| dir.join("static"))
        .unwrap_or_else(default_static_dir);

    let builder = core_config::layered(&configuration_directory.join("base.yaml"))
        .set_default("frontend.static_dir", static_dir.to_string_lossy().to_string())?;
    let settings = compatibility_overrides(builder, |name| env::var(name).ok())?.build()?;

    Ok(settings.try_deserialize::<RelaySettings>()?)
}

/// `PORT`, `API_KEY` and `PROVIDER_URL` (falling back to `GEMINI_ENDPOINT`)
/// take precedence over every other source.
fn compatibility_overrides(
    builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_override_option("server.port", lookup("PORT"))?
        .set_override_option("upstream.api_key", lookup("API_KEY"))?
        .set_override_option(
            "upstream.url",
            lookup("PROVIDER_URL").or_else(|| lookup("GEMINI_ENDPOINT")),
        )
}
