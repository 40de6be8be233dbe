use anyhow::Context;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use clap::{Parser, ValueEnum};
use std::fmt::Display;
use tower_http::cors::{AllowOrigin, CorsLayer};
use veil_core::DomainSpec;
use veil_uploader::CreateSettings;
use veil_viewer::RenderSettings;

pub const LISTEN_ADDR_ENV: &str = "VEIL_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "VEIL_STORAGE_BACKEND";
pub const REDIS_URL_ENV: &str = "VEIL_REDIS_URL";
pub const REDIS_KEY_PREFIX_ENV: &str = "VEIL_REDIS_KEY_PREFIX";
pub const CORS_ORIGINS_ENV: &str = "VEIL_CORS_ORIGINS";
pub const CORS_METHODS_ENV: &str = "VEIL_CORS_METHODS";
pub const RAW_BASE_URL_ENV: &str = "VEIL_RAW_BASE_URL";
pub const RETRIEVAL_BASE_URL_ENV: &str = "VEIL_RETRIEVAL_BASE_URL";
pub const DELETION_API_URL_ENV: &str = "VEIL_DELETION_API_URL";
pub const HOME_URL_ENV: &str = "VEIL_HOME_URL";
pub const DEFAULT_DOMAINS_ENV: &str = "VEIL_DEFAULT_DOMAINS";
pub const CLOAK_MARKER_ENV: &str = "VEIL_CLOAK_MARKER";
pub const DEFAULT_TIMEZONE_ENV: &str = "VEIL_DEFAULT_TIMEZONE";
pub const LOG_FORMAT_ENV: &str = "VEIL_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
pub const DEFAULT_REDIS_KEY_PREFIX: &str = "veil:obj:";
pub const DEFAULT_CORS_ORIGINS: &str = "*";
pub const DEFAULT_CORS_METHODS: &str = "GET,POST,OPTIONS";
pub const DEFAULT_RAW_BASE_URL: &str = "http://localhost:8080/raw";
pub const DEFAULT_RETRIEVAL_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_DELETION_API_URL: &str = "http://localhost:8080/api/delete";
pub const DEFAULT_HOME_URL: &str = "http://localhost:8080/health";
/// Zero-width joiners.
pub const DEFAULT_CLOAK_MARKER: &str = "\u{200D}\u{200D}\u{200D}\u{200D}";
pub const DEFAULT_TIMEZONE: &str = "America/New_York";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "redis")]
    Redis,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Redis => write!(f, "redis"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[value(name = "pretty")]
    Pretty,
    #[value(name = "json")]
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "veil-gateway", about = "File and URL drop over HTTP")]
pub struct GatewayConfig {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: String,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = REDIS_URL_ENV, required_if_eq("storage", "redis"))]
    pub redis_url: Option<String>,

    #[arg(long, env = REDIS_KEY_PREFIX_ENV, default_value = DEFAULT_REDIS_KEY_PREFIX)]
    pub redis_key_prefix: String,

    /// `*` or a comma separated list of origins.
    #[arg(long, env = CORS_ORIGINS_ENV, default_value = DEFAULT_CORS_ORIGINS)]
    pub cors_origins: String,

    #[arg(long, env = CORS_METHODS_ENV, default_value = DEFAULT_CORS_METHODS)]
    pub cors_methods: String,

    /// Base of the locators that serve stored bytes.
    #[arg(long, env = RAW_BASE_URL_ENV, default_value = DEFAULT_RAW_BASE_URL)]
    pub raw_base_url: String,

    /// Base of the locators that render landing pages.
    #[arg(long, env = RETRIEVAL_BASE_URL_ENV, default_value = DEFAULT_RETRIEVAL_BASE_URL)]
    pub retrieval_base_url: String,

    #[arg(long, env = DELETION_API_URL_ENV, default_value = DEFAULT_DELETION_API_URL)]
    pub deletion_api_url: String,

    #[arg(long, env = HOME_URL_ENV, default_value = DEFAULT_HOME_URL)]
    pub home_url: String,

    /// Domain spec used when an upload sends an empty `domains` field,
    /// e.g. `x.com<real>y.net<fake>`.
    #[arg(long, env = DEFAULT_DOMAINS_ENV)]
    pub default_domains: Option<String>,

    #[arg(long, env = CLOAK_MARKER_ENV, default_value = DEFAULT_CLOAK_MARKER)]
    pub cloak_marker: String,

    #[arg(long, env = DEFAULT_TIMEZONE_ENV, default_value = DEFAULT_TIMEZONE)]
    pub default_timezone: String,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl GatewayConfig {
    pub fn create_settings(&self) -> anyhow::Result<CreateSettings> {
        let default_domains = match self.default_domains.as_deref() {
            Some(spec) if !spec.trim().is_empty() => {
                DomainSpec::parse(spec).context("invalid default domain spec")?
            }
            _ => DomainSpec::default(),
        };

        Ok(CreateSettings::builder()
            .raw_base_url(self.raw_base_url.as_str())
            .retrieval_base_url(self.retrieval_base_url.as_str())
            .default_domains(default_domains)
            .cloak_marker(self.cloak_marker.as_str())
            .default_timezone(self.default_timezone.as_str())
            .build())
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings::builder()
            .raw_base_url(self.raw_base_url.as_str())
            .deletion_api_url(self.deletion_api_url.as_str())
            .home_url(self.home_url.as_str())
            .build()
    }

    /// Builds the CORS policy shared by every route.
    pub fn cors_layer(&self) -> anyhow::Result<CorsLayer> {
        let origins = if self.cors_origins.trim() == "*" {
            AllowOrigin::any()
        } else {
            let origins = split_list(&self.cors_origins)
                .map(|origin| {
                    HeaderValue::from_str(origin)
                        .with_context(|| format!("invalid CORS origin '{origin}'"))
                })
                .collect::<anyhow::Result<Vec<_>>>()?;
            AllowOrigin::list(origins)
        };

        let methods = split_list(&self.cors_methods)
            .map(|method| {
                Method::from_bytes(method.as_bytes())
                    .with_context(|| format!("invalid CORS method '{method}'"))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers([CONTENT_TYPE]))
    }
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}
