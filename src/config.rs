//! Layered gateway configuration: defaults, config file, environment, CLI.

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::endpoints::ApiEndpoints;
use crate::error::ConfigError;

/// Default cookie lifetime: seven days.
pub const DEFAULT_COOKIE_MAX_AGE_SECS: i64 = 7 * 24 * 60 * 60;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(short, long, env = "CONFIG_FILE")]
    pub config: Option<String>,

    /// Port to listen on
    #[arg(long, env = "PORT")]
    pub port: Option<u16>,

    /// Browser-facing backend URL
    #[arg(long, env = "PUBLIC_API_URL")]
    pub public_api_url: Option<String>,

    /// Server-only backend URL override
    #[arg(long, env = "INTERNAL_API_URL")]
    pub internal_api_url: Option<String>,

    /// Where to send the browser after sign-in (absolute URL or path)
    #[arg(long, env = "HOME_REDIRECT")]
    pub home_redirect: Option<String>,

    /// Deployment environment ("production" enables secure cookies)
    #[arg(long, env = "APP_ENV")]
    pub app_env: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiEndpoints,
    pub auth: AuthConfig,
    pub production: bool,
    /// BCP 47 tag for relative-time labels, e.g. `pt-BR` or `en`.
    pub locale: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub home_redirect: String,
    pub cookie_max_age_secs: i64,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_args(std::env::args())
    }

    pub fn load_from_args<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;

        let mut builder = Config::builder()
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("auth.home_redirect", "/")?
            .set_default("auth.cookie_max_age_secs", DEFAULT_COOKIE_MAX_AGE_SECS)?
            .set_default("production", false)?
            .set_default("locale", "pt-BR")?;

        // Explicit file wins; otherwise pick up ./config.yaml when present.
        if let Some(path) = &cli.config {
            builder = builder.add_source(File::with_name(path));
        } else if Path::new("config.yaml").exists() {
            builder = builder.add_source(File::with_name("config.yaml"));
        }

        // E.g. GATEWAY_SERVER__PORT=8000, GATEWAY_API__PUBLIC_URL=...
        builder = builder.add_source(
            Environment::with_prefix("GATEWAY")
                .separator("__")
                .try_parsing(true),
        );

        // Priority: CLI flag > CLI env var > GATEWAY_ env > config file > defaults.
        if let Some(port) = cli.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(url) = cli.public_api_url {
            builder = builder.set_override("api.public_url", url)?;
        }
        if let Some(url) = cli.internal_api_url {
            builder = builder.set_override("api.internal_url", url)?;
        }
        if let Some(home) = cli.home_redirect {
            builder = builder.set_override("auth.home_redirect", home)?;
        }
        if let Some(env) = cli.app_env {
            builder = builder.set_override("production", env.eq_ignore_ascii_case("production"))?;
        }

        let cfg = builder.build()?;
        Ok(cfg.try_deserialize()?)
    }
}
