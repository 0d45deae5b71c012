use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(".")
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Config::builder()
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/default")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(
                File::with_name(
                    path.as_ref()
                        .join("config/local")
                        .to_string_lossy()
                        .as_ref(),
                )
                .required(false),
            )
            .add_source(Environment::default().separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "GithubConfig::default_user_agent")]
    pub user_agent: String,
    #[serde(default = "GithubConfig::default_api_base")]
    pub api_base: String,
    #[serde(default = "GithubConfig::default_per_page")]
    pub per_page: u32,
    #[serde(default = "GithubConfig::default_max_pages")]
    pub max_pages: u32,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            user_agent: Self::default_user_agent(),
            api_base: Self::default_api_base(),
            per_page: Self::default_per_page(),
            max_pages: Self::default_max_pages(),
        }
    }
}

impl GithubConfig {
    pub const TOKEN_ENV: &'static str = "GITHUB_TOKEN";

    fn default_user_agent() -> String {
        "repo-dashboard".to_string()
    }

    fn default_api_base() -> String {
        "https://api.github.com/".to_string()
    }

    const fn default_per_page() -> u32 {
        100
    }

    const fn default_max_pages() -> u32 {
        50
    }

    /// Configured token, or the plain `GITHUB_TOKEN` variable when the layered
    /// config does not carry one.
    pub fn resolved_token(&self) -> Result<String> {
        let configured = self
            .token
            .as_deref()
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string);
        if let Some(token) = configured {
            return Ok(token);
        }
        match std::env::var(Self::TOKEN_ENV) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(AppError::MissingCredential(Self::TOKEN_ENV)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "ReportConfig::default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "ReportConfig::default_csv_file")]
    pub csv_file: String,
    #[serde(default = "ReportConfig::default_dashboard_file")]
    pub dashboard_file: String,
    #[serde(default = "ReportConfig::default_title")]
    pub title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: Self::default_output_dir(),
            csv_file: Self::default_csv_file(),
            dashboard_file: Self::default_dashboard_file(),
            title: Self::default_title(),
        }
    }
}

impl ReportConfig {
    fn default_output_dir() -> PathBuf {
        PathBuf::from("output")
    }

    fn default_csv_file() -> String {
        "repositories.csv".to_string()
    }

    fn default_dashboard_file() -> String {
        "github_dashboard.svg".to_string()
    }

    fn default_title() -> String {
        "GitHub Analytics".to_string()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}
