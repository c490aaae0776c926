use axum::http::HeaderValue;
use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_optional_env, is_production};
use service_core::error::AppError;

/// Gemini API base URL.
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Local dev server and the published frontend.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:5173", "https://shriyabi.github.io"];

#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub common: core_config::Config,
    pub google: GoogleConfig,
    pub models: ModelConfig,
    pub cors: CorsConfig,
    pub classification: ClassificationConfig,
}

#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Missing keys are not fatal at startup; each classify call fails instead.
    pub api_key: Option<Secret<String>>,
    pub api_base: String,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Model used for classification (e.g., gemini-2.5-flash)
    pub classification_model: String,
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ClassificationConfig {
    /// Reject model output whose keys or values fall outside the request.
    pub strict_output: bool,
}

impl ClassifierConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = is_production();

        let default_origins = DEFAULT_ALLOWED_ORIGINS.join(",");

        let config = ClassifierConfig {
            common: common_config,
            google: GoogleConfig {
                api_key: get_optional_env("GEMINI_API").map(Secret::new),
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), false)?,
                request_timeout_secs: get_env(
                    "CLASSIFIER_REQUEST_TIMEOUT_SECS",
                    Some(&DEFAULT_REQUEST_TIMEOUT_SECS.to_string()),
                    false,
                )?
                .parse()
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
            },
            models: ModelConfig {
                classification_model: get_env("CLASSIFIER_MODEL", Some(DEFAULT_MODEL), false)?,
            },
            cors: CorsConfig {
                allowed_origins: parse_origins(&get_env(
                    "ALLOWED_ORIGINS",
                    Some(&default_origins),
                    false,
                )?),
            },
            classification: ClassificationConfig {
                strict_output: parse_bool(&get_env(
                    "CLASSIFIER_STRICT_OUTPUT",
                    Some("false"),
                    false,
                )?),
            },
        };

        config.validate()?;
        if is_prod {
            config.validate_for_production()?;
        }
        Ok(config)
    }

    /// Check the CORS allow-list. Credentials are allowed, so a wildcard
    /// origin is never valid.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.cors.allowed_origins.is_empty() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "ALLOWED_ORIGINS must list at least one origin"
            )));
        }
        if self.cors.allowed_origins.iter().any(|o| o == "*") {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Wildcard CORS origin cannot be combined with credentials"
            )));
        }
        self.origin_header_values().map(|_| ())
    }

    /// The API key travels in a request header, so production only talks to
    /// the provider over TLS.
    pub fn validate_for_production(&self) -> Result<(), AppError> {
        if !self.google.api_base.starts_with("https://") {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "GEMINI_API_BASE must use https in production, got '{}'",
                self.google.api_base
            )));
        }
        Ok(())
    }

    /// Allowed origins as header values for the CORS layer.
    pub fn origin_header_values(&self) -> Result<Vec<HeaderValue>, AppError> {
        self.cors
            .allowed_origins
            .iter()
            .map(|o| {
                o.parse::<HeaderValue>().map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("Invalid CORS origin '{}': {}", o, e))
                })
            })
            .collect()
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(|o| o.trim_end_matches('/').to_string())
        .collect()
}

fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
