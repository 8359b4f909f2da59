use std::env;

use crate::models::Language;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for any request body, uploads included.
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct OcrConfig {
    /// Directory holding `*.traineddata`; `None` lets Tesseract search its defaults.
    pub data_path: Option<String>,
    pub default_language: Language,
}

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub idle_timeout_secs: u64,
    pub capacity: usize,
    pub sweep_interval_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "pretty" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown log format: {s}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            format: parse_env_or("LOG_FORMAT", LogFormat::Text),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 3600,
            capacity: 256,
            sweep_interval_secs: 60,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("TRANSCRIPTOR_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("TRANSCRIPTOR_PORT", 8501),
                max_upload_bytes: parse_env_or("MAX_UPLOAD_BYTES", 20 * 1024 * 1024),
            },
            ocr: OcrConfig {
                data_path: env::var("OCR_DATA_PATH").ok().filter(|p| !p.is_empty()),
                default_language: parse_env_or("OCR_DEFAULT_LANGUAGE", Language::default()),
            },
            session: SessionConfig {
                idle_timeout_secs: parse_env_or("SESSION_IDLE_TIMEOUT_SECS", 3600),
                capacity: parse_env_or("SESSION_CAPACITY", 256),
                sweep_interval_secs: parse_env_or("SESSION_SWEEP_INTERVAL_SECS", 60),
            },
            logging: LoggingConfig::from_env(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}
