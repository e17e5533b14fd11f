use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;
use thiserror::Error;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_GENERATION_URL: &str = "http://localhost:11434";
const DEFAULT_GENERATION_MODEL: &str = "llama3.2";
const DEFAULT_LOG_FILE: &str = "logs/student-records.log";

/// Errors encountered while loading configuration from environment variables.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Environment variable contained a value that could not be parsed.
    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(String),
}

/// Runtime configuration for the student records server.
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP server listens on.
    pub server_port: u16,
    /// Base URL of the text-generation runtime (Ollama-compatible).
    pub generation_url: String,
    /// Model identifier sent with every generation request.
    pub generation_model: String,
    /// Optional upper bound on a single generation round-trip.
    pub generation_timeout: Option<Duration>,
    /// Whether the store starts with the demo student records.
    pub seed_students: bool,
    /// Log file override; `None` selects `logs/student-records.log`.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: DEFAULT_SERVER_PORT,
            generation_url: DEFAULT_GENERATION_URL.to_string(),
            generation_model: DEFAULT_GENERATION_MODEL.to_string(),
            generation_timeout: None,
            seed_students: true,
            log_file: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            server_port: load_env_optional("SERVER_PORT")
                .map(|value| {
                    value
                        .parse()
                        .map_err(|_| ConfigError::InvalidValue("SERVER_PORT".into()))
                })
                .transpose()?
                .unwrap_or(defaults.server_port),
            generation_url: load_env_optional("GENERATION_URL").unwrap_or(defaults.generation_url),
            generation_model: load_env_optional("GENERATION_MODEL")
                .unwrap_or(defaults.generation_model),
            generation_timeout: load_env_optional("GENERATION_TIMEOUT_SECS")
                .map(|value| {
                    value
                        .parse::<u64>()
                        .ok()
                        .filter(|secs| *secs > 0)
                        .map(Duration::from_secs)
                        .ok_or_else(|| ConfigError::InvalidValue("GENERATION_TIMEOUT_SECS".into()))
                })
                .transpose()?,
            seed_students: load_env_optional("SEED_STUDENTS")
                .map(|value| {
                    parse_bool(&value)
                        .ok_or_else(|| ConfigError::InvalidValue("SEED_STUDENTS".into()))
                })
                .transpose()?
                .unwrap_or(defaults.seed_students),
            log_file: load_env_optional("STUDENT_API_LOG_FILE").map(PathBuf::from),
        })
    }

    /// Path the file log layer appends to.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE))
    }
}

fn load_env_optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Global configuration cache populated during process start.
pub static CONFIG: OnceLock<Config> = OnceLock::new();

/// Retrieve the loaded configuration, panicking if initialization has not occurred.
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config not initialized")
}

/// Load configuration from the environment and install it in the global cache.
///
/// A second call keeps the configuration installed by the first one.
pub fn init_config() -> Result<(), ConfigError> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;
    tracing::debug!(
        server_port = config.server_port,
        generation_url = %config.generation_url,
        generation_model = %config.generation_model,
        generation_timeout = ?config.generation_timeout,
        seed_students = config.seed_students,
        log_file = ?config.log_file,
        "Loaded configuration"
    );
    if CONFIG.set(config).is_err() {
        tracing::warn!("Configuration already initialized; keeping the existing values");
    }
    Ok(())
}
