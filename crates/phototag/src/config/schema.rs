use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::annotation::SchemaMode;

pub const ENV_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const ENV_MODEL: &str = "ANTHROPIC_MODEL";
pub const ENV_BASE_URL: &str = "ANTHROPIC_BASE_URL";
pub const ENV_MAX_TOKENS: &str = "PHOTOTAG_MAX_TOKENS";
pub const ENV_REQUEST_DELAY_MS: &str = "PHOTOTAG_REQUEST_DELAY_MS";

pub const DEFAULT_MODEL: &str = "claude-haiku-4-5-20251001";
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_secs(1);
pub const DEFAULT_ROOT: &str = "img";

/// Runtime configuration, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    /// Pause between consecutive service requests.
    pub request_delay: Duration,
    pub root: PathBuf,
    pub schema_mode: SchemaMode,
}

/// Values given on the command line; each one wins over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub request_delay: Option<Duration>,
    pub strict_schema: bool,
}
