use crate::error::{FelmError, Result};
use clap::{Parser, ValueEnum};
use std::fmt;
use std::time::Duration;

const DEFAULT_CACHE_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, Parser)]
#[command(name = "felm", version, about = "felm is a discord bot")]
pub struct Cli {
    /// Discord bot token
    #[arg(long, env = "FELM_TOKEN", hide_env_values = true)]
    pub token: String,

    /// Handler timeout in seconds (values below 5 are raised to 5)
    #[arg(long, env = "FELM_TIMEOUT", default_value_t = 5)]
    pub timeout: u64,

    /// How long fetched channel metadata stays cached, in seconds
    #[arg(long, env = "FELM_CACHE_TTL", default_value_t = DEFAULT_CACHE_TTL_SECS)]
    pub cache_ttl: u64,

    /// Log output format
    #[arg(long, env = "FELM_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines
    Text,
    /// One JSON object per event
    Json,
}

/// Validated runtime settings, built once at startup
#[derive(Debug, Clone)]
pub struct Settings {
    pub discord: DiscordConfig,
    pub handler: HandlerConfig,
    pub cache: CacheConfig,
    pub log_format: LogFormat,
}

/// Discord credentials
#[derive(Clone)]
pub struct DiscordConfig {
    /// Bot token (never logged)
    pub token: String,
}

impl fmt::Debug for DiscordConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiscordConfig")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Event handler settings
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    /// Per-handler deadline before the dispatcher's floor is applied
    pub timeout: Duration,
}

/// Channel cache settings
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Lifetime of a cached channel, also the janitor interval
    pub ttl: Duration,
}

impl Settings {
    pub fn handler_timeout(&self) -> Duration {
        self.handler.timeout
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache.ttl
    }
}

impl TryFrom<Cli> for Settings {
    type Error = FelmError;

    fn try_from(cli: Cli) -> Result<Self> {
        let token = cli.token.trim().to_string();
        if token.is_empty() {
            return Err(FelmError::Config("FELM_TOKEN not set".to_string()));
        }

        if cli.cache_ttl == 0 {
            return Err(FelmError::Config("Invalid FELM_CACHE_TTL".to_string()));
        }

        Ok(Settings {
            discord: DiscordConfig { token },
            handler: HandlerConfig {
                timeout: Duration::from_secs(cli.timeout),
            },
            cache: CacheConfig {
                ttl: Duration::from_secs(cli.cache_ttl),
            },
            log_format: cli.log_format,
        })
    }
}

pub fn load_settings() -> Result<Settings> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    Settings::try_from(Cli::parse())
}
