mod settings;

pub use settings::{
    CacheConfig, Cli, DiscordConfig, HandlerConfig, LogFormat, Settings, load_settings,
};
