use anyhow::Context as _;
use felm::cache::{TtlCache, spawn_janitor};
use felm::citation::CitationService;
use felm::config::load_settings;
use felm::discord::{DiscordClient, Dispatcher, Gateway};
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let settings = load_settings().context("failed to load configuration")?;

    // Initialize tracing
    felm::logging::init(settings.log_format);

    tracing::info!("felm is starting setup");
    tracing::debug!(
        timeout_secs = settings.handler_timeout().as_secs(),
        cache_ttl_secs = settings.cache_ttl().as_secs(),
        "Configuration loaded"
    );

    // Create Discord REST client
    let discord_client = Arc::new(DiscordClient::new(&settings.discord.token));

    // Channel metadata cache, swept once per TTL
    let channel_cache = Arc::new(TtlCache::new(settings.cache_ttl()));
    let janitor = spawn_janitor("channels", channel_cache.clone(), settings.cache_ttl());

    let citation = Arc::new(CitationService::new(discord_client, channel_cache));
    let dispatcher =
        Arc::new(Dispatcher::new(settings.handler_timeout()).with_handler(citation));
    tracing::info!(
        timeout_secs = dispatcher.timeout().as_secs(),
        handlers = dispatcher.handler_count(),
        "Event dispatcher ready"
    );

    let gateway = Gateway::connect(&settings.discord.token, dispatcher)
        .await
        .context("failed to open connection")?;
    let shard_manager = gateway.shard_manager();

    tracing::info!("starting application");
    let mut gateway_task = tokio::spawn(gateway.run());

    let result = tokio::select! {
        result = &mut gateway_task => {
            match result {
                Ok(Ok(())) => {
                    tracing::info!("Gateway stopped");
                    Ok(())
                }
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "Gateway connection failed");
                    Err(anyhow::Error::new(e))
                }
                Err(e) => {
                    tracing::error!(error = %e, "Gateway task failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
        signal_name = shutdown_signal() => {
            tracing::info!(signal = %signal_name, "signal received, closing application");
            shard_manager.shutdown_all().await;
            if let Err(e) = gateway_task.await {
                tracing::warn!(error = %e, "Gateway task ended abnormally");
            }
            Ok(())
        }
    };

    janitor.abort();

    if result.is_ok() {
        tracing::info!("application stopped successfully");
    }
    result
}

/// Wait for SIGINT, SIGTERM or SIGQUIT (Ctrl+C on non-unix)
async fn shutdown_signal() -> String {
    #[cfg(unix)]
    {
        use signal::unix::{SignalKind, signal};

        let (Ok(mut sigint), Ok(mut sigterm), Ok(mut sigquit)) = (
            signal(SignalKind::interrupt()),
            signal(SignalKind::terminate()),
            signal(SignalKind::quit()),
        ) else {
            tracing::warn!("Failed to install unix signal handlers, falling back to Ctrl+C");
            return ctrl_c().await;
        };

        tokio::select! {
            _ = sigint.recv() => "SIGINT (Ctrl+C)".to_string(),
            _ = sigterm.recv() => "SIGTERM".to_string(),
            _ = sigquit.recv() => "SIGQUIT".to_string(),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c().await
    }
}

async fn ctrl_c() -> String {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        // Never resolve; the gateway branch still ends the process.
        std::future::pending::<()>().await;
    }
    "Ctrl+C".to_string()
}
