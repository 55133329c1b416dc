use crate::discord::{DiscordMessage, Dispatcher};
use crate::error::{FelmError, Result};
use async_trait::async_trait;
use serenity::all::ShardManager;
use serenity::client::{Client, Context, EventHandler};
use serenity::model::channel::Message;
use serenity::model::gateway::{GatewayIntents, Ready};
use std::sync::Arc;

/// Gateway connection that feeds message events into a [`Dispatcher`]
pub struct Gateway {
    client: Client,
}

struct GatewayHandler {
    dispatcher: Arc<Dispatcher>,
}

#[async_trait]
impl EventHandler for GatewayHandler {
    async fn message(&self, _ctx: Context, msg: Message) {
        self.dispatcher.dispatch(DiscordMessage::from(&msg)).await;
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(
            user = %ready.user.name,
            guilds = ready.guilds.len(),
            "Connected to Discord gateway"
        );
    }
}

impl Gateway {
    pub fn intents() -> GatewayIntents {
        GatewayIntents::GUILD_MESSAGES | GatewayIntents::MESSAGE_CONTENT
    }

    pub async fn connect(token: &str, dispatcher: Arc<Dispatcher>) -> Result<Self> {
        tracing::debug!("Building Discord gateway client");
        let client = Client::builder(token, Self::intents())
            .event_handler(GatewayHandler { dispatcher })
            .await
            .map_err(|e| FelmError::DiscordApi(format!("failed to build client: {}", e)))?;

        Ok(Self { client })
    }

    pub fn shard_manager(&self) -> Arc<ShardManager> {
        self.client.shard_manager.clone()
    }

    /// Run until the shards are shut down or the connection fails
    pub async fn run(mut self) -> Result<()> {
        tracing::info!("Connecting to Discord gateway");
        self.client.start().await.map_err(|e| {
            FelmError::DiscordApi(format!(
                "error was occurred when trying to connect to discord: {}",
                e
            ))
        })
    }
}
