use crate::discord::DiscordMessage;
use crate::error::Result;
use crate::logging::Timer;
use crate::trace::TraceId;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::Instrument;

/// Handlers are never given less time than this
pub const MINIMUM_HANDLER_TIMEOUT: Duration = Duration::from_secs(5);

/// Reacts to a "message created" gateway event
#[async_trait]
pub trait MessageCreateHandler: Send + Sync + 'static {
    fn name(&self) -> &'static str;

    async fn on_message_create(&self, trace_id: &TraceId, message: &DiscordMessage)
    -> Result<()>;
}

/// How a single handler run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Completed,
    /// The handler returned an error or panicked
    Failed,
    /// The handler missed its deadline; it keeps running detached
    TimedOut,
}

/// Runs every registered handler for each inbound message under a deadline
pub struct Dispatcher {
    /// Handlers in registration order
    handlers: Vec<Arc<dyn MessageCreateHandler>>,
    /// Deadline per handler run, never below the minimum
    timeout: Duration,
}

impl Dispatcher {
    /// Create a dispatcher with no handlers; `timeout` is raised to
    /// [`MINIMUM_HANDLER_TIMEOUT`] if shorter
    pub fn new(timeout: Duration) -> Self {
        let timeout = timeout.max(MINIMUM_HANDLER_TIMEOUT);
        tracing::debug!(
            timeout_ms = timeout.as_millis() as u64,
            "Creating event dispatcher"
        );

        Self {
            handlers: Vec::new(),
            timeout,
        }
    }

    /// Register a handler to run for every message
    pub fn with_handler(mut self, handler: Arc<dyn MessageCreateHandler>) -> Self {
        tracing::debug!(handler = handler.name(), "Registering message create handler");
        self.handlers.push(handler);
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// Run all handlers concurrently and wait for each to finish or time out
    pub async fn dispatch(&self, message: DiscordMessage) -> Vec<DispatchOutcome> {
        let message = Arc::new(message);
        let runs = self
            .handlers
            .iter()
            .map(|handler| self.run_handler(handler.clone(), message.clone()));

        futures::future::join_all(runs).await
    }

    async fn run_handler(
        &self,
        handler: Arc<dyn MessageCreateHandler>,
        message: Arc<DiscordMessage>,
    ) -> DispatchOutcome {
        let trace_id = TraceId::generate();
        let span = tracing::info_span!(
            "message_create",
            handler = handler.name(),
            trace_id = %trace_id,
            guild_id = message.guild_id.as_ref().map(|g| g.as_str()).unwrap_or("none"),
            channel_id = %message.channel_id,
            message_id = %message.id,
        );

        async move {
            let _timer = Timer::new("message_create");
            tracing::debug!(author_id = %message.author.id, "MessageCreate event received");

            // Dropping the JoinHandle on timeout detaches the task rather than
            // aborting it, so in-flight API calls may still complete.
            let task_trace_id = trace_id.clone();
            let mut task = tokio::spawn(
                async move { handler.on_message_create(&task_trace_id, &message).await }
                    .in_current_span(),
            );

            match tokio::time::timeout(self.timeout, &mut task).await {
                Ok(Ok(Ok(()))) => DispatchOutcome::Completed,
                Ok(Ok(Err(e))) => {
                    tracing::error!(error = %e, "error occurred in handler");
                    DispatchOutcome::Failed
                }
                Ok(Err(e)) => {
                    tracing::error!(error = %e, "handler task failed");
                    DispatchOutcome::Failed
                }
                Err(_) => {
                    tracing::warn!(
                        timeout_ms = self.timeout.as_millis() as u64,
                        "handler timed out"
                    );
                    DispatchOutcome::TimedOut
                }
            }
        }
        .instrument(span)
        .await
    }
}
