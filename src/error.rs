use crate::discord::MessageContext;
use crate::trace::TraceId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FelmError {
    #[error("Discord API error: {0}")]
    DiscordApi(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// An upstream failure annotated with the event that triggered it.
    #[error("error occurred while {operation} (trace_id = {trace_id}, {context}): {source}")]
    Citation {
        operation: &'static str,
        context: MessageContext,
        trace_id: TraceId,
        #[source]
        source: Box<FelmError>,
    },
}

impl FelmError {
    /// Wrap an error with the operation and event it belongs to.
    pub fn citation(
        operation: &'static str,
        context: MessageContext,
        trace_id: TraceId,
        source: FelmError,
    ) -> Self {
        FelmError::Citation {
            operation,
            context,
            trace_id,
            source: Box::new(source),
        }
    }

    /// Trace ID attached to this error, if any.
    pub fn trace_id(&self) -> Option<&TraceId> {
        match self {
            FelmError::Citation { trace_id, .. } => Some(trace_id),
            _ => None,
        }
    }
}

impl From<serenity::Error> for FelmError {
    fn from(err: serenity::Error) -> Self {
        FelmError::DiscordApi(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FelmError>;
