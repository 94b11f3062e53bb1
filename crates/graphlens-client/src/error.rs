use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures reported by the backend client. Nothing is retried.
#[derive(Error, Debug)]
pub enum ClientError {
    /// The backend answered with `success: false`. Displays the server's
    /// message verbatim.
    #[error("{message}")]
    Query { message: String },

    /// Network failure, unreadable body or malformed envelope.
    #[error("Transport error: {message}")]
    Transport {
        message: String,
        #[source]
        source: Option<BoxError>,
    },
}

impl ClientError {
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn is_query(&self) -> bool {
        matches!(self, Self::Query { .. })
    }

    /// Text suitable for an alert: the server message for query failures.
    pub fn user_message(&self) -> String {
        match self {
            Self::Query { message } => message.clone(),
            Self::Transport { .. } => self.to_string(),
        }
    }
}
