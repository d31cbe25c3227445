//! Unified error type.

use thiserror::Error;

/// The error type returned by weir's fallible operations.
///
/// Application-level outcomes (404, 405, etc.) are expressed as HTTP
/// [`Response`](crate::Response) values, not as `Error`s. This type covers
/// infrastructure failures (binding, accepting, configuration), wiring
/// mistakes (bad routes, missing services) and errors raised by handlers.
///
/// An `Err` returned from a handler travels up the middleware chain until a
/// link translates it, normally [`middleware::recover`](crate::middleware::recover).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid socket address `{0}`")]
    InvalidAddress(String),

    #[error("invalid route `{path}`: {source}")]
    Route {
        path: String,
        #[source]
        source: matchit::InsertError,
    },

    /// No provider is registered for the capability.
    #[error("no service registered for capability `{0}`")]
    MissingService(&'static str),

    #[error("missing path parameter `{0}`")]
    MissingParam(String),

    #[error("path parameter `{name}` has invalid value `{value}`")]
    InvalidParam { name: String, value: String },

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config: {0}")]
    Config(#[from] config::ConfigError),

    /// An error raised by application code inside a handler or middleware.
    #[error("{0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl Error {
    /// Wraps any application error so it can be returned from a handler.
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>) -> Self {
        Self::Handler(err.into())
    }
}
