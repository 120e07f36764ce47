use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Collection address parsing errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AddressError {
    #[error("empty collection address")]
    Empty,

    #[error("malformed contract address: {0}")]
    MalformedContract(String),

    #[error("unrecognized Magic Eden URL: {0}")]
    UnrecognizedUrl(String),
}

/// Root cause of a failed stats fetch.
#[derive(Error, Debug)]
pub enum FetchCause {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected status: {0}")]
    Status(reqwest::StatusCode),
}

/// A stats fetch that failed after exhausting its retry budget.
///
/// Carries the attempt count so cycle reports can distinguish a single
/// hard failure from a slow upstream that burned every retry.
#[derive(Error, Debug)]
#[error("fetch failed after {attempts} attempt(s): {cause}")]
pub struct FetchError {
    pub attempts: u32,
    #[source]
    pub cause: FetchCause,
}

/// Notification delivery failure.
///
/// Delivery failures never reverse dedup admission; they are surfaced in
/// the cycle report and otherwise dropped so a flaky sink cannot trigger
/// a notification storm for the same sale.
#[derive(Error, Debug)]
#[error("delivery via {sink} failed: {reason}")]
pub struct SinkError {
    pub sink: &'static str,
    pub reason: String,
}

impl SinkError {
    pub fn new(sink: &'static str, reason: impl Into<String>) -> Self {
        Self {
            sink,
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
