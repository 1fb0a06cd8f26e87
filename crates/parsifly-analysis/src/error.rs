use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OracleError {
    #[error("OpenAI API key not configured")]
    NotConfigured,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("status {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no content in completion response")]
    EmptyResponse,

    #[error("request timed out after {after:?}")]
    Timeout { after: Duration },
}
