use thiserror::Error;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Profile parse error: {0}")]
    Profile(#[from] toml::de::Error),

    #[error("Fetching {url} failed: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Invalid value for {field} ({value:?}): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing configuration field: {field}")]
    MissingConfig { field: String },
}

pub type Result<T> = std::result::Result<T, SearchError>;
