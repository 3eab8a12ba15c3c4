use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;
pub type ConfigError = Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Post has no title: {0}")]
    InvalidTitle(String),

    #[error("Cannot encode URI: {0}")]
    UriEncoding(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Feed parsing error: {0}")]
    FeedParse(String),

    #[error("Content extraction error: {0}")]
    ContentExtraction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

impl Error {
    pub fn is_temporary(&self) -> bool {
        matches!(self, Error::Transport(_) | Error::Timeout(_) | Error::Io(_))
    }

    /// Errors that abort a single article but never the whole batch.
    pub fn is_article_local(&self) -> bool {
        matches!(
            self,
            Error::InvalidTitle(_)
                | Error::Transport(_)
                | Error::Timeout(_)
                | Error::InvalidUrl(_)
                | Error::ContentExtraction(_)
        )
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Error::InvalidTitle(_) => "INVALID_TITLE",
            Error::UriEncoding(_) => "URI_ENCODING",
            Error::Transport(_) => "TRANSPORT",
            Error::Timeout(_) => "TIMEOUT",
            Error::InvalidUrl(_) => "INVALID_URL",
            Error::FeedParse(_) => "FEED_PARSE",
            Error::ContentExtraction(_) => "CONTENT_EXTRACTION",
            Error::Io(_) => "IO_ERROR",
            Error::Serialization(_) => "SERIALIZATION",
            Error::Yaml(_) => "YAML",
            Error::Config(_) => "CONFIG",
            Error::NotFound(_) => "NOT_FOUND",
            Error::Invalid(_) => "INVALID",
        }
    }
}
