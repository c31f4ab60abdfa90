use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP {status} from {url}")]
    UnexpectedStatus { url: String, status: u16 },

    #[error("missing element: {0}")]
    MissingElement(String),

    #[error("invalid selector {0}")]
    Selector(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("PDF extraction error: {0}")]
    PdfExtraction(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
