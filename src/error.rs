use thiserror::Error;

pub type Result<T> = std::result::Result<T, GridError>;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Fetch error: {0}")]
    Fetch(#[from] Box<reqwest::Error>),
    #[error("API request failed ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Invalid range: {0}")]
    InvalidRange(String),
    #[error("Malformed timestamp: {0}")]
    MalformedTimestamp(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

// Manual From implementation for unboxed to boxed conversion
impl From<reqwest::Error> for GridError {
    fn from(err: reqwest::Error) -> Self {
        GridError::Fetch(Box::new(err))
    }
}
