use thiserror::Error;

pub type Result<T> = std::result::Result<T, GhstatsError>;

#[derive(Error, Debug)]
pub enum GhstatsError {
    #[error("Query failed to run by returning code of {status}. {query}")]
    Transport { status: u16, query: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Unexpected response shape: {0}")]
    Shape(String),
    #[error("Pagination stopped after {pages} pages with more history remaining")]
    PageLimit { pages: usize },
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Cache error: {0}")]
    Cache(String),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl GhstatsError {
    pub fn shape(msg: impl Into<String>) -> Self {
        GhstatsError::Shape(msg.into())
    }

    /// HTTP status carried by a transport failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            GhstatsError::Transport { status, .. } => Some(*status),
            GhstatsError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, GhstatsError::Transport { .. } | GhstatsError::Http(_))
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, GhstatsError::Shape(_))
    }
}
