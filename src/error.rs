use thiserror::Error;

pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to decode document: {0}")]
    DocumentDecode(String),

    #[error("extraction failed: {0}")]
    Extraction(String),
}

impl From<lopdf::Error> for ExtractError {
    fn from(error: lopdf::Error) -> Self {
        Self::DocumentDecode(error.to_string())
    }
}

impl From<regex::Error> for ExtractError {
    fn from(error: regex::Error) -> Self {
        Self::Extraction(format!("invalid pattern: {error}"))
    }
}
