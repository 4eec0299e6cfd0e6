// Custom error type for language switching operations
#[derive(Debug, thiserror::Error)]
pub enum LangError {
    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Language cycle needs at least two entries, got {0}")]
    CycleTooShort(usize),

    #[error("Catalog parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
