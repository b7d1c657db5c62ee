//! Error types shared by the deck model, the quiz tracker and the document store.

use thiserror::Error;

/// Rejected deck document. The current deck is never touched when this is returned.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate card id {id} in section '{section}'")]
    DuplicateCardId { section: String, id: u64 },
}

/// Persistence layer could not read or write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not encode document: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum FlashcardError {
    #[error("invalid file format: {0}")]
    Parse(#[from] ParseError),

    #[error("section not found: {0}")]
    SectionNotFound(String),

    #[error("card {card_id} not found in section '{section}'")]
    CardNotFound { section: String, card_id: u64 },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, FlashcardError>;
