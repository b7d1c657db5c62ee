pub mod config;
pub mod database;
pub mod error;
pub mod export;
pub mod logging;
pub mod models;

pub use error::{FlashcardError, ParseError, StoreError};
pub use models::{
    Action, Card, Column, Deck, Outcome, Preferences, QuizProgress, QuizStatus, QuizTracker,
    RevealState, Section, StudySession, ViewMode,
};
