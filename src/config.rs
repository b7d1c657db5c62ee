//! Runtime configuration, read from the environment with sensible defaults.

use crate::error::FlashcardError;
use crate::export::import_json;
use crate::models::Deck;
use std::path::PathBuf;

/// Overrides the directory holding the database
pub const DATA_DIR_ENV: &str = "FLASHCARDS_DATA_DIR";
/// Path of a JSON deck used instead of the bundled seed
pub const SEED_ENV: &str = "FLASHCARDS_SEED";

const APP_DIR: &str = "vocab-flashcards";
const DB_FILE: &str = "flashcards.sqlite3";
const BUNDLED_SEED: &str = include_str!("../assets/seed.json");

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub seed_path: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = var(DATA_DIR_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                dirs::data_local_dir()
                    .unwrap_or_else(|| PathBuf::from("."))
                    .join(APP_DIR)
            });
        let seed_path = var(SEED_ENV).filter(|v| !v.is_empty()).map(PathBuf::from);

        Self {
            data_dir,
            seed_path,
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    /// Deck used when nothing valid is stored yet.
    pub fn load_seed(&self) -> Result<Deck, FlashcardError> {
        match &self.seed_path {
            Some(path) => import_json(path),
            None => Ok(bundled_seed()?),
        }
    }
}

pub fn bundled_seed() -> Result<Deck, crate::error::ParseError> {
    crate::export::import_document(BUNDLED_SEED)
}
