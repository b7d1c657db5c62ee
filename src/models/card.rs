//! Card is one vocabulary pair <english, spanish> plus a learned flag
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: u64,
    pub english: String,
    pub spanish: String,
    #[serde(default)]
    pub learned: bool,
}

impl Card {
    pub fn new(id: u64, english: impl Into<String>, spanish: impl Into<String>) -> Self {
        Self {
            id,
            english: english.into(),
            spanish: spanish.into(),
            learned: false,
        }
    }

    pub fn toggle_learned(&mut self) -> bool {
        self.learned = !self.learned;
        self.learned
    }
}
