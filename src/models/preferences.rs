//! User preferences. Persisted as a bare JSON boolean.
use super::Card;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences {
    /// Show the Spanish side first in quizzes
    pub start_with_spanish: bool,
}

impl Preferences {
    pub fn toggle_orientation(&mut self) -> bool {
        self.start_with_spanish = !self.start_with_spanish;
        self.start_with_spanish
    }

    pub fn front<'a>(&self, card: &'a Card) -> &'a str {
        if self.start_with_spanish {
            &card.spanish
        } else {
            &card.english
        }
    }

    pub fn back<'a>(&self, card: &'a Card) -> &'a str {
        if self.start_with_spanish {
            &card.english
        } else {
            &card.spanish
        }
    }
}
