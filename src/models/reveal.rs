//! Visibility flags for the table view.
//!
//! Each column has a global reveal switch and every card has a blur override.
//! A cell is visible when its column is revealed or its card is not blurred,
//! so a revealed column always wins over a card that is still blurred.
//! Overrides are keyed by card id so reordering cards cannot shift them onto
//! the wrong row.

use super::Deck;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Column {
    English,
    Spanish,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealState {
    pub reveal_english: bool,
    pub reveal_spanish: bool,
    blurred_cells: BTreeMap<String, BTreeMap<u64, bool>>,
}

impl Default for RevealState {
    fn default() -> Self {
        Self {
            reveal_english: true,
            reveal_spanish: false,
            blurred_cells: BTreeMap::new(),
        }
    }
}

impl RevealState {
    /// Fresh state with every card of `deck` blurred.
    pub fn for_deck(deck: &Deck) -> Self {
        let mut state = Self::default();
        state.reconcile(deck);
        state
    }

    pub fn is_column_revealed(&self, column: Column) -> bool {
        match column {
            Column::English => self.reveal_english,
            Column::Spanish => self.reveal_spanish,
        }
    }

    pub fn toggle_column(&mut self, column: Column) {
        let flag = match column {
            Column::English => &mut self.reveal_english,
            Column::Spanish => &mut self.reveal_spanish,
        };
        *flag = !*flag;
    }

    /// Flips the override for the card shown at `index` in `section`.
    /// Returns the new blurred value, or `None` when there is no such row.
    pub fn toggle_cell(&mut self, deck: &Deck, section: &str, index: usize) -> Option<bool> {
        let card_id = deck.section(section)?.card_at(index)?.id;
        let cells = self.blurred_cells.get_mut(section)?;
        let blurred = cells.entry(card_id).or_insert(true);
        *blurred = !*blurred;
        Some(*blurred)
    }

    /// Missing entries count as blurred.
    pub fn is_blurred(&self, section: &str, card_id: u64) -> bool {
        self.blurred_cells
            .get(section)
            .and_then(|cells| cells.get(&card_id))
            .copied()
            .unwrap_or(true)
    }

    pub fn is_visible(&self, column: Column, section: &str, card_id: u64) -> bool {
        self.is_column_revealed(column) || !self.is_blurred(section, card_id)
    }

    /// Number of tracked overrides for a section.
    pub fn tracked_cells(&self, section: &str) -> usize {
        self.blurred_cells.get(section).map_or(0, BTreeMap::len)
    }

    /// Rebuilds overrides to match `deck`: sections whose card set changed are
    /// reset to all blurred, sections no longer in the deck are dropped.
    pub fn reconcile(&mut self, deck: &Deck) {
        self.blurred_cells
            .retain(|name, _| deck.contains_section(name));

        for section in deck.sections() {
            let matches = self.blurred_cells.get(&section.name).is_some_and(|cells| {
                cells.len() == section.len() && section.cards.iter().all(|c| cells.contains_key(&c.id))
            });
            if !matches {
                let fresh = section.cards.iter().map(|c| (c.id, true)).collect();
                self.blurred_cells.insert(section.name.clone(), fresh);
            }
        }
    }
}
