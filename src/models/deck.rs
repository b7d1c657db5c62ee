//! Deck is the whole persisted document: section name -> ordered cards.
//!
//! Serialized as a JSON object whose key order is the section order, so the
//! map (de)serializers are written by hand instead of going through a sorted map.

use super::{Card, Section};
use crate::error::{FlashcardError, ParseError, Result};
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Deck {
    sections: Vec<Section>,
}

impl Deck {
    pub fn new(sections: Vec<Section>) -> std::result::Result<Self, ParseError> {
        let deck = Self { sections };
        deck.validate()?;
        Ok(deck)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }

    pub fn contains_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Total number of cards across all sections
    pub fn card_count(&self) -> usize {
        self.sections.iter().map(Section::len).sum()
    }

    /// Flips `learned` on the card `(section, card_id)` and returns the new value.
    pub fn toggle_learned(&mut self, section: &str, card_id: u64) -> Result<bool> {
        let target = self
            .sections
            .iter_mut()
            .find(|s| s.name == section)
            .ok_or_else(|| FlashcardError::SectionNotFound(section.to_string()))?;

        target
            .card_mut(card_id)
            .map(Card::toggle_learned)
            .ok_or_else(|| FlashcardError::CardNotFound {
                section: section.to_string(),
                card_id,
            })
    }

    /// Checks card id uniqueness within every section.
    /// Section names are already unique by construction of the deserializer.
    pub fn validate(&self) -> std::result::Result<(), ParseError> {
        for section in &self.sections {
            if let Some(id) = section.duplicate_id() {
                return Err(ParseError::DuplicateCardId {
                    section: section.name.clone(),
                    id,
                });
            }
        }
        Ok(())
    }
}

/// Picks the deck to start with: the persisted one when it is present and valid, else the seed.
pub fn reconcile(loaded: Option<Deck>, seed: Deck) -> Deck {
    match loaded {
        Some(deck) => match deck.validate() {
            Ok(()) => deck,
            Err(e) => {
                tracing::warn!("persisted deck rejected, using seed: {e}");
                seed
            }
        },
        None => seed,
    }
}

impl Serialize for Deck {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len()))?;
        for section in &self.sections {
            map.serialize_entry(&section.name, &section.cards)?;
        }
        map.end()
    }
}

struct DeckVisitor;

impl<'de> Visitor<'de> for DeckVisitor {
    type Value = Deck;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping section names to lists of cards")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> std::result::Result<Deck, A::Error> {
        let mut sections: Vec<Section> = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((name, cards)) = access.next_entry::<String, Vec<Card>>()? {
            if sections.iter().any(|s| s.name == name) {
                return Err(de::Error::custom(format!("duplicate section '{name}'")));
            }
            sections.push(Section { name, cards });
        }
        Ok(Deck { sections })
    }
}

impl<'de> Deserialize<'de> for Deck {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_map(DeckVisitor)
    }
}
