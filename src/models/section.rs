//! Section is a named, ordered list of cards
use super::Card;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub cards: Vec<Card>,
}

impl Section {
    pub fn new(name: impl Into<String>, cards: Vec<Card>) -> Self {
        Self {
            name: name.into(),
            cards,
        }
    }

    pub fn card(&self, id: u64) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn card_mut(&mut self, id: u64) -> Option<&mut Card> {
        self.cards.iter_mut().find(|c| c.id == id)
    }

    pub fn card_at(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards flagged as learned, shown as "n/m learned" in the section list.
    pub fn learned_count(&self) -> usize {
        self.cards.iter().filter(|c| c.learned).count()
    }

    /// Same card ids, in any order
    pub fn same_cards(&self, other: &Section) -> bool {
        self.len() == other.len() && self.cards.iter().all(|c| other.card(c.id).is_some())
    }

    /// First id that appears more than once, if any.
    pub fn duplicate_id(&self) -> Option<u64> {
        let mut seen = std::collections::HashSet::with_capacity(self.cards.len());
        self.cards.iter().map(|c| c.id).find(|id| !seen.insert(*id))
    }
}
