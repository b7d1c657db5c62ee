//! Study session: routes user actions to the deck, reveal state, quiz tracker
//! and preferences, and saves every persisted change right away.
//!
//! The session owns no invariants of its own. It tracks which view is shown,
//! which section and card are active and whether the card is flipped.

use super::deck::reconcile;
use super::{Card, Column, Deck, Preferences, QuizTracker, RevealState};
use crate::database::db::{ANSWERS_KEY, DECK_KEY, ORIENTATION_KEY, PROGRESS_KEY};
use crate::database::{DocumentStore, MemoryStore, load_document, save_document};
use crate::error::{FlashcardError, Result};
use crate::export::import_document;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Sections,
    Table,
    Quiz,
}

/// Everything a user can do
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    OpenSection(String),
    CloseSection,
    StartQuiz(String),
    FlipCard,
    AnswerCard { correct: bool },
    NextCard,
    PreviousCard,
    CompleteQuiz,
    ToggleLearned { section: String, card_id: u64 },
    ToggleColumn(Column),
    ToggleCell { section: String, index: usize },
    SwitchView(ViewMode),
    Export,
    Import(String),
    ToggleOrientation,
    ResetDeck,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    /// Action had nothing to act on
    Ignored,
    /// Snapshot of the deck to write out
    Exported(Deck),
    Imported { sections: usize, cards: usize },
}

pub struct StudySession {
    deck: Deck,
    seed: Deck,
    reveal: RevealState,
    quiz: QuizTracker,
    preferences: Preferences,
    view: ViewMode,
    active_section: Option<String>,
    card_index: usize,
    flipped: bool,
    store: Box<dyn DocumentStore>,
}

impl StudySession {
    /// Restores the session from `store`, falling back to `seed` and defaults for anything missing.
    pub fn load(store: Box<dyn DocumentStore>, seed: Deck) -> Self {
        let deck = reconcile(load_document(store.as_ref(), DECK_KEY), seed.clone());
        let preferences: Preferences = load_document(store.as_ref(), ORIENTATION_KEY).unwrap_or_default();
        let mut quiz = QuizTracker::from_records(
            load_document(store.as_ref(), PROGRESS_KEY).unwrap_or_default(),
            load_document(store.as_ref(), ANSWERS_KEY).unwrap_or_default(),
        );
        quiz.reconcile(&deck, &deck);

        tracing::info!(
            "loaded {} sections ({} cards), {} quiz records",
            deck.len(),
            deck.card_count(),
            quiz.records().len()
        );

        let mut session = Self {
            reveal: RevealState::for_deck(&deck),
            deck,
            seed,
            quiz,
            preferences,
            view: ViewMode::Sections,
            active_section: None,
            card_index: 0,
            flipped: false,
            store,
        };
        session.persist_deck();
        session
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn reveal(&self) -> &RevealState {
        &self.reveal
    }

    pub fn quiz(&self) -> &QuizTracker {
        &self.quiz
    }

    pub fn preferences(&self) -> Preferences {
        self.preferences
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    pub fn active_section(&self) -> Option<&str> {
        self.active_section.as_deref()
    }

    pub fn card_index(&self) -> usize {
        self.card_index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// False once the session runs without durable storage
    pub fn is_durable(&self) -> bool {
        self.store.is_durable()
    }

    pub fn current_card(&self) -> Option<&Card> {
        let section = self.deck.section(self.active_section.as_deref()?)?;
        section.card_at(self.card_index)
    }

    /// Text on the visible side of the current card
    pub fn current_face(&self) -> Option<&str> {
        let card = self.current_card()?;
        Some(if self.flipped {
            self.preferences.back(card)
        } else {
            self.preferences.front(card)
        })
    }

    /// Applies one user action. Actions referencing missing sections or cards are no-ops.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome> {
        tracing::debug!(?action, "dispatch");
        match self.apply(action) {
            Err(e @ (FlashcardError::SectionNotFound(_) | FlashcardError::CardNotFound { .. })) => {
                tracing::debug!("ignored: {e}");
                Ok(Outcome::Ignored)
            }
            other => other,
        }
    }

    fn apply(&mut self, action: Action) -> Result<Outcome> {
        match action {
            Action::OpenSection(name) => {
                self.ensure_section(&name)?;
                self.enter_section(name);
                Ok(Outcome::Updated)
            }
            Action::CloseSection => {
                self.leave_section();
                Ok(Outcome::Updated)
            }
            Action::StartQuiz(name) => {
                self.quiz.start(&self.deck, &name)?;
                self.persist_progress();
                tracing::info!(section = %name, "quiz started");
                self.enter_section(name);
                Ok(Outcome::Updated)
            }
            Action::FlipCard => {
                if self.current_card().is_none() {
                    return Ok(Outcome::Ignored);
                }
                self.flipped = !self.flipped;
                Ok(Outcome::Updated)
            }
            Action::AnswerCard { correct } => self.answer(correct),
            Action::NextCard => Ok(self.move_to(self.card_index.checked_add(1))),
            Action::PreviousCard => Ok(self.move_to(self.card_index.checked_sub(1))),
            Action::CompleteQuiz => {
                let Some(section) = self.active_section.as_deref() else {
                    return Ok(Outcome::Ignored);
                };
                if !self.quiz.complete(section) {
                    return Ok(Outcome::Ignored);
                }
                self.persist_progress();
                Ok(Outcome::Updated)
            }
            Action::ToggleLearned { section, card_id } => {
                let learned = self.deck.toggle_learned(&section, card_id)?;
                tracing::debug!(section = %section, card_id, learned, "learned toggled");
                self.persist_deck();
                Ok(Outcome::Updated)
            }
            Action::ToggleColumn(column) => {
                self.reveal.toggle_column(column);
                Ok(Outcome::Updated)
            }
            Action::ToggleCell { section, index } => {
                self.ensure_section(&section)?;
                match self.reveal.toggle_cell(&self.deck, &section, index) {
                    Some(_) => Ok(Outcome::Updated),
                    None => Ok(Outcome::Ignored),
                }
            }
            Action::SwitchView(mode) => self.switch_view(mode),
            Action::Export => {
                tracing::info!("exporting {} sections", self.deck.len());
                Ok(Outcome::Exported(self.deck.clone()))
            }
            Action::Import(text) => {
                let deck = import_document(&text).inspect_err(|e| {
                    tracing::warn!("import rejected: {e}");
                })?;
                let outcome = Outcome::Imported {
                    sections: deck.len(),
                    cards: deck.card_count(),
                };
                self.replace_deck(deck);
                tracing::info!(?outcome, "deck imported");
                Ok(outcome)
            }
            Action::ToggleOrientation => {
                self.preferences.toggle_orientation();
                self.flipped = false;
                persist(&mut self.store, ORIENTATION_KEY, &self.preferences);
                Ok(Outcome::Updated)
            }
            Action::ResetDeck => {
                self.quiz.clear();
                self.replace_deck(self.seed.clone());
                tracing::info!("deck reset to seed");
                Ok(Outcome::Updated)
            }
        }
    }

    fn answer(&mut self, correct: bool) -> Result<Outcome> {
        let (Some(section), Some(card_id)) = (
            self.active_section.clone(),
            self.current_card().map(|c| c.id),
        ) else {
            return Ok(Outcome::Ignored);
        };

        if !self.quiz.record_answer(&self.deck, &section, card_id, correct)? {
            return Ok(Outcome::Ignored);
        }

        let total = self.deck.section(&section).map_or(0, |s| s.len());
        if self.card_index + 1 >= total {
            self.quiz.complete(&section);
            tracing::info!(section = %section, progress = ?self.quiz.progress(&section), "quiz completed");
        } else {
            self.card_index += 1;
            self.flipped = false;
        }
        self.persist_progress();
        Ok(Outcome::Updated)
    }

    fn move_to(&mut self, index: Option<usize>) -> Outcome {
        let Some(section) = self.active_section.as_deref().and_then(|s| self.deck.section(s)) else {
            return Outcome::Ignored;
        };
        match index {
            Some(i) if i < section.len() => {
                self.card_index = i;
                self.flipped = false;
                Outcome::Updated
            }
            _ => Outcome::Ignored,
        }
    }

    fn switch_view(&mut self, mode: ViewMode) -> Result<Outcome> {
        match mode {
            ViewMode::Quiz if self.active_section.is_none() => Ok(Outcome::Ignored),
            ViewMode::Sections => {
                self.leave_section();
                Ok(Outcome::Updated)
            }
            _ => {
                self.view = mode;
                Ok(Outcome::Updated)
            }
        }
    }

    fn ensure_section(&self, name: &str) -> Result<()> {
        if self.deck.contains_section(name) {
            Ok(())
        } else {
            Err(FlashcardError::SectionNotFound(name.to_string()))
        }
    }

    fn enter_section(&mut self, name: String) {
        self.active_section = Some(name);
        self.view = ViewMode::Quiz;
        self.card_index = 0;
        self.flipped = false;
    }

    fn leave_section(&mut self) {
        self.active_section = None;
        self.view = ViewMode::Sections;
        self.card_index = 0;
        self.flipped = false;
    }

    /// Swaps in a new deck and brings all auxiliary state in line with it.
    fn replace_deck(&mut self, deck: Deck) {
        let previous = std::mem::replace(&mut self.deck, deck);
        self.reveal.reconcile(&self.deck);
        self.quiz.reconcile(&previous, &self.deck);

        let still_valid = self
            .active_section
            .as_deref()
            .and_then(|name| self.deck.section(name))
            .is_some_and(|s| self.card_index < s.len());
        if !still_valid {
            self.leave_section();
        }

        self.persist_deck();
        self.persist_progress();
    }

    fn persist_deck(&mut self) {
        persist(&mut self.store, DECK_KEY, &self.deck);
    }

    fn persist_progress(&mut self) {
        persist(&mut self.store, PROGRESS_KEY, self.quiz.records());
        persist(&mut self.store, ANSWERS_KEY, self.quiz.answered());
    }
}

/// Saves `doc`; on failure keeps going on a volatile store for the rest of the session.
fn persist<T: Serialize + ?Sized>(store: &mut Box<dyn DocumentStore>, key: &str, doc: &T) {
    let Err(e) = save_document(store.as_mut(), key, doc) else {
        return;
    };
    tracing::warn!(key, "storage unavailable, continuing without durability: {e}");
    *store = Box::new(MemoryStore::default());
    if let Err(e) = save_document(store.as_mut(), key, doc) {
        tracing::warn!(key, "could not keep document in memory: {e}");
    }
}
