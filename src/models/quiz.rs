//! Per-section quiz lifecycle and score bookkeeping.
//!
//! NotStarted --start--> Started --complete--> Completed
//! Started --start--> Started (score reset), Completed --start--> Started

use super::Deck;
use crate::error::{FlashcardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Persisted progress record of one section
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizProgress {
    pub started: bool,
    pub completed: bool,
    pub score: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizStatus {
    NotStarted,
    Started,
    Completed,
}

impl QuizProgress {
    pub fn status(&self) -> QuizStatus {
        match (self.started, self.completed) {
            (_, true) => QuizStatus::Completed,
            (true, false) => QuizStatus::Started,
            (false, false) => QuizStatus::NotStarted,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == QuizStatus::Started
    }

    /// Score as a share of `total` cards, in percent.
    pub fn percentage(&self, total: usize) -> f64 {
        if total == 0 {
            return 0.0;
        }
        (f64::from(self.score) / total as f64 * 100.0).clamp(0.0, 100.0)
    }
}

/// Card ids already answered in each running quiz
pub type AnswerLog = BTreeMap<String, BTreeSet<u64>>;

/// Progress records of all sections plus the cards answered in each running quiz.
/// Both are persisted so a quiz resumed after a restart cannot score a card twice.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QuizTracker {
    records: BTreeMap<String, QuizProgress>,
    answered: AnswerLog,
}

impl QuizTracker {
    pub fn from_records(records: BTreeMap<String, QuizProgress>, answered: AnswerLog) -> Self {
        Self { records, answered }
    }

    pub fn records(&self) -> &BTreeMap<String, QuizProgress> {
        &self.records
    }

    pub fn answered(&self) -> &AnswerLog {
        &self.answered
    }

    pub fn progress(&self, section: &str) -> Option<&QuizProgress> {
        self.records.get(section)
    }

    pub fn status(&self, section: &str) -> QuizStatus {
        self.progress(section)
            .map_or(QuizStatus::NotStarted, QuizProgress::status)
    }

    /// Starts or restarts the quiz of `section`; a restart clears the previous score.
    pub fn start(&mut self, deck: &Deck, section: &str) -> Result<QuizProgress> {
        if !deck.contains_section(section) {
            return Err(FlashcardError::SectionNotFound(section.to_string()));
        }

        let record = self.records.entry(section.to_string()).or_default();
        *record = QuizProgress {
            started: true,
            completed: false,
            score: 0,
        };
        self.answered.remove(section);
        Ok(*record)
    }

    /// Scores one answer of the running quiz. Each card counts at most once per run.
    ///
    /// Returns `Ok(true)` when the answer was accepted. Answers outside a running
    /// quiz, and repeated answers for the same card, are ignored.
    pub fn record_answer(
        &mut self,
        deck: &Deck,
        section: &str,
        card_id: u64,
        correct: bool,
    ) -> Result<bool> {
        let cards = deck
            .section(section)
            .ok_or_else(|| FlashcardError::SectionNotFound(section.to_string()))?;
        if cards.card(card_id).is_none() {
            return Err(FlashcardError::CardNotFound {
                section: section.to_string(),
                card_id,
            });
        }

        let Some(record) = self.records.get_mut(section).filter(|r| r.is_active()) else {
            tracing::debug!(section, card_id, "answer ignored, quiz not running");
            return Ok(false);
        };
        if !self
            .answered
            .entry(section.to_string())
            .or_default()
            .insert(card_id)
        {
            tracing::debug!(section, card_id, "card already answered in this run");
            return Ok(false);
        }

        let total = u32::try_from(cards.len()).unwrap_or(u32::MAX);
        if correct && record.score < total {
            record.score += 1;
        }
        Ok(true)
    }

    /// Freezes the score of a running quiz. Returns false when it was not running.
    pub fn complete(&mut self, section: &str) -> bool {
        match self.records.get_mut(section) {
            Some(record) if record.is_active() => {
                record.completed = true;
                self.answered.remove(section);
                true
            }
            _ => false,
        }
    }

    /// Whether `card_id` already counted in the running quiz of `section`
    pub fn is_answered(&self, section: &str, card_id: u64) -> bool {
        self.answered
            .get(section)
            .is_some_and(|ids| ids.contains(&card_id))
    }

    /// Brings progress in line with `deck`, which replaced `previous`.
    ///
    /// Records of sections missing from `deck` are dropped and scores are capped
    /// at the new card counts. The answer log of a section survives only while
    /// its quiz is running and its card set is unchanged.
    pub fn reconcile(&mut self, previous: &Deck, deck: &Deck) {
        self.records.retain(|name, _| deck.contains_section(name));

        let records = &self.records;
        self.answered.retain(|name, ids| {
            let running = records.get(name).is_some_and(QuizProgress::is_active);
            let unchanged = match (previous.section(name), deck.section(name)) {
                (Some(old), Some(new)) => old.same_cards(new),
                _ => false,
            };
            let known = deck
                .section(name)
                .is_some_and(|s| ids.iter().all(|id| s.card(*id).is_some()));
            running && unchanged && known
        });

        for (name, record) in &mut self.records {
            let total = deck
                .section(name)
                .map_or(0, |s| u32::try_from(s.len()).unwrap_or(u32::MAX));
            record.score = record.score.min(total);
        }
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.answered.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, Section};
    use pretty_assertions::assert_eq;

    fn greetings() -> Deck {
        Deck::new(vec![Section::new(
            "Greetings",
            vec![Card::new(1, "hello", "hola")],
        )])
        .unwrap()
    }

    fn numbers() -> Deck {
        Deck::new(vec![Section::new(
            "Numbers",
            vec![
                Card::new(1, "one", "uno"),
                Card::new(2, "two", "dos"),
                Card::new(3, "three", "tres"),
            ],
        )])
        .unwrap()
    }

    #[test]
    fn test_greetings_scenario() {
        let deck = greetings();
        let mut tracker = QuizTracker::default();

        tracker.start(&deck, "Greetings").unwrap();
        assert!(tracker.record_answer(&deck, "Greetings", 1, true).unwrap());
        assert!(tracker.complete("Greetings"));

        let progress = *tracker.progress("Greetings").unwrap();
        assert_eq!(
            progress,
            QuizProgress {
                started: true,
                completed: true,
                score: 1
            }
        );
        assert_eq!(progress.percentage(1), 100.0);
    }

    #[test]
    fn test_status_transitions() {
        let deck = numbers();
        let mut tracker = QuizTracker::default();
        assert_eq!(tracker.status("Numbers"), QuizStatus::NotStarted);

        tracker.start(&deck, "Numbers").unwrap();
        assert_eq!(tracker.status("Numbers"), QuizStatus::Started);

        tracker.complete("Numbers");
        assert_eq!(tracker.status("Numbers"), QuizStatus::Completed);

        tracker.start(&deck, "Numbers").unwrap();
        assert_eq!(tracker.status("Numbers"), QuizStatus::Started);
    }

    #[test]
    fn test_restart_resets_score() {
        let deck = numbers();
        let mut tracker = QuizTracker::default();
        tracker.start(&deck, "Numbers").unwrap();
        tracker.record_answer(&deck, "Numbers", 1, true).unwrap();
        tracker.record_answer(&deck, "Numbers", 2, true).unwrap();

        let restarted = tracker.start(&deck, "Numbers").unwrap();
        assert_eq!(restarted.score, 0);
        assert!(!restarted.completed);
        assert!(!tracker.is_answered("Numbers", 1));
    }

    #[test]
    fn test_answer_after_completion_is_ignored() {
        let deck = numbers();
        let mut tracker = QuizTracker::default();
        tracker.start(&deck, "Numbers").unwrap();
        tracker.record_answer(&deck, "Numbers", 1, true).unwrap();
        tracker.complete("Numbers");

        assert!(!tracker.record_answer(&deck, "Numbers", 2, true).unwrap());
        assert_eq!(tracker.progress("Numbers").unwrap().score, 1);
    }

    #[test]
    fn test_answer_before_start_is_ignored() {
        let deck = numbers();
        let mut tracker = QuizTracker::default();

        assert!(!tracker.record_answer(&deck, "Numbers", 1, true).unwrap());
        assert!(tracker.progress("Numbers").is_none());
    }

    #[test]
    fn test_score_never_exceeds_card_count() {
        let deck = numbers();
        let mut tracker = QuizTracker::default();
        tracker.start(&deck, "Numbers").unwrap();

        for _ in 0..5 {
            for id in 1..=3 {
                tracker.record_answer(&deck, "Numbers", id, true).unwrap();
            }
        }
        assert_eq!(tracker.progress("Numbers").unwrap().score, 3);
    }

    #[test]
    fn test_incorrect_answers_do_not_score() {
        let deck = numbers();
        let mut tracker = QuizTracker::default();
        tracker.start(&deck, "Numbers").unwrap();
        tracker.record_answer(&deck, "Numbers", 1, false).unwrap();
        tracker.record_answer(&deck, "Numbers", 2, true).unwrap();
        tracker.complete("Numbers");

        let progress = tracker.progress("Numbers").unwrap();
        assert_eq!(progress.score, 1);
        assert!((progress.percentage(3) - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_section_or_card() {
        let deck = numbers();
        let mut tracker = QuizTracker::default();

        assert!(matches!(
            tracker.start(&deck, "Colors"),
            Err(FlashcardError::SectionNotFound(_))
        ));
        tracker.start(&deck, "Numbers").unwrap();
        assert!(matches!(
            tracker.record_answer(&deck, "Numbers", 9, true),
            Err(FlashcardError::CardNotFound { card_id: 9, .. })
        ));
        assert_eq!(tracker.progress("Numbers").unwrap().score, 0);
    }

    #[test]
    fn test_complete_requires_running_quiz() {
        let deck = numbers();
        let mut tracker = QuizTracker::default();
        assert!(!tracker.complete("Numbers"));

        tracker.start(&deck, "Numbers").unwrap();
        assert!(tracker.complete("Numbers"));
        assert!(!tracker.complete("Numbers"));
    }

    #[test]
    fn test_reconcile_prunes_and_clamps() {
        let mut tracker = QuizTracker::from_records(BTreeMap::from([
            (
                "Numbers".to_string(),
                QuizProgress {
                    started: true,
                    completed: true,
                    score: 3,
                },
            ),
            ("Gone".to_string(), QuizProgress::default()),
        ]), AnswerLog::new());
        let smaller = Deck::new(vec![Section::new(
            "Numbers",
            vec![Card::new(1, "one", "uno")],
        )])
        .unwrap();

        tracker.reconcile(&numbers(), &smaller);

        assert_eq!(tracker.records().len(), 1);
        assert_eq!(tracker.progress("Numbers").unwrap().score, 1);
    }

    #[test]
    fn test_answer_log_survives_unchanged_deck() {
        let deck = numbers();
        let mut tracker = QuizTracker::default();
        tracker.start(&deck, "Numbers").unwrap();
        tracker.record_answer(&deck, "Numbers", 1, true).unwrap();

        let mut restored =
            QuizTracker::from_records(tracker.records().clone(), tracker.answered().clone());
        restored.reconcile(&deck, &deck);

        assert!(!restored.record_answer(&deck, "Numbers", 1, true).unwrap());
        assert!(restored.record_answer(&deck, "Numbers", 2, false).unwrap());
        assert_eq!(restored.progress("Numbers").unwrap().score, 1);
    }

    #[test]
    fn test_changed_card_set_clears_answer_log() {
        let deck = numbers();
        let mut tracker = QuizTracker::default();
        tracker.start(&deck, "Numbers").unwrap();
        tracker.record_answer(&deck, "Numbers", 1, false).unwrap();

        let replaced = Deck::new(vec![Section::new(
            "Numbers",
            vec![Card::new(1, "ten", "diez"), Card::new(4, "four", "cuatro")],
        )])
        .unwrap();
        tracker.reconcile(&deck, &replaced);

        assert!(!tracker.is_answered("Numbers", 1));
        assert!(tracker.record_answer(&replaced, "Numbers", 1, true).unwrap());
        assert_eq!(tracker.progress("Numbers").unwrap().score, 1);
    }

    #[test]
    fn test_answer_log_is_dropped_for_finished_quizzes() {
        let deck = numbers();
        let mut tracker = QuizTracker::from_records(
            BTreeMap::from([(
                "Numbers".to_string(),
                QuizProgress {
                    started: true,
                    completed: true,
                    score: 1,
                },
            )]),
            AnswerLog::from([("Numbers".to_string(), BTreeSet::from([1, 2]))]),
        );
        tracker.reconcile(&deck, &deck);

        assert!(tracker.answered().is_empty());
    }

    #[test]
    fn test_percentage_of_empty_section() {
        assert_eq!(QuizProgress::default().percentage(0), 0.0);
    }

    #[test]
    fn test_record_json_shape() {
        let json = serde_json::to_string(&QuizProgress {
            started: true,
            completed: false,
            score: 2,
        })
        .unwrap();
        assert_eq!(json, r#"{"started":true,"completed":false,"score":2}"#);
    }
}
