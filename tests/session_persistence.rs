use pretty_assertions::assert_eq;
use std::path::PathBuf;
use vocab_flashcards::database::SqliteStore;
use vocab_flashcards::export::{export_document, import_document};
use vocab_flashcards::{Action, Card, Deck, Outcome, QuizProgress, QuizStatus, Section, StudySession};

struct TempDb(PathBuf);

impl TempDb {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!("flashcards_{name}_{}.sqlite3", std::process::id()));
        let _ = std::fs::remove_file(&path);
        Self(path)
    }

    fn session(&self, seed: Deck) -> StudySession {
        StudySession::load(Box::new(SqliteStore::open(&self.0).unwrap()), seed)
    }
}

impl Drop for TempDb {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.0);
    }
}

fn seed() -> Deck {
    Deck::new(vec![
        Section::new("Greetings", vec![Card::new(1, "hello", "hola")]),
        Section::new(
            "Animals",
            vec![Card::new(1, "dog", "perro"), Card::new(2, "cat", "gato")],
        ),
    ])
    .unwrap()
}

#[test]
fn test_state_survives_restart() {
    let db = TempDb::new("restart");

    {
        let mut session = db.session(seed());
        session
            .dispatch(Action::ToggleLearned {
                section: "Animals".into(),
                card_id: 2,
            })
            .unwrap();
        session.dispatch(Action::ToggleOrientation).unwrap();
        session.dispatch(Action::StartQuiz("Greetings".into())).unwrap();
        session.dispatch(Action::AnswerCard { correct: true }).unwrap();
    }

    let session = db.session(seed());
    assert!(session.deck().section("Animals").unwrap().card(2).unwrap().learned);
    assert!(session.preferences().start_with_spanish);
    assert_eq!(
        session.quiz().progress("Greetings"),
        Some(&QuizProgress {
            started: true,
            completed: true,
            score: 1
        })
    );
}

#[test]
fn test_resumed_quiz_scores_each_card_once() {
    let db = TempDb::new("running");

    {
        let mut session = db.session(seed());
        session.dispatch(Action::StartQuiz("Animals".into())).unwrap();
        session.dispatch(Action::AnswerCard { correct: true }).unwrap();
    }

    let mut session = db.session(seed());
    assert_eq!(session.quiz().status("Animals"), QuizStatus::Started);
    assert!(session.quiz().is_answered("Animals", 1));

    session.dispatch(Action::OpenSection("Animals".into())).unwrap();
    assert_eq!(
        session.dispatch(Action::AnswerCard { correct: true }).unwrap(),
        Outcome::Ignored
    );
    session.dispatch(Action::NextCard).unwrap();
    session.dispatch(Action::AnswerCard { correct: false }).unwrap();

    let progress = *session.quiz().progress("Animals").unwrap();
    assert_eq!(
        progress,
        QuizProgress {
            started: true,
            completed: true,
            score: 1
        }
    );
    assert_eq!(progress.percentage(2), 50.0);
}

#[test]
fn test_import_replaces_persisted_deck() {
    let db = TempDb::new("import");
    let imported = r#"{"Weather":[{"id":10,"english":"rain","spanish":"lluvia","learned":false}]}"#;

    {
        let mut session = db.session(seed());
        session.dispatch(Action::StartQuiz("Greetings".into())).unwrap();
        let outcome = session.dispatch(Action::Import(imported.into())).unwrap();
        assert_eq!(outcome, Outcome::Imported { sections: 1, cards: 1 });
    }

    let session = db.session(seed());
    assert_eq!(session.deck(), &import_document(imported).unwrap());
    assert!(session.quiz().records().is_empty());
}

#[test]
fn test_rejected_import_keeps_persisted_deck() {
    let db = TempDb::new("rejected");

    {
        let mut session = db.session(seed());
        assert!(session.dispatch(Action::Import("{not json".into())).is_err());
        assert!(session.dispatch(Action::Import("[]".into())).is_err());
    }

    let session = db.session(Deck::default());
    assert_eq!(export_document(session.deck()).unwrap(), export_document(&seed()).unwrap());
}
