pub mod card;
pub mod deck;
pub mod preferences;
pub mod quiz;
pub mod reveal;
pub mod section;
pub mod session;

pub use card::Card;
pub use deck::Deck;
pub use preferences::Preferences;
pub use quiz::{AnswerLog, QuizProgress, QuizStatus, QuizTracker};
pub use reveal::{Column, RevealState};
pub use section::Section;
pub use session::{Action, Outcome, StudySession, ViewMode};
