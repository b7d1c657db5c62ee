mod app;
use vocab_flashcards::*;

use app::FlashcardApp;
use config::Config;
use database::{DocumentStore, MemoryStore, SqliteStore};

fn main() -> eframe::Result<()> {
    logging::init();

    let config = Config::from_env();
    let store: Box<dyn DocumentStore> = match SqliteStore::open(&config.db_path()) {
        Ok(store) => {
            tracing::info!("using database {}", config.db_path().display());
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!("storage unavailable, progress will not be saved: {e}");
            Box::new(MemoryStore::default())
        }
    };

    let seed = config.load_seed().unwrap_or_else(|e| {
        tracing::warn!("could not load seed deck, using the bundled one: {e}");
        config::bundled_seed().unwrap_or_default()
    });

    let session = StudySession::load(store, seed);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([520.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Flashcards",
        options,
        Box::new(|_cc| Ok(Box::new(FlashcardApp::new(session)))),
    )
}
