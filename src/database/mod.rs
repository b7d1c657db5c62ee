pub mod db;

pub use db::{DocumentStore, MemoryStore, SqliteStore, load_document, save_document};
