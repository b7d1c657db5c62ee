//! JSON import/export of the whole deck document.
//! Export is deterministic: section and card order are kept as they are in the deck.

use crate::error::{FlashcardError, ParseError, StoreError};
use crate::models::Deck;
use std::fs;
use std::path::Path;

/// Default file name offered by the export dialog
pub const EXPORT_FILE_NAME: &str = "flashcards.json";

pub fn export_document(deck: &Deck) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(deck)
}

/// Parses and validates a deck document. Nothing is returned unless the whole document is valid.
pub fn import_document(text: &str) -> Result<Deck, ParseError> {
    let deck: Deck = serde_json::from_str(text)?;
    deck.validate()?;
    Ok(deck)
}

/// Writes the deck as UTF-8 JSON to `path`.
pub fn export_json_to_path(deck: &Deck, path: &Path) -> Result<(), StoreError> {
    let json_string = export_document(deck)?;
    fs::write(path, json_string)?;
    tracing::info!("deck exported to {}", path.display());
    Ok(())
}

/// Reads and parses a deck document from a file.
pub fn import_json(path: &Path) -> Result<Deck, FlashcardError> {
    let contents = fs::read_to_string(path).map_err(StoreError::from)?;
    let deck = import_document(&contents)?;
    tracing::info!(
        "deck with {} sections imported from {}",
        deck.len(),
        path.display()
    );
    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Card, Section};
    use pretty_assertions::assert_eq;

    fn create_test_deck() -> Deck {
        let mut learned = Card::new(2, "goodbye", "adiós");
        learned.learned = true;
        Deck::new(vec![
            Section::new("Greetings", vec![Card::new(1, "hello", "hola"), learned]),
            Section::new("Food", vec![Card::new(1, "apple", "manzana")]),
        ])
        .unwrap()
    }

    #[test]
    fn test_export_then_import_is_identity() {
        let deck = create_test_deck();
        let text = export_document(&deck).unwrap();
        assert_eq!(import_document(&text).unwrap(), deck);
    }

    #[test]
    fn test_export_is_deterministic() {
        let deck = create_test_deck();
        assert_eq!(export_document(&deck).unwrap(), export_document(&deck.clone()).unwrap());
    }

    #[test]
    fn test_import_document() {
        let json_content = r#"{
  "Greetings": [
    { "id": 1, "english": "hello", "spanish": "hola", "learned": false }
  ]
}"#;
        let deck = import_document(json_content).unwrap();

        assert_eq!(deck.len(), 1);
        let section = deck.section("Greetings").unwrap();
        assert_eq!(section.cards[0].english, "hello");
        assert_eq!(section.cards[0].spanish, "hola");
    }

    #[test]
    fn test_import_invalid_json() {
        assert!(matches!(import_document("{not json"), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_import_non_object() {
        assert!(matches!(import_document("[]"), Err(ParseError::Json(_))));
        assert!(matches!(import_document("\"deck\""), Err(ParseError::Json(_))));
    }

    #[test]
    fn test_import_card_missing_fields() {
        assert!(import_document(r#"{"A":[{"id":1,"english":"x"}]}"#).is_err());
    }

    #[test]
    fn test_import_duplicate_card_ids() {
        let text = r#"{"A":[{"id":1,"english":"x","spanish":"y"},{"id":1,"english":"z","spanish":"w"}]}"#;
        assert!(matches!(
            import_document(text),
            Err(ParseError::DuplicateCardId { id: 1, .. })
        ));
    }

    #[test]
    fn test_export_and_import_file_roundtrip() {
        let original_deck = create_test_deck();
        let test_file =
            std::env::temp_dir().join(format!("flashcards_roundtrip_{}.json", std::process::id()));

        export_json_to_path(&original_deck, &test_file).unwrap();
        let imported_deck = import_json(&test_file).unwrap();
        assert_eq!(imported_deck, original_deck);

        let _ = fs::remove_file(&test_file);
    }

    #[test]
    fn test_import_nonexistent_file() {
        let result = import_json(Path::new("nonexistent_file_xyz123.json"));
        assert!(matches!(result, Err(FlashcardError::StorageUnavailable(_))));
    }
}
