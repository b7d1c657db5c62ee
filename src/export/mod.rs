pub mod json;

pub use json::{EXPORT_FILE_NAME, export_document, export_json_to_path, import_document, import_json};
