pub mod date;
pub mod pdf;
pub mod text;


pub use date::parse_publication_date;
pub use text::{normalize_document_text, strip_abstract};
