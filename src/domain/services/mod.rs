//! Listing page parser: tokenizer → field normalizers → assembler.
//!
//! Pure functions over an in-memory document. Same HTML in, same sections out.

pub mod assembler;
pub mod date_range;
pub mod schedule;
pub mod subject;
pub mod tokenizer;

pub use assembler::{assemble, parse_document, parse_html, parse_sections, BlockOutcome, ParseOutcome};
pub use date_range::{split_date_range, DateRange};
pub use schedule::decode_meetings;
pub use subject::{normalize_subject, Subject};
pub use tokenizer::{tokenize, Cell, CourseBlock};
