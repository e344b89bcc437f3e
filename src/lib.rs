//! Docbabel
//!
//! Script-aware OCR for scanned documents (Latin, Devanagari, Tamil) and
//! resilient translation through a chain of public translation services.

pub mod config;
pub mod detect;
pub mod error;
pub mod ocr;
pub mod pdf;
pub mod routes;
pub mod script;
pub mod state;
pub mod translate;
