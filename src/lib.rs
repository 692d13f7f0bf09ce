//! `eml2pdf`: batch conversion of `.eml` email messages into PDF documents.
//!
//! The library decodes messages, pulls out headers and bodies, saves
//! attachments, and renders paginated documents.

pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod parser;
