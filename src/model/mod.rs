//! Core data model types: message parts, extracted content, and attachments.

pub mod attachment;
pub mod mail;
pub mod part;
