//! Email parsing: EML decoding, header lookup, body extraction, and HTML flattening.

pub mod eml;
pub mod header;
pub mod html;
pub mod mime;
