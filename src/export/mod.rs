//! Export: attachment extraction, document rendering, and batch conversion.

pub mod attachment;
pub mod convert;
pub mod html;
pub mod layout;
pub mod pdf;
pub mod render;
