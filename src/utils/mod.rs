//! Shared helpers: serde encodings for byte fields and time formatting

pub mod encoding;
pub mod time;
