//! Advice source client implementations

pub mod openrouter;
mod common;

pub use common::{parse_error_response, UserAgent};
