//! Discourse thread exporter library.
//!
//! Fetches every post of a Discourse thread through the forum's JSON API,
//! reduces each post's cooked HTML to plain text, and writes the result as a
//! paginated PDF or a JSON file.

// Allow raw string hashes for safety - they're harmless and prevent issues if content changes
#![allow(clippy::needless_raw_string_hashes)]

pub mod config;
pub mod constants;
pub mod discourse;
pub mod fs_utils;
pub mod normalize;
pub mod pipeline;
pub mod render;
