//! ui
//!
//! User-facing output utilities.

pub mod output;
