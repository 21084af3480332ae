//! Output formatting for recorded plans.
//!
//! - [`terminal`] - table output with colors

mod terminal;

pub use terminal::{describe, format_field, print_plan};
