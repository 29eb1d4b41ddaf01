//! Command handlers for CLI subcommands

mod completions;
mod utils;
mod validate;

pub use completions::handle_completions;
pub use validate::{handle_feed, handle_manifest};
