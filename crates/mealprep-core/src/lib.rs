//! Core of the meal-prep assistant: prompt templates, completion parsers,
//! the text-generation client boundary, and per-session state.
//!
//! ```text
//! food list -> prompt -> TextGenerator -> parse -> Session slot -> pivot -> view
//! ```

pub mod llm;
pub mod models;
pub mod parse;
pub mod pipeline;
pub mod pivot;
pub mod prompt;
pub mod session;
