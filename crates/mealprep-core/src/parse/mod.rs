//! Line-oriented parsers for model completions.
//!
//! A completion is tokenized into numbered, non-blank lines, and each line is
//! handed to a per-task [`LineGrammar`]. Lines the grammar rejects are
//! dropped from the result and reported as [`LineError`]s, so one bad line
//! never costs the whole batch.

mod meal_plan;
mod pantry;

pub use meal_plan::MealPlanGrammar;
pub use pantry::PantryGrammar;

use thiserror::Error;

use crate::models::{MealPlanEntry, PantryEntry};

/// Why a single completion line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineError {
    #[error("line {line}: missing {delimiter:?} delimiter in {text:?}")]
    MissingDelimiter {
        line: usize,
        delimiter: &'static str,
        text: String,
    },

    #[error("line {line}: expected {expected} fields, found {found} in {text:?}")]
    FieldCount {
        line: usize,
        expected: usize,
        found: usize,
        text: String,
    },

    #[error("line {line}: empty field in {text:?}")]
    EmptyField { line: usize, text: String },
}

impl LineError {
    /// 1-based number of the offending line among the non-blank lines.
    pub fn line(&self) -> usize {
        match self {
            Self::MissingDelimiter { line, .. }
            | Self::FieldCount { line, .. }
            | Self::EmptyField { line, .. } => *line,
        }
    }
}

/// Rows recovered from a completion plus the lines that were dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed<T> {
    pub rows: Vec<T>,
    pub errors: Vec<LineError>,
}

impl<T> Default for Parsed<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            errors: Vec::new(),
        }
    }
}

impl<T> Parsed<T> {
    /// `true` if every non-blank line produced a row.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The grammar of one line in a task's completion format.
pub trait LineGrammar {
    type Row;

    /// Parse one trimmed, non-blank line.
    fn parse_line(line: usize, text: &str) -> Result<Self::Row, LineError>;
}

/// Split a completion into `(line_number, text)` pairs.
///
/// The completion and each line are trimmed; blank lines are skipped and do
/// not consume a line number.
pub fn tokenize(completion: &str) -> impl Iterator<Item = (usize, &str)> {
    completion
        .trim()
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(i, line)| (i + 1, line))
}

/// Run a grammar over every line of a completion.
pub fn parse_lines<G: LineGrammar>(completion: &str) -> Parsed<G::Row> {
    let mut parsed = Parsed::default();
    for (line, text) in tokenize(completion) {
        match G::parse_line(line, text) {
            Ok(row) => parsed.rows.push(row),
            Err(e) => parsed.errors.push(e),
        }
    }
    parsed
}

/// Parse a categorization completion (`"<Group>: <Item>"` per line).
pub fn parse_pantry(completion: &str) -> Parsed<PantryEntry> {
    parse_lines::<PantryGrammar>(completion)
}

/// Parse a meal-plan completion (`"<Day> | <Meal> | <Suggestion>"` per line).
pub fn parse_meal_plan(completion: &str) -> Parsed<MealPlanEntry> {
    parse_lines::<MealPlanGrammar>(completion)
}

/// Normalize a free-text completion (recipe, macros) for storage.
pub fn parse_free_text(completion: &str) -> String {
    completion.trim().to_string()
}
