//! Grammar for meal-plan lines: `"<Day> | <Meal> | <Suggestion>"`.

use crate::models::MealPlanEntry;
use crate::prompt::MEAL_PLAN_DELIMITER;

use super::{LineError, LineGrammar};

const FIELDS: usize = 3;

/// Requires exactly three non-empty fields; anything else drops the line.
pub struct MealPlanGrammar;

impl LineGrammar for MealPlanGrammar {
    type Row = MealPlanEntry;

    fn parse_line(line: usize, text: &str) -> Result<MealPlanEntry, LineError> {
        let fields: Vec<&str> = text.split(MEAL_PLAN_DELIMITER).map(str::trim).collect();

        if fields.len() != FIELDS {
            return Err(LineError::FieldCount {
                line,
                expected: FIELDS,
                found: fields.len(),
                text: text.to_string(),
            });
        }
        if fields.iter().any(|f| f.is_empty()) {
            return Err(LineError::EmptyField {
                line,
                text: text.to_string(),
            });
        }

        Ok(MealPlanEntry {
            day: fields[0].to_string(),
            meal: fields[1].to_string(),
            suggestion: fields[2].to_string(),
        })
    }
}
