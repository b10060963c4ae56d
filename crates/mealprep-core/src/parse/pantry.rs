//! Grammar for categorization lines: `"<Group>: <Item>"`.

use crate::models::PantryEntry;
use crate::prompt::PANTRY_DELIMITER;

use super::{LineError, LineGrammar};

/// Splits on the first `": "` only, so items may themselves contain the
/// delimiter.
pub struct PantryGrammar;

impl LineGrammar for PantryGrammar {
    type Row = PantryEntry;

    fn parse_line(line: usize, text: &str) -> Result<PantryEntry, LineError> {
        let (group, item) = text
            .split_once(PANTRY_DELIMITER)
            .ok_or_else(|| LineError::MissingDelimiter {
                line,
                delimiter: PANTRY_DELIMITER,
                text: text.to_string(),
            })?;

        let (group, item) = (group.trim(), item.trim());
        if group.is_empty() || item.is_empty() {
            return Err(LineError::EmptyField {
                line,
                text: text.to_string(),
            });
        }

        Ok(PantryEntry {
            food_group: group.to_string(),
            item: item.to_string(),
        })
    }
}
