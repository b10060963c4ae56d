//! Reshaping parsed rows for display: pantry grouping and the meal grid.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{Meal, MealPlanEntry, PantryEntry, PantryGroup, Weekday};

/// Group pantry entries by food group, largest group first.
///
/// Groups appear in first-seen order before sorting; the sort is stable, so
/// groups with equal counts keep that order. Duplicate items are counted.
pub fn group_pantry(entries: &[PantryEntry]) -> Vec<PantryGroup> {
    let mut groups: Vec<PantryGroup> = Vec::new();

    for entry in entries {
        match groups.iter_mut().find(|g| g.food_group == entry.food_group) {
            Some(group) => {
                group.items.push(entry.item.clone());
                group.count += 1;
            }
            None => groups.push(PantryGroup {
                food_group: entry.food_group.clone(),
                items: vec![entry.item.clone()],
                count: 1,
            }),
        }
    }

    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

/// Largest group size, used to scale count bars. Zero for an empty pantry.
pub fn max_group_count(groups: &[PantryGroup]) -> usize {
    groups.iter().map(|g| g.count).max().unwrap_or(0)
}

// ---------------------------------------------------------------------------
// Meal grid
// ---------------------------------------------------------------------------

/// One row of the meal grid: a meal and its suggestion for each weekday.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealRow {
    pub meal: String,
    /// Indexed by [`Weekday::index`].
    pub cells: [Option<String>; 5],
}

impl MealRow {
    fn new(meal: &str) -> Self {
        Self {
            meal: meal.to_string(),
            cells: Default::default(),
        }
    }

    pub fn cell(&self, day: Weekday) -> Option<&str> {
        self.cells[day.index()].as_deref()
    }
}

/// Meal plan pivoted into meal rows by weekday columns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MealGrid {
    pub rows: Vec<MealRow>,
}

impl MealGrid {
    pub fn row(&self, meal: &str) -> Option<&MealRow> {
        self.rows.iter().find(|r| r.meal.eq_ignore_ascii_case(meal))
    }

    /// Look up one cell; `None` if the row is absent or the cell is empty.
    pub fn cell(&self, meal: &str, day: Weekday) -> Option<&str> {
        self.row(meal).and_then(|r| r.cell(day))
    }

    /// `true` if every row has a suggestion for every weekday.
    pub fn is_complete(&self) -> bool {
        self.rows
            .iter()
            .all(|r| r.cells.iter().all(|c| c.is_some()))
    }
}

/// Key a meal value onto a grid row.
///
/// The three known meals match case-insensitively; anything else matches on
/// its exact text.
#[derive(Debug, Clone, PartialEq, Eq)]
enum RowKey {
    Known(Meal),
    Other(String),
}

impl RowKey {
    fn of(meal: &str) -> Self {
        match meal.parse::<Meal>() {
            Ok(m) => Self::Known(m),
            Err(_) => Self::Other(meal.to_string()),
        }
    }
}

/// Pivot meal-plan rows into a meal x weekday grid.
///
/// Known meals come first in breakfast, lunch, dinner order, then any other
/// meal values in first-seen order. Every observed meal gets a row, and cells
/// with no entry stay empty. Entries for days outside Monday..Friday have no
/// column, so their meal may appear as a row of empty cells. For a repeated
/// (day, meal) pair the first suggestion wins.
pub fn pivot_meal_plan(entries: &[MealPlanEntry]) -> MealGrid {
    let mut keyed: Vec<(RowKey, MealRow)> = Vec::new();

    for entry in entries {
        let key = RowKey::of(&entry.meal);
        let idx = match keyed.iter().position(|(k, _)| *k == key) {
            Some(idx) => idx,
            None => {
                let label = match &key {
                    RowKey::Known(m) => m.to_string(),
                    RowKey::Other(s) => s.clone(),
                };
                keyed.push((key, MealRow::new(&label)));
                keyed.len() - 1
            }
        };

        let Ok(day) = entry.day.parse::<Weekday>() else {
            debug!(day = %entry.day, "meal plan entry has no weekday column");
            continue;
        };

        let cell = &mut keyed[idx].1.cells[day.index()];
        if cell.is_none() {
            *cell = Some(entry.suggestion.clone());
        } else {
            debug!(day = %day, meal = %entry.meal, "duplicate meal plan cell ignored");
        }
    }

    keyed.sort_by_key(|(key, _)| match key {
        RowKey::Known(m) => *m as usize,
        RowKey::Other(_) => Meal::ALL.len(),
    });

    MealGrid {
        rows: keyed.into_iter().map(|(_, row)| row).collect(),
    }
}

/// Unique selector labels in plan order.
pub fn meal_labels(entries: &[MealPlanEntry]) -> Vec<String> {
    let mut seen = HashSet::new();
    entries
        .iter()
        .map(MealPlanEntry::label)
        .filter(|label| seen.insert(label.clone()))
        .collect()
}
