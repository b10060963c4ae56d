//! Plain-text renderers for one-shot command output.

use std::fmt::Write as _;

use mealprep_core::models::{PantryGroup, Weekday};
use mealprep_core::pivot::{MealGrid, max_group_count};

const BAR_WIDTH: usize = 20;
const CELL_WIDTH: usize = 26;

/// A `#` bar for `count`, scaled so the largest group fills `width`.
pub fn count_bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 || count == 0 {
        return String::new();
    }
    let len = (count * width / max).max(1);
    "#".repeat(len)
}

/// Shorten `s` to at most `max` characters, marking the cut with `...`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Render grouped pantry entries, largest group first.
pub fn pantry_table(groups: &[PantryGroup]) -> String {
    let mut out = String::new();
    if groups.is_empty() {
        out.push_str("No pantry entries.\n");
        return out;
    }

    let max = max_group_count(groups);
    let _ = writeln!(out, "{:<20} {:>5}  {:<BAR_WIDTH$}  ITEMS", "FOOD GROUP", "COUNT", "");
    let _ = writeln!(out, "{}", "-".repeat(72));
    for group in groups {
        let _ = writeln!(
            out,
            "{:<20} {:>5}  {:<BAR_WIDTH$}  {}",
            truncate(&group.food_group, 20),
            group.count,
            count_bar(group.count, max, BAR_WIDTH),
            group.items.join(", ")
        );
    }
    out
}

/// Render the meal plan as meals by weekdays.
pub fn meal_grid_table(grid: &MealGrid) -> String {
    let mut out = String::new();
    if grid.rows.is_empty() {
        out.push_str("No meal plan entries.\n");
        return out;
    }

    let _ = write!(out, "{:<12}", "MEAL");
    for day in Weekday::ALL {
        let _ = write!(out, " {:<CELL_WIDTH$}", day.to_string().to_uppercase());
    }
    out.push('\n');
    let _ = writeln!(out, "{}", "-".repeat(12 + (CELL_WIDTH + 1) * Weekday::ALL.len()));

    for row in &grid.rows {
        let _ = write!(out, "{:<12}", truncate(&row.meal, 12));
        for day in Weekday::ALL {
            let cell = row.cell(day).unwrap_or("-");
            let _ = write!(out, " {:<CELL_WIDTH$}", truncate(cell, CELL_WIDTH));
        }
        let trimmed = out.trim_end_matches(' ').len();
        out.truncate(trimmed);
        out.push('\n');
    }
    out
}

/// Render selectable meal labels as a numbered list.
pub fn label_list(labels: &[String]) -> String {
    let mut out = String::new();
    for (i, label) in labels.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {label}", i + 1);
    }
    out
}
