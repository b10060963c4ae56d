//! TUI rendering using ratatui.

use chrono::{DateTime, Utc};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use mealprep_core::models::Weekday;
use mealprep_core::pipeline::TaskKind;
use mealprep_core::pivot::max_group_count;
use mealprep_core::session::ActionStatus;

use super::app::{App, EMPTY_FOODS_WARNING, Focus, View};
use crate::render::{count_bar, truncate};

const BAR_WIDTH: usize = 10;

/// Render the current view.
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // main content
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    match app.current_view {
        View::Dashboard => render_dashboard(f, app, chunks[0]),
        View::Help => render_help(f, chunks[0]),
    }

    render_status_bar(f, app, chunks[1]);
}

fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25), Constraint::Percentage(75)])
        .split(area);

    render_foods(f, app, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(30), // pantry
            Constraint::Length(7),      // meal grid
            Constraint::Min(6),         // recipe section
        ])
        .split(columns[1]);

    render_pantry(f, app, right[0]);
    render_meal_grid(f, app, right[1]);

    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(36),
            Constraint::Percentage(30),
        ])
        .split(right[2]);

    render_meal_selector(f, app, bottom[0]);
    render_recipe(f, app, bottom[1]);
    render_macros(f, app, bottom[2]);
}

fn focused_block(title: String, focused: bool) -> Block<'static> {
    let block = Block::default().borders(Borders::ALL).title(title);
    if focused {
        block.border_style(Style::default().fg(Color::Cyan))
    } else {
        block
    }
}

fn selected_style() -> Style {
    Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD)
}

fn render_foods(f: &mut Frame, app: &App, area: Rect) {
    let foods = app.session.foods();
    let rows = foods.iter().map(|food| Row::new(vec![Cell::from(food.clone())]));

    let table = Table::new(rows, [Constraint::Percentage(100)])
        .row_highlight_style(selected_style())
        .block(focused_block(
            format!(" Foods ({}) ", foods.len()),
            app.focus == Focus::Foods,
        ));

    let mut state = TableState::default();
    if !foods.is_empty() && app.focus == Focus::Foods {
        state.select(Some(app.selected_food));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_pantry(f: &mut Frame, app: &App, area: Rect) {
    let title = slot_title("Pantry", app, TaskKind::Pantry);

    if app.session.pantry().is_empty() {
        let warning = Paragraph::new(Span::styled(
            EMPTY_FOODS_WARNING,
            Style::default().fg(Color::Yellow),
        ))
        .block(Block::default().borders(Borders::ALL).title(title));
        f.render_widget(warning, area);
        return;
    }

    let groups = app.session.pantry_groups();
    let max = max_group_count(&groups);

    let header_cells = ["Food Group", "Count", "Items"]
        .iter()
        .map(|h| Cell::from(*h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows = groups.iter().map(|group| {
        Row::new(vec![
            Cell::from(group.food_group.clone()),
            Cell::from(Line::from(vec![
                Span::styled(
                    format!("{:<BAR_WIDTH$}", count_bar(group.count, max, BAR_WIDTH)),
                    Style::default().fg(Color::Green),
                ),
                Span::raw(format!(" {}", group.count)),
            ])),
            Cell::from(group.items.join(", ")),
        ])
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(BAR_WIDTH as u16 + 4),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(table, area);
}

fn render_meal_grid(f: &mut Frame, app: &App, area: Rect) {
    let title = slot_title("Meal Plan", app, TaskKind::MealPlan);
    let block = Block::default().borders(Borders::ALL).title(title);

    let Some(grid) = app.session.meal_grid() else {
        let hint = Paragraph::new(Span::styled(
            "Press m to create a meal plan.",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(hint, area);
        return;
    };

    let header_cells = std::iter::once("Meal".to_string())
        .chain(Weekday::ALL.iter().map(|d| d.to_string()))
        .map(|h| Cell::from(h).style(Style::default().fg(Color::Yellow)));
    let header = Row::new(header_cells).height(1);

    let rows = grid.rows.iter().map(|row| {
        let mut cells = vec![Cell::from(row.meal.clone())];
        for day in Weekday::ALL {
            cells.push(match row.cell(day) {
                Some(text) => Cell::from(text.to_string()),
                None => Cell::from("-").style(Style::default().fg(Color::DarkGray)),
            });
        }
        Row::new(cells)
    });

    let mut widths = vec![Constraint::Length(10)];
    widths.extend(Weekday::ALL.iter().map(|_| Constraint::Ratio(1, 5)));

    let table = Table::new(rows, widths).header(header).block(block);
    f.render_widget(table, area);
}

fn render_meal_selector(f: &mut Frame, app: &App, area: Rect) {
    let labels = app.session.meal_labels();
    let rows = labels
        .iter()
        .map(|label| Row::new(vec![Cell::from(label.clone())]));

    let table = Table::new(rows, [Constraint::Percentage(100)])
        .row_highlight_style(selected_style())
        .block(focused_block(
            " Select a meal ".to_string(),
            app.focus == Focus::Meals,
        ));

    let mut state = TableState::default();
    if !labels.is_empty() {
        state.select(Some(app.selected_meal));
    }
    f.render_stateful_widget(table, area, &mut state);
}

fn render_recipe(f: &mut Frame, app: &App, area: Rect) {
    let base = slot_title("Recipe", app, TaskKind::Recipe);
    let (title, text) = match app.session.recipe().get() {
        Some(recipe) => (
            format!("{base}- {} ", truncate(&recipe.meal, 40)),
            recipe.text.clone(),
        ),
        None => (base, "Select a meal and press r.".to_string()),
    };

    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}

fn render_macros(f: &mut Frame, app: &App, area: Rect) {
    let title = slot_title("Macros", app, TaskKind::Macros);
    let text = match app.session.macros().get() {
        Some(report) => report.text.clone(),
        None => "Press M for a macros breakdown.".to_string(),
    };

    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(paragraph, area);
}

/// Block title with a marker for the slot's latest action.
fn slot_title(name: &str, app: &App, kind: TaskKind) -> String {
    format_slot_title(
        name,
        app.session.action(kind).status,
        app.session.generated_at(kind),
    )
}

fn format_slot_title(
    name: &str,
    status: ActionStatus,
    generated_at: Option<DateTime<Utc>>,
) -> String {
    match (status, generated_at) {
        (ActionStatus::Pending, _) => format!(" {name} (loading) "),
        (ActionStatus::Failed, _) => format!(" {name} (failed) "),
        (_, Some(at)) => format!(" {name} ({} UTC) ", at.format("%H:%M:%S")),
        (_, None) => format!(" {name} "),
    }
}

fn render_help(f: &mut Frame, area: Rect) {
    let heading = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let text = vec![
        Line::from(""),
        Line::from(vec![Span::styled("  Food list", heading)]),
        Line::from("    a         Add a food item (Enter to save, Esc to discard)"),
        Line::from("    d         Delete selected food item"),
        Line::from("    j/Down    Move down"),
        Line::from("    k/Up      Move up"),
        Line::from("    Tab       Switch between food list and meal selector"),
        Line::from(""),
        Line::from(vec![Span::styled("  Generate", heading)]),
        Line::from("    p         Categorize foods into a pantry"),
        Line::from("    m         Create a Monday to Friday meal plan"),
        Line::from("    r         Create a recipe for the selected meal"),
        Line::from("    M         Macros breakdown for the recipe"),
        Line::from("    Esc       Cancel the generation in progress"),
        Line::from(""),
        Line::from(vec![Span::styled("  Other", heading)]),
        Line::from("    ?         Show this help"),
        Line::from("    q/Ctrl-C  Quit"),
        Line::from(""),
    ];

    let help = Paragraph::new(text).block(Block::default().borders(Borders::ALL).title(" Help "));
    f.render_widget(help, area);
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let view_name = match app.current_view {
        View::Dashboard => "Session",
        View::Help => "Help",
    };

    let activity = if let Some(input) = &app.input {
        Span::styled(format!("Add food: {input}_"), Style::default().fg(Color::Cyan))
    } else if let Some(kind) = app.pending_kind() {
        Span::styled(
            format!("Loading {kind}... (Esc to cancel)"),
            Style::default().fg(Color::Yellow),
        )
    } else if let Some(msg) = &app.status_message {
        let color = if msg.contains("failed") {
            Color::Red
        } else {
            Color::Green
        };
        Span::styled(msg.clone(), Style::default().fg(color))
    } else {
        Span::raw("")
    };

    let bar = Line::from(vec![
        Span::styled(
            format!(" {view_name} "),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
        Span::raw("  "),
        activity,
        Span::raw("  q:quit  ?:help  p/m/r/M:generate"),
    ]);

    f.render_widget(Paragraph::new(bar), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn slot_title_marks_action_status() {
        assert_eq!(
            format_slot_title("Pantry", ActionStatus::Idle, None),
            " Pantry "
        );
        assert_eq!(
            format_slot_title("Pantry", ActionStatus::Pending, None),
            " Pantry (loading) "
        );
        assert_eq!(
            format_slot_title("Recipe", ActionStatus::Failed, None),
            " Recipe (failed) "
        );
    }

    #[test]
    fn slot_title_shows_generation_time() {
        let at = Utc.with_ymd_and_hms(2024, 3, 4, 9, 5, 7).unwrap();
        assert_eq!(
            format_slot_title("Meal Plan", ActionStatus::Done, Some(at)),
            " Meal Plan (09:05:07 UTC) "
        );
        // A failed regeneration keeps the old value but reports the failure.
        assert_eq!(
            format_slot_title("Meal Plan", ActionStatus::Failed, Some(at)),
            " Meal Plan (failed) "
        );
    }
}
