//! Interactive TUI for a single meal-prep session.

pub mod app;
mod ui;

use std::io;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use mealprep_core::pipeline::{Pipeline, TaskKind};
use mealprep_core::session::Session;

use app::App;

/// Launch the interactive session.
///
/// Must be called from within a Tokio runtime; generations are spawned onto it.
pub fn run_session(session: Session, pipeline: Pipeline) -> Result<()> {
    info!(session_id = %session.id(), "interactive session started");

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, pipeline);

    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!(session_id = %app.session.id(), "interactive session ended");
    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    let tick_rate = app.tick_rate;

    loop {
        app.poll_pending();

        // Render.
        terminal.draw(|f| ui::render(f, app))?;

        // Poll for events with a timeout matching the tick rate.
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if app.input.is_some() {
                        handle_input_key(app, key);
                    } else {
                        handle_key(app, key);
                    }
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Keys while typing a new food item.
fn handle_input_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.submit_input(),
        KeyCode::Esc => app.cancel_input(),
        KeyCode::Backspace => app.pop_input(),
        KeyCode::Char(c) => app.push_input(c),
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Clear status message on any keypress.
    app.status_message = None;

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit();
        }
        KeyCode::Char('q') => {
            if app.current_view == app::View::Help {
                app.navigate_back();
            } else {
                app.quit();
            }
        }
        KeyCode::Esc => {
            app.navigate_back();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            app.move_down();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.move_up();
        }
        KeyCode::Tab => {
            app.toggle_focus();
        }
        KeyCode::Char('a') => {
            app.start_input();
        }
        KeyCode::Char('d') => {
            app.delete_selected_food();
        }
        KeyCode::Char('p') => {
            app.start(TaskKind::Pantry);
        }
        KeyCode::Char('m') => {
            app.start(TaskKind::MealPlan);
        }
        KeyCode::Char('r') => {
            app.start(TaskKind::Recipe);
        }
        KeyCode::Char('M') => {
            app.start(TaskKind::Macros);
        }
        KeyCode::Char('?') => {
            app.show_help();
        }
        _ => {}
    }
}
