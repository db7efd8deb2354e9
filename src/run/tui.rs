use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::info;

use crate::config::Config;
use crate::db::Database;
use crate::session::Session;
use crate::ui::app::{App, InputMode, PendingAction, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(config: Config, db: &Database) -> Result<()> {
    let session = Session::require(&config, db)?;
    let mut app = App::new(config, session, chrono::Local::now().date_naive());
    app.refresh(db)?;
    info!(user_id = app.user_id(), "tui started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, db);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    db: &Database,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            // tab + status + command bars, table borders and header, expenses filter bar
            let content_height = f.area().height.saturating_sub(9) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            let outcome = match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, db),
                InputMode::Command => handle_command_input(key, app, db),
                InputMode::Form => handle_form_input(key, app, db),
                InputMode::Confirm => handle_confirm_input(key, app, db),
            };
            // Store failures are reported in the status line; the session keeps going.
            if let Err(e) = outcome {
                tracing::error!("{e:#}");
                app.set_status(format!("Error: {e:#}"));
            }
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.running = false;
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app),
        KeyCode::Char('1') => switch_screen(app, db, Screen::Dashboard)?,
        KeyCode::Char('2') => switch_screen(app, db, Screen::Expenses)?,
        KeyCode::Char('3') => switch_screen(app, db, Screen::Categories)?,
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, db, screens[next])?;
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 {
                screens.len() - 1
            } else {
                idx - 1
            };
            switch_screen(app, db, screens[prev])?;
        }
        KeyCode::Char('c') => {
            app.filter.category = app.filter.category.cycle();
            app.recompute();
            app.set_status(format!("Category: {}", app.filter.category));
        }
        KeyCode::Char('r') => {
            app.filter.date_range = app.filter.date_range.cycle();
            app.recompute();
            app.set_status(format!("Range: {}", app.filter.date_range.label()));
        }
        KeyCode::Char('s') => {
            app.filter.sort = app.filter.sort.cycle();
            app.recompute();
            app.set_status(format!("Sort: {}", app.filter.sort.label()));
        }
        KeyCode::Char('a') => commands::handle_command("add", app, db)?,
        KeyCode::Char('e') => commands::handle_command("edit", app, db)?,
        KeyCode::Char('D') => commands::handle_command("delete", app, db)?,
        KeyCode::Enter if app.screen == Screen::Expenses => {
            commands::handle_command("edit", app, db)?;
        }
        KeyCode::Enter if app.screen == Screen::Categories => {
            if let Some(cat) = app.selected_category() {
                let name = cat.name;
                commands::handle_command(&format!("category {name}"), app, db)?;
                switch_screen(app, db, Screen::Expenses)?;
            }
        }
        KeyCode::Esc => app.status_message.clear(),
        KeyCode::Char('g') => handle_goto_top(app),
        KeyCode::Char('G') => handle_goto_bottom(app),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_down(app);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let half_page = app.visible_rows / 2;
            for _ in 0..half_page {
                handle_move_up(app);
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = app.command_input.clone();
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            commands::handle_command(&input, app, db)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            app.command_input.pop();
            if app.command_input.is_empty() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.command_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Char('w') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            let trimmed = app.command_input.trim_end();
            if let Some(pos) = trimmed.rfind(' ') {
                app.command_input.truncate(pos + 1);
            } else {
                app.command_input.clear();
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => {
            app.command_input.push(c);
        }
        _ => {}
    }
    Ok(())
}

fn handle_form_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    let Some(form) = app.form.as_mut() else {
        app.input_mode = InputMode::Normal;
        return Ok(());
    };

    match key.code {
        KeyCode::Esc => {
            app.form = None;
            app.input_mode = InputMode::Normal;
            app.set_status("Cancelled");
        }
        KeyCode::Tab | KeyCode::Down => form.next_field(),
        KeyCode::BackTab | KeyCode::Up => form.prev_field(),
        KeyCode::Left => form.adjust(-1),
        KeyCode::Right => form.adjust(1),
        KeyCode::Backspace => form.backspace(),
        KeyCode::Enter => {
            let Some(expense) = form.submit() else {
                return Ok(());
            };
            let editing_id = form.editing_id;
            let saved = match editing_id {
                Some(id) => db.update_expense(app.user_id(), id, &expense)?,
                None => db.insert_expense(app.user_id(), &expense)?,
            };
            app.form = None;
            app.input_mode = InputMode::Normal;
            app.refresh(db)?;
            let verb = if editing_id.is_some() { "Updated" } else { "Added" };
            info!(id = saved.id, "{} expense", verb.to_lowercase());
            app.set_status(format!("{verb}: {}", saved.title));
        }
        KeyCode::Char(c) => form.input_char(c),
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, db: &Database) -> Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            if let Some(action) = app.pending_action.take() {
                match action {
                    PendingAction::DeleteExpense { id, title } => {
                        db.delete_expense(app.user_id(), id)?;
                        info!(id, "deleted expense");
                        app.refresh(db)?;
                        app.set_status(format!("Deleted: {title}"));
                    }
                }
            }
        }
        _ => {
            // Any other key = cancel
            app.pending_action = None;
            app.input_mode = InputMode::Normal;
            app.confirm_message.clear();
            app.set_status("Cancelled");
        }
    }
    Ok(())
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, db: &Database, screen: Screen) -> Result<()> {
    app.screen = screen;
    app.refresh(db)
}

fn handle_move_down(app: &mut App) {
    let page = app.visible_rows;
    match app.screen {
        Screen::Expenses => {
            let len = app.view.expenses.len();
            scroll_down(&mut app.expense_index, &mut app.expense_scroll, len, page);
        }
        Screen::Categories => {
            if app.category_index + 1 < crate::models::Category::all().len() {
                app.category_index += 1;
            }
        }
        Screen::Dashboard => {}
    }
}

fn handle_move_up(app: &mut App) {
    match app.screen {
        Screen::Expenses => scroll_up(&mut app.expense_index, &mut app.expense_scroll),
        Screen::Categories => app.category_index = app.category_index.saturating_sub(1),
        Screen::Dashboard => {}
    }
}

fn handle_goto_top(app: &mut App) {
    match app.screen {
        Screen::Expenses => scroll_to_top(&mut app.expense_index, &mut app.expense_scroll),
        Screen::Categories => app.category_index = 0,
        Screen::Dashboard => {}
    }
}

fn handle_goto_bottom(app: &mut App) {
    let page = app.visible_rows;
    match app.screen {
        Screen::Expenses => {
            let len = app.view.expenses.len();
            scroll_to_bottom(&mut app.expense_index, &mut app.expense_scroll, len, page);
        }
        Screen::Categories => {
            app.category_index = crate::models::Category::all().len().saturating_sub(1);
        }
        Screen::Dashboard => {}
    }
}
