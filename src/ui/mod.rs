//! Rendering: header, users table, details pane, status bar and dialogs.
//!
pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::app::{AppState, InputMode, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)])
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
        .split(root[1]);

    render_header(f, root[0], app);
    users::render_users_table(f, body[0], app);
    users::render_user_details(f, body[1], app);
    components::render_status_bar(f, root[2], app);

    if app.form.is_open() {
        users::render_user_form(f, f.area(), app);
    }
    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let search = match app.input_mode {
        InputMode::Search => format!("  Search by name: {}_", app.search_query),
        _ if !app.store.query().is_empty() => format!("  filter: \"{}\" (c: clear)", app.store.query()),
        _ => String::new(),
    };
    let p = Paragraph::new(format!(
        "users:{}/{}{search}  /: search  n: new  Enter: edit  d: delete  r: reload  ?: help  q: quit",
        app.store.len(),
        app.store.all().len(),
    ))
    .block(
        Block::default()
            .title("User Management System")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(state) = &app.modal else { return };
    match state {
        ModalState::DeleteConfirm { .. } => users::render_delete_confirm(f, area, app, state),
        ModalState::Info { .. } => components::render_info_modal(f, area, app, state),
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
    }
}
