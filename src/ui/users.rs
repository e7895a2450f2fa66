//! Users screen: table, details pane, create/edit form and delete dialog.
//!
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::app::form::{ActiveForm, FormField};
use crate::app::{AppState, ModalState};
use crate::ui::components::centered_rect;

/// Render one page of the visible users, keeping the selection on screen.
pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }
    app.clamp_selection();

    let visible = app.store.visible();
    let rpp = app.rows_per_page.max(1);
    let start = (app.selected_index / rpp) * rpp;
    let end = (start + rpp).min(visible.len());
    let slice = &visible[start.min(end)..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let style = if start + i == app.selected_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        Row::new(vec![
            Cell::from(u.id.to_string()),
            Cell::from(u.name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.city().to_string()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(6),
        Constraint::Percentage(35),
        Constraint::Percentage(40),
        Constraint::Percentage(25),
    ];
    let header = Row::new(vec!["ID", "NAME", "EMAIL", "CITY"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));

    let pages = visible.len().div_ceil(rpp).max(1);
    let title = format!("Users (page {}/{})", start / rpp + 1, pages);
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_user_details(f: &mut Frame, area: Rect, app: &AppState) {
    let text = match app.selected_user() {
        Some(u) => format!("ID: {}\nName: {}\nEmail: {}\nCity: {}", u.id, u.name, u.email, u.city()),
        None if app.in_flight > 0 => "Loading…".to_string(),
        None => "No users".to_string(),
    };
    let p = Paragraph::new(text)
        .style(Style::default().fg(app.theme.text))
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(p, area);
}

/// Render the open create or edit form as a centered dialog.
pub fn render_user_form(f: &mut Frame, area: Rect, app: &AppState) {
    let (title, draft) = match &app.form {
        ActiveForm::None => return,
        ActiveForm::Creating(draft) => ("Create New User".to_string(), draft),
        ActiveForm::Editing { id, draft } => (format!("Edit User {id}"), draft),
    };
    let rect = centered_rect(60, 10, area);

    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let focused = draft.focused() == *field;
            let marker = if focused { "▶ " } else { "  " };
            let cursor = if focused && !draft.submitting { "_" } else { "" };
            let value_style = if focused {
                Style::default().fg(app.theme.highlight_fg).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            Line::from(vec![
                Span::raw(format!("{marker}{:<6} ", field.label())),
                Span::styled(format!("{}{cursor}", draft.field(*field)), value_style),
            ])
        })
        .collect();
    lines.push(Line::raw(""));
    if draft.submitting {
        lines.push(Line::styled("Saving…", Style::default().fg(app.theme.muted)));
    } else if let Some(err) = &draft.error {
        lines.push(Line::styled(err.clone(), Style::default().fg(app.theme.error)));
    } else {
        lines.push(Line::styled(
            "Tab: next field  Enter: save  Esc: cancel",
            Style::default().fg(app.theme.muted),
        ));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_confirm(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    let ModalState::DeleteConfirm { id, name, selected } = state else { return };
    let rect = centered_rect(50, 7, area);
    let yes = if *selected == 0 { "[Yes]" } else { " Yes " };
    let no = if *selected == 1 { "[No]" } else { " No " };
    let body = format!("Delete user '{name}' (id {id})?\n\n  {yes}    {no}");
    let p = Paragraph::new(body).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
