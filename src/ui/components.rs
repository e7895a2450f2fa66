//! Status bar, help and message dialogs shared by every screen.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState, NoticeLevel};

/// Render the bottom status bar with mode, counts and the latest notice.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Form => "FORM",
        InputMode::Modal => "DIALOG",
    };
    let pending = if app.in_flight > 0 { format!("  pending:{}", app.in_flight) } else { String::new() };
    let base = Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg);
    let mut spans = vec![Span::styled(
        format!("mode: {mode}  users:{}  rows/page:{}{pending}", app.store.len(), app.rows_per_page),
        base,
    )];
    if let Some(notice) = &app.notice {
        let style = match notice.level {
            NoticeLevel::Info => base,
            NoticeLevel::Error => base.fg(app.theme.error).add_modifier(Modifier::BOLD),
        };
        spans.push(Span::styled(format!("  {}", notice.message), style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)).style(base), area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational dialog; long text wraps.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { title, message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let width = 60u16.min(max_w);
        let approx_lines = (message.len() as u16 / width.saturating_sub(4).max(10)).max(1);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (approx_lines + 4).clamp(5, max_h);
        let rect = centered_rect(width, height, area);
        let body = format!("{message}\n\nEsc/Enter: close");
        let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(title.as_str())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.error)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the help dialog from the live keymap.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 24u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line> = vec![Line::from(Span::styled("List", bold))];
    for action in KeyAction::ALL {
        let keys = app.keymap.keys_for(action);
        if action == KeyAction::Ignore || keys.is_empty() {
            continue;
        }
        lines.push(Line::from(vec![
            Span::raw(format!("  {:<22}", action.describe())),
            Span::styled(keys.join(", "), italic),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Search", bold)));
    for (label, keys) in [("Apply", "Enter"), ("Clear and leave", "Esc")] {
        lines.push(Line::from(vec![Span::raw(format!("  {label:<22}")), Span::styled(keys, italic)]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Form", bold)));
    for (label, keys) in [
        ("Next field", "Tab, Down"),
        ("Previous field", "Shift+Tab, Up"),
        ("Save", "Enter"),
        ("Cancel", "Esc"),
    ] {
        lines.push(Line::from(vec![Span::raw(format!("  {label:<22}")), Span::styled(keys, italic)]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![Span::raw("Close help: "), Span::styled("Esc / Enter", italic)]));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
