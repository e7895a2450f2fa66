use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::Duration;

use crate::app::controller::{Command, reconcile};
use crate::app::dispatch::Dispatcher;
use crate::app::form::ActiveForm;
use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState};
use crate::search::{apply_search, clear_search};
use crate::ui;

/// What the loop should do after a key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// Keep looping.
    Continue,
    /// Leave the loop and restore the terminal.
    Quit,
    /// Hand this call to the dispatcher.
    Dispatch(Command),
}

/// Draw, apply finished gateway calls, and handle keys until quit.
///
/// The initial list fetch is dispatched before the first frame.
pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut AppState,
    dispatcher: &mut Dispatcher,
) -> Result<()> {
    send(app, dispatcher, Command::Refresh);

    loop {
        while let Some(outcome) = dispatcher.try_next() {
            reconcile(app, outcome);
        }

        terminal.draw(|f| ui::render(f, app)).context("draw frame")?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(app, key) {
                    KeyOutcome::Quit => break,
                    KeyOutcome::Dispatch(cmd) => send(app, dispatcher, cmd),
                    KeyOutcome::Continue => {}
                }
            }
        }
    }

    tracing::info!(in_flight = app.in_flight, "quitting");
    Ok(())
}

/// Hand a command to the dispatcher and count it as in flight.
pub fn send(app: &mut AppState, dispatcher: &Dispatcher, cmd: Command) {
    app.in_flight += 1;
    dispatcher.dispatch(cmd);
}

/// Route one key press according to the current input mode.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, key),
        InputMode::Search => {
            match key.code {
                KeyCode::Enter => {
                    apply_search(app);
                    app.input_mode = InputMode::Normal;
                }
                KeyCode::Esc => {
                    clear_search(app);
                    app.input_mode = InputMode::Normal;
                }
                KeyCode::Backspace => {
                    app.search_query.pop();
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    app.search_query.push(c);
                }
                _ => {}
            }
            KeyOutcome::Continue
        }
        InputMode::Form => handle_form_key(app, key),
        InputMode::Modal => handle_modal_key(app, key.code),
    }
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    let Some(action) = app.keymap.resolve(&key) else {
        return KeyOutcome::Continue;
    };
    let rpp = app.rows_per_page.max(1);
    let last = app.store.len().saturating_sub(1);
    match action {
        KeyAction::Quit => return KeyOutcome::Quit,
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::ClearSearch => clear_search(app),
        KeyAction::NewUser => {
            app.form = ActiveForm::open_create();
            app.input_mode = InputMode::Form;
        }
        KeyAction::EditSelection => {
            if let Some(form) = app.selected_user().map(ActiveForm::open_edit) {
                app.form = form;
                app.input_mode = InputMode::Form;
            }
        }
        KeyAction::DeleteSelection => {
            let modal = app.selected_user().map(|user| ModalState::DeleteConfirm {
                id: user.id,
                name: user.name.clone(),
                selected: 1,
            });
            if let Some(modal) = modal {
                app.open_modal(modal);
            }
        }
        KeyAction::Refresh => return KeyOutcome::Dispatch(Command::Refresh),
        KeyAction::MoveUp => app.selected_index = app.selected_index.saturating_sub(1),
        KeyAction::MoveDown => app.selected_index = (app.selected_index + 1).min(last),
        KeyAction::PageUp => app.selected_index = app.selected_index.saturating_sub(rpp),
        KeyAction::PageDown => app.selected_index = app.selected_index.saturating_add(rpp).min(last),
        KeyAction::Ignore => {}
    }
    KeyOutcome::Continue
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => {
            app.form.close();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Tab | KeyCode::Down => app.form.focus_next(),
        KeyCode::BackTab | KeyCode::Up => app.form.focus_prev(),
        KeyCode::Backspace => app.form.pop_char(),
        KeyCode::Enter => match app.form.submit() {
            Ok(Some(cmd)) => return KeyOutcome::Dispatch(cmd),
            Ok(None) => {}
            Err(e) => tracing::debug!(error = %e, "form not submitted"),
        },
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => app.form.push_char(c),
        _ => {}
    }
    KeyOutcome::Continue
}

fn handle_modal_key(app: &mut AppState, code: KeyCode) -> KeyOutcome {
    match &mut app.modal {
        Some(ModalState::DeleteConfirm { id, selected, .. }) => match code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
                *selected = 1 - *selected;
            }
            KeyCode::Enter => {
                let (id, confirmed) = (*id, *selected == 0);
                app.close_modal();
                if confirmed {
                    return KeyOutcome::Dispatch(Command::Delete { id });
                }
            }
            _ => {}
        },
        Some(ModalState::Info { .. }) => {
            if matches!(code, KeyCode::Esc | KeyCode::Enter) {
                app.close_modal();
            }
        }
        Some(ModalState::Help { scroll }) => match code {
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => app.close_modal(),
            _ => {}
        },
        None => app.close_modal(),
    }
    KeyOutcome::Continue
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::form::FormField;
    use crate::model::User;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(app: &mut AppState, s: &str) {
        for c in s.chars() {
            handle_key(app, key(KeyCode::Char(c)));
        }
    }

    fn loaded_app() -> AppState {
        let mut app = AppState::default();
        app.store
            .load(vec![
                User::new(1, "Leanne Graham", "Sincere@april.biz", "Gwenborough"),
                User::new(2, "Ervin Howell", "Shanna@melissa.tv", "Wisokyburgh"),
            ])
            .unwrap();
        app
    }

    #[test]
    fn new_user_flow_produces_create_command() {
        let mut app = loaded_app();
        handle_key(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.input_mode, InputMode::Form);

        type_str(&mut app, "Ada");
        handle_key(&mut app, key(KeyCode::Tab));
        type_str(&mut app, "ada@x.com");
        handle_key(&mut app, key(KeyCode::Tab));
        type_str(&mut app, "London");

        match handle_key(&mut app, key(KeyCode::Enter)) {
            KeyOutcome::Dispatch(Command::Create { new_user, .. }) => {
                assert_eq!(new_user.name, "Ada");
                assert_eq!(new_user.email, "ada@x.com");
                assert_eq!(new_user.address.city, "London");
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        // stays open until the gateway answers
        assert_eq!(app.input_mode, InputMode::Form);
    }

    #[test]
    fn incomplete_form_is_not_submitted() {
        let mut app = loaded_app();
        handle_key(&mut app, key(KeyCode::Char('n')));
        type_str(&mut app, "Ada");
        assert_eq!(handle_key(&mut app, key(KeyCode::Enter)), KeyOutcome::Continue);
        let draft = app.form.draft().unwrap();
        assert_eq!(draft.error.as_deref(), Some("Email is required"));
    }

    #[test]
    fn typing_in_edit_form_leaves_create_draft_alone() {
        let mut app = loaded_app();
        handle_key(&mut app, key(KeyCode::Enter));
        let ActiveForm::Editing { id, .. } = &app.form else { panic!("expected edit form") };
        assert_eq!(*id, 1);

        handle_key(&mut app, key(KeyCode::Char('!')));
        assert_eq!(app.form.draft().unwrap().field(FormField::Name), "Leanne Graham!");

        handle_key(&mut app, key(KeyCode::Esc));
        handle_key(&mut app, key(KeyCode::Char('n')));
        assert_eq!(app.form.draft().unwrap().name, "");
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = loaded_app();
        handle_key(&mut app, key(KeyCode::Char('j')));
        handle_key(&mut app, key(KeyCode::Char('d')));
        assert!(matches!(app.modal, Some(ModalState::DeleteConfirm { id: 2, selected: 1, .. })));

        // default answer is No
        assert_eq!(handle_key(&mut app, key(KeyCode::Enter)), KeyOutcome::Continue);
        assert!(app.modal.is_none());

        handle_key(&mut app, key(KeyCode::Char('d')));
        handle_key(&mut app, key(KeyCode::Left));
        assert_eq!(handle_key(&mut app, key(KeyCode::Enter)), KeyOutcome::Dispatch(Command::Delete { id: 2 }));
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn search_mode_filters_on_enter_and_esc_clears() {
        let mut app = loaded_app();
        handle_key(&mut app, key(KeyCode::Char('/')));
        type_str(&mut app, "ERV");
        handle_key(&mut app, key(KeyCode::Enter));
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.input_mode, InputMode::Normal);

        handle_key(&mut app, key(KeyCode::Char('/')));
        handle_key(&mut app, key(KeyCode::Esc));
        assert_eq!(app.store.len(), 2);
    }

    #[test]
    fn navigation_is_clamped() {
        let mut app = loaded_app();
        handle_key(&mut app, key(KeyCode::Up));
        assert_eq!(app.selected_index, 0);
        handle_key(&mut app, key(KeyCode::PageDown));
        assert_eq!(app.selected_index, 1);
        handle_key(&mut app, key(KeyCode::Down));
        assert_eq!(app.selected_index, 1);
    }

    #[test]
    fn refresh_and_quit() {
        let mut app = loaded_app();
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('r'))), KeyOutcome::Dispatch(Command::Refresh));
        assert_eq!(handle_key(&mut app, key(KeyCode::Char('q'))), KeyOutcome::Quit);
    }
}
