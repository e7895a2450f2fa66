//! Application state types and entry glue.
//!
//! Defines the enums and structs that model the TUI state, plus the event
//! loop entry point (re-exported as `run`).
//!
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod form;
pub mod keymap;
pub mod theme;
pub mod update;

use crate::model::UserId;
use crate::store::DirectoryStore;

pub use form::ActiveForm;
pub use keymap::Keymap;
pub use theme::Theme;

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Browsing the list; keys go through the keymap.
    Normal,
    /// Typing a search query.
    Search,
    /// Editing the open create/edit form.
    Form,
    /// A dialog has the keyboard.
    Modal,
}

/// Dialogs drawn over the list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    /// Yes/No confirmation before deleting a user.
    DeleteConfirm {
        /// User to delete.
        id: UserId,
        /// Shown in the question.
        name: String,
        /// 0 = Yes, 1 = No.
        selected: usize,
    },
    /// Message dialog, used for errors.
    Info {
        title: String,
        message: String,
    },
    /// Keybindings reference.
    Help {
        /// Lines scrolled past the top.
        scroll: u16,
    },
}

/// Severity of a status bar notice.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Confirmation of a finished operation.
    Info,
    /// A failed operation; drawn in the theme's error colour.
    Error,
}

/// Last message shown in the status bar.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

/// Everything the UI thread owns.
pub struct AppState {
    /// Loaded records and the applied search.
    pub store: DirectoryStore,
    /// Index into the visible records.
    pub selected_index: usize,
    /// Table rows that fit on screen, updated on every draw.
    pub rows_per_page: usize,
    /// Which handler receives key presses.
    pub input_mode: InputMode,
    /// Query being typed in search mode; applied on Enter.
    pub search_query: String,
    /// Colour palette.
    pub theme: Theme,
    /// Key to action mapping for normal mode.
    pub keymap: Keymap,
    /// Open dialog, if any.
    pub modal: Option<ModalState>,
    /// Open create/edit form, if any.
    pub form: ActiveForm,
    /// Latest message for the status bar.
    pub notice: Option<Notice>,
    /// Gateway calls dispatched but not yet reconciled.
    pub in_flight: usize,
}

impl AppState {
    pub fn new(theme: Theme, keymap: Keymap) -> Self {
        Self {
            store: DirectoryStore::new(),
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            search_query: String::new(),
            theme,
            keymap,
            modal: None,
            form: ActiveForm::None,
            notice: None,
            in_flight: 0,
        }
    }

    /// Keep the selection inside the visible set.
    pub fn clamp_selection(&mut self) {
        self.selected_index = self.selected_index.min(self.store.len().saturating_sub(1));
    }

    pub fn selected_user(&self) -> Option<&crate::model::User> {
        self.store.visible().get(self.selected_index)
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice { level: NoticeLevel::Info, message: message.into() });
    }

    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notice = Some(Notice { level: NoticeLevel::Error, message: message.into() });
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    /// Close the dialog and go back to the form if one is open.
    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = if self.form.is_open() { InputMode::Form } else { InputMode::Normal };
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Theme::default(), Keymap::default())
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
