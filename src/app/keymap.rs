//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map
//! normal-mode keys to actions.
//!
//! Only the list view goes through the keymap. Search input, forms and
//! dialogs read keys directly since they mostly capture text.

use std::collections::HashMap;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::config::{ConfigPaths, parse_kv_lines, write_config};

pub const KEYBINDS_FILE: &str = "keybinds.conf";

/// Semantic actions available in the list view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Display the help/keybindings reference.
    OpenHelp,
    /// Start typing a name search.
    StartSearch,
    /// Drop the active search and show every user again.
    ClearSearch,
    /// Open an empty create form.
    NewUser,
    /// Open the edit form seeded from the selected user.
    EditSelection,
    /// Ask to delete the selected user.
    DeleteSelection,
    /// Fetch the list again from the server.
    Refresh,
    /// Move up in the list.
    MoveUp,
    /// Move down in the list.
    MoveDown,
    /// Move to the previous page of results.
    PageUp,
    /// Move to the next page of results.
    PageDown,
    /// Bound but does nothing (e.g. Esc in the list).
    Ignore,
}

impl KeyAction {
    pub const ALL: [KeyAction; 13] = [
        KeyAction::Quit,
        KeyAction::OpenHelp,
        KeyAction::StartSearch,
        KeyAction::ClearSearch,
        KeyAction::NewUser,
        KeyAction::EditSelection,
        KeyAction::DeleteSelection,
        KeyAction::Refresh,
        KeyAction::MoveUp,
        KeyAction::MoveDown,
        KeyAction::PageUp,
        KeyAction::PageDown,
        KeyAction::Ignore,
    ];

    pub fn name(self) -> &'static str {
        match self {
            KeyAction::Quit => "Quit",
            KeyAction::OpenHelp => "OpenHelp",
            KeyAction::StartSearch => "StartSearch",
            KeyAction::ClearSearch => "ClearSearch",
            KeyAction::NewUser => "NewUser",
            KeyAction::EditSelection => "EditSelection",
            KeyAction::DeleteSelection => "DeleteSelection",
            KeyAction::Refresh => "Refresh",
            KeyAction::MoveUp => "MoveUp",
            KeyAction::MoveDown => "MoveDown",
            KeyAction::PageUp => "PageUp",
            KeyAction::PageDown => "PageDown",
            KeyAction::Ignore => "Ignore",
        }
    }

    /// Label used by the help dialog.
    pub fn describe(self) -> &'static str {
        match self {
            KeyAction::Quit => "Quit",
            KeyAction::OpenHelp => "Help",
            KeyAction::StartSearch => "Search by name",
            KeyAction::ClearSearch => "Clear search",
            KeyAction::NewUser => "New user",
            KeyAction::EditSelection => "Edit selected user",
            KeyAction::DeleteSelection => "Delete selected user",
            KeyAction::Refresh => "Reload from server",
            KeyAction::MoveUp => "Move up",
            KeyAction::MoveDown => "Move down",
            KeyAction::PageUp => "Previous page",
            KeyAction::PageDown => "Next page",
            KeyAction::Ignore => "Ignored",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == s.trim())
    }
}

/// Mapping from `(KeyModifiers, KeyCode)` to [`KeyAction`].
#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Arrow keys plus vim-style `hjkl`, and one letter per action.
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Esc), KeyAction::Ignore);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('c')), KeyAction::ClearSearch);
        bindings.insert((M::NONE, Char('n')), KeyAction::NewUser);
        bindings.insert((M::NONE, Enter), KeyAction::EditSelection);
        bindings.insert((M::NONE, Char('e')), KeyAction::EditSelection);
        bindings.insert((M::NONE, Delete), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('d')), KeyAction::DeleteSelection);
        bindings.insert((M::NONE, Char('r')), KeyAction::Refresh);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        bindings.insert((M::NONE, Char('h')), KeyAction::PageUp);
        bindings.insert((M::NONE, Char('l')), KeyAction::PageDown);
        Self { bindings }
    }

    /// Read `keybinds.conf` if present; otherwise write the defaults and use
    /// them.
    pub fn load_or_init(paths: &ConfigPaths) -> Self {
        if let Some(existing) = paths.read_path(KEYBINDS_FILE) {
            return Self::from_file(&existing).unwrap_or_default();
        }
        let km = Self::default();
        let target = paths.write_path(KEYBINDS_FILE);
        if let Err(e) = km.write_file(&target) {
            tracing::warn!(path = %target.display(), error = %e, "could not write default keybinds");
        }
        km
    }

    /// Defaults overridden by `<Action> = <KeySpec>` lines. Lines that do not
    /// parse are skipped.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for (lhs, rhs) in parse_kv_lines(&contents) {
            match (KeyAction::parse(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => tracing::warn!(line = %format!("{lhs} = {rhs}"), "ignoring keybinding"),
            }
        }
        Some(map)
    }

    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# userdir-manager keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+q, Enter, Esc, Tab, Up, Down, PageUp, PageDown, Delete, /\n");
        let names: Vec<&str> = KeyAction::ALL.iter().map(|a| a.name()).collect();
        let _ = writeln!(&mut buf, "# Actions: {}\n", names.join(", "));

        let mut rows: Vec<(String, &str)> = self
            .bindings
            .iter()
            .map(|((m, c), a)| (Self::format_key(*m, *c), a.name()))
            .collect();
        rows.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(&b.0)));
        for (key, action) in rows {
            let _ = writeln!(&mut buf, "{action} = {key}");
        }
        write_config(path, &buf)
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied()
    }

    /// Keys bound to `action`, formatted and sorted.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys
    }

    /// Human-readable spec like "Ctrl+q" or "PageDown".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Delete => "Delete".to_string(),
            Esc => "Esc".to_string(),
            Tab => "Tab".to_string(),
            BackTab => "BackTab".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            Left => "Left".to_string(),
            Right => "Right".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{code:?}"),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{base}")
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let (mods, rest) = match s.strip_prefix("Ctrl+") {
        Some(after) => (KeyModifiers::CONTROL, after),
        None => (KeyModifiers::NONE, s),
    };
    let code = match rest {
        "Enter" => Enter,
        "Delete" => Delete,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "BackTab" => BackTab,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}
