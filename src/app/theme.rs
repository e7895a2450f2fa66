//! Colour palette and `theme.conf` handling.

use std::path::Path;

use ratatui::style::Color;

use super::config::{ConfigPaths, parse_kv_lines, write_config};

pub const THEME_FILE: &str = "theme.conf";

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub error: Color,
}

impl Theme {
    /// Plain terminal colours.
    pub fn dark() -> Self {
        Self {
            text: Color::Gray,
            muted: Color::DarkGray,
            title: Color::Cyan,
            border: Color::Gray,
            header_bg: Color::Black,
            header_fg: Color::Cyan,
            status_bg: Color::DarkGray,
            status_fg: Color::Black,
            highlight_fg: Color::Yellow,
            highlight_bg: Color::Reset,
            error: Color::Red,
        }
    }

    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            error: Color::Rgb(0xf3, 0x8b, 0xa8),        // red
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_bg" => &mut self.header_bg,
            "header_fg" => &mut self.header_fg,
            "status_bg" => &mut self.status_bg,
            "status_fg" => &mut self.status_fg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "error" => &mut self.error,
            _ => return None,
        })
    }

    fn entries(&self) -> [(&'static str, Color); 11] {
        [
            ("text", self.text),
            ("muted", self.muted),
            ("title", self.title),
            ("border", self.border),
            ("header_bg", self.header_bg),
            ("header_fg", self.header_fg),
            ("status_bg", self.status_bg),
            ("status_fg", self.status_fg),
            ("highlight_fg", self.highlight_fg),
            ("highlight_bg", self.highlight_bg),
            ("error", self.error),
        ]
    }

    /// Load from a key=value file. `palette = dark|mocha` picks the base
    /// (mocha when absent); colour keys override single slots. Unknown keys
    /// and unparsable colours are skipped.
    pub fn from_file(path: &Path) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        Some(Self::parse(&contents))
    }

    fn parse(contents: &str) -> Self {
        let mut theme = match parse_kv_lines(contents).find(|(k, _)| *k == "palette") {
            Some((_, v)) if v.eq_ignore_ascii_case("dark") => Self::dark(),
            Some((_, v)) if !v.eq_ignore_ascii_case("mocha") => {
                tracing::warn!(palette = %v, "unknown palette, using mocha");
                Self::mocha()
            }
            _ => Self::mocha(),
        };
        for (key, val) in parse_kv_lines(contents) {
            if let (Some(slot), Some(color)) = (theme.slot(key), parse_color(val)) {
                *slot = color;
            }
        }
        theme
    }

    /// Named base palette this theme is written against.
    fn palette(&self) -> (&'static str, Self) {
        if *self == Self::dark() {
            ("dark", Self::dark())
        } else {
            ("mocha", Self::mocha())
        }
    }

    /// Write the palette name plus the slots that differ from it; the rest
    /// are listed commented out for reference.
    pub fn write_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let (name, base) = self.palette();
        let mut buf = String::new();
        buf.push_str("# userdir-manager theme configuration\n");
        buf.push_str("# palette: dark or mocha. Uncomment a colour to override it.\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n\n");
        let _ = writeln!(&mut buf, "palette = {name}");
        for ((k, v), (_, b)) in self.entries().into_iter().zip(base.entries()) {
            let prefix = if v == b { "# " } else { "" };
            let _ = writeln!(&mut buf, "{prefix}{k} = {}", color_to_str(v));
        }
        write_config(path, &buf)
    }

    /// Read `theme.conf` if present; otherwise write the default and use it.
    pub fn load_or_init(paths: &ConfigPaths) -> Self {
        if let Some(existing) = paths.read_path(THEME_FILE) {
            return Self::from_file(&existing).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        let target = paths.write_path(THEME_FILE);
        if let Err(e) = t.write_file(&target) {
            tracing::warn!(path = %target.display(), error = %e, "could not write default theme");
        }
        t
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

/// `#RRGGBB`, `RRGGBB` or `reset`.
fn parse_color(s: &str) -> Option<Color> {
    let lower = s.trim().to_ascii_lowercase();
    if lower == "reset" {
        return Some(Color::Reset);
    }
    let hex = lower.strip_prefix('#').unwrap_or(&lower);
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(byte(0)?, byte(2)?, byte(4)?))
}

fn color_to_str(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
        Color::Reset => "reset".to_string(),
        // Named colours are written as close hex equivalents.
        Color::Black => "#000000".to_string(),
        Color::Red => "#FF0000".to_string(),
        Color::Green => "#00FF00".to_string(),
        Color::Yellow => "#FFFF00".to_string(),
        Color::Blue => "#0000FF".to_string(),
        Color::Cyan => "#00FFFF".to_string(),
        Color::Gray => "#B3B3B3".to_string(),
        Color::DarkGray => "#4D4D4D".to_string(),
        Color::White => "#FFFFFF".to_string(),
        other => format!("{other:?}"),
    }
}
