//! Config file lookup and the `key = value` line format shared by
//! `theme.conf` and `keybinds.conf`.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

/// Platform config directory, e.g. `~/.config/userdir-manager`.
pub fn default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "userdir-manager").map(|d| d.config_dir().to_path_buf())
}

/// Platform data directory, used for the default log file.
pub fn default_data_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "userdir-manager").map(|d| d.data_local_dir().to_path_buf())
}

/// Where config files are read from and written to.
#[derive(Clone, Debug)]
pub struct ConfigPaths {
    dir: Option<PathBuf>,
}

impl ConfigPaths {
    /// Use `dir` if given, otherwise the platform config directory.
    pub fn new(dir: Option<PathBuf>) -> Self {
        Self { dir: dir.or_else(default_config_dir) }
    }

    /// Existing file named `name`: the working directory wins over the
    /// config directory.
    pub fn read_path(&self, name: &str) -> Option<PathBuf> {
        let local = PathBuf::from(name);
        if local.is_file() {
            return Some(local);
        }
        self.dir.as_ref().map(|d| d.join(name)).filter(|p| p.is_file())
    }

    /// Path a fresh default file should be written to.
    pub fn write_path(&self, name: &str) -> PathBuf {
        match &self.dir {
            Some(d) => d.join(name),
            None => PathBuf::from(name),
        }
    }
}

/// Non-empty, non-comment `key = value` pairs, trimmed.
pub fn parse_kv_lines(contents: &str) -> impl Iterator<Item = (&str, &str)> {
    contents.lines().filter_map(|raw| {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let (k, v) = line.split_once('=')?;
        let (k, v) = (k.trim(), v.trim());
        (!k.is_empty() && !v.is_empty()).then_some((k, v))
    })
}

/// Write `contents`, creating parent directories as needed.
pub fn write_config(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_lines_skip_comments_and_blanks() {
        let text = "# header\n\ntext = #FFFFFF\n  bad line\nkey =\n = value\nQuit = q\n";
        let pairs: Vec<_> = parse_kv_lines(text).collect();
        assert_eq!(pairs, vec![("text", "#FFFFFF"), ("Quit", "q")]);
    }

    #[test]
    fn explicit_dir_is_used_for_writes() {
        let paths = ConfigPaths::new(Some(PathBuf::from("/tmp/ugm-conf")));
        assert_eq!(paths.write_path("theme.conf"), PathBuf::from("/tmp/ugm-conf/theme.conf"));
    }
}
