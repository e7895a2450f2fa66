//! Command-line options and log setup.

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::config::default_data_dir;
use crate::remote::DEFAULT_BASE_URL;

#[derive(Parser, Debug, Clone)]
#[command(name = "userdir-manager", version, about = "Browse and edit users of a remote REST collection")]
pub struct Cli {
    /// Collection root of the users resource
    #[arg(long, env = "USERDIR_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Directory holding theme.conf and keybinds.conf
    #[arg(long, env = "USERDIR_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Log file (the terminal is owned by the UI)
    #[arg(long, env = "USERDIR_LOG_FILE")]
    pub log_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "USERDIR_LOG", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Explicit `--log-file`, else `<data dir>/userdir-manager.log`, else the
    /// working directory.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            default_data_dir()
                .unwrap_or_default()
                .join("userdir-manager.log")
        })
    }

    /// Base URL with surrounding whitespace removed, checked to be absolute.
    pub fn validated_base_url(&self) -> Result<String> {
        let url = self.base_url.trim();
        reqwest::Url::parse(url).with_context(|| format!("invalid --base-url {url:?}"))?;
        Ok(url.to_string())
    }
}

/// Send `tracing` output to the log file. `RUST_LOG` wins over `level`.
pub fn init_logging(path: &std::path::Path, level: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create log directory {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open log file {}", path.display()))?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|e| anyhow::anyhow!("init logging: {e}"))?;
    Ok(())
}
