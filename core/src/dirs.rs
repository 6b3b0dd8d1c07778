//! XDG base directory resolution.

use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_PREFIX: &str = "gridscribe";

/// `~/.config/gridscribe/` (or `$XDG_CONFIG_HOME/gridscribe/`).
pub fn config_dir() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix(APP_PREFIX)
        .get_config_home()
        .context("could not determine config directory (is HOME set?)")
}

/// `~/.local/share/gridscribe/` (or `$XDG_DATA_HOME/gridscribe/`).
pub fn data_dir() -> Result<PathBuf> {
    xdg::BaseDirectories::with_prefix(APP_PREFIX)
        .get_data_home()
        .context("could not determine data directory (is HOME set?)")
}
