//! Configuration and log locations for neuik.
//!
//! - Unix/macOS: `~/.config/neuik/`
//! - Windows: `%APPDATA%\neuik\`

use std::{env, path::PathBuf};

const APP_DIR: &str = "neuik";

/// Base config directory
///
/// Unix/macOS:
///   - If XDG_CONFIG_HOME is set: `$XDG_CONFIG_HOME/neuik`
///   - Else: `~/.config/neuik`
///
/// Windows:
///   - `%APPDATA%\neuik`
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        env::var("APPDATA")
            .ok()
            .map(|appdata| PathBuf::from(appdata).join(APP_DIR))
    }

    #[cfg(not(target_os = "windows"))]
    {
        env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .map(|config| config.join(APP_DIR))
    }
}

/// `~/.config/neuik/widgets.yaml`
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join("widgets.yaml"))
}

/// Platform cache directory for log files (`~/.cache/neuik/logs` on Linux)
pub fn log_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(APP_DIR).join("logs"))
}
