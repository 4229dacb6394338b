// Snipsight platform abstraction
// Provides platform-specific paths and the system clipboard seam.
//
// Uses `cfg(target_os)` for conditional compilation to select the correct
// platform-specific paths at compile time.

pub mod clipboard;

use std::env;
use std::path::PathBuf;

/// Returns the platform-specific configuration directory for Snipsight.
///
/// - **Linux**: `$XDG_CONFIG_HOME/snipsight` or `~/.config/snipsight`
/// - **macOS**: `~/Library/Application Support/Snipsight`
/// - **Windows**: `%APPDATA%/Snipsight`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg).join("snipsight")
        } else {
            home_dir().join(".config").join("snipsight")
        }
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join("Snipsight")
    }
    #[cfg(target_os = "windows")]
    {
        match env::var("APPDATA") {
            Ok(appdata) => PathBuf::from(appdata).join("Snipsight"),
            Err(_) => home_dir().join("Snipsight"),
        }
    }
}

fn home_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    let var = "USERPROFILE";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    PathBuf::from(env::var(var).unwrap_or_else(|_| String::from("/tmp")))
}
