// linkfolio platform paths
// Resolves where settings and the database live on each OS.
//
// Linux follows XDG (`$XDG_CONFIG_HOME`, `$XDG_DATA_HOME`), macOS uses
// Application Support, Windows uses %APPDATA%.

use std::env;
use std::path::PathBuf;

const APP_DIR: &str = "linkfolio";

#[cfg(not(target_os = "windows"))]
fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

#[cfg(target_os = "linux")]
fn xdg_dir(var: &str, fallback: &[&str]) -> PathBuf {
    match env::var(var) {
        Ok(dir) if !dir.is_empty() => PathBuf::from(dir).join(APP_DIR),
        _ => fallback
            .iter()
            .fold(home_dir(), |path, part| path.join(part))
            .join(APP_DIR),
    }
}

/// Returns the platform-specific configuration directory.
///
/// - **Linux**: `~/.config/linkfolio` (or `$XDG_CONFIG_HOME/linkfolio`)
/// - **macOS**: `~/Library/Application Support/linkfolio`
/// - **Windows**: `%APPDATA%/linkfolio`
pub fn get_config_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_CONFIG_HOME", &[".config"])
    }
    #[cfg(target_os = "macos")]
    {
        home_dir()
            .join("Library")
            .join("Application Support")
            .join(APP_DIR)
    }
    #[cfg(target_os = "windows")]
    {
        let appdata = env::var("APPDATA")
            .unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
        PathBuf::from(appdata).join(APP_DIR)
    }
    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        home_dir().join(format!(".{}", APP_DIR))
    }
}

/// Returns the platform-specific data directory (holds the database).
///
/// - **Linux**: `~/.local/share/linkfolio` (or `$XDG_DATA_HOME/linkfolio`)
/// - **macOS** / **Windows**: same as the config directory
pub fn get_data_dir() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        xdg_dir("XDG_DATA_HOME", &[".local", "share"])
    }
    #[cfg(not(target_os = "linux"))]
    {
        get_config_dir()
    }
}
