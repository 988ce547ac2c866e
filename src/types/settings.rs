use serde::{Deserialize, Serialize};

use super::view::SortMode;

/// Top-level settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppSettings {
    pub storage: StorageSettings,
    pub view: ViewSettings,
    pub logging: LoggingSettings,
}

/// Where records are persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StorageSettings {
    /// `None` uses `linkfolio.db` in the platform data directory.
    pub database_path: Option<String>,
}

/// Initial view state for a new session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewSettings {
    pub default_sort: SortMode,
    pub default_tag_filter: String,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            default_sort: SortMode::Date,
            default_tag_filter: "all".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "linkfolio=info".to_string(),
        }
    }
}
