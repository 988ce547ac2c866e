use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named container node in the link hierarchy.
///
/// `parent_folder_id == None` means the folder lives at the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub parent_folder_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A folder that has not been assigned an id by persistence yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFolder {
    pub name: String,
    pub description: Option<String>,
    pub parent_folder_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewFolder {
    /// Attaches a persistence-assigned id.
    pub fn into_folder(self, id: String) -> Folder {
        Folder {
            id,
            name: self.name,
            description: self.description,
            parent_folder_id: self.parent_folder_id,
            created_at: self.created_at,
        }
    }
}

/// Partial update for a folder.
///
/// An outer `None` leaves the field untouched; `Some(None)` clears a nullable
/// field (for `parent_folder_id` that means "move to root").
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub parent_folder_id: Option<Option<String>>,
}

impl FolderPatch {
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn move_to(parent_folder_id: Option<&str>) -> Self {
        Self {
            parent_folder_id: Some(parent_folder_id.map(str::to_string)),
            ..Self::default()
        }
    }

    pub fn describe(description: Option<&str>) -> Self {
        Self {
            description: Some(description.map(str::to_string)),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.description.is_none() && self.parent_folder_id.is_none()
    }

    /// Writes every supplied field onto `folder`. Id and timestamp never change.
    pub fn apply_to(&self, folder: &mut Folder) {
        if let Some(name) = &self.name {
            folder.name = name.clone();
        }
        if let Some(description) = &self.description {
            folder.description = description.clone();
        }
        if let Some(parent) = &self.parent_folder_id {
            folder.parent_folder_id = parent.clone();
        }
    }
}
