use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A bookmarked URL, optionally placed inside exactly one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: String,
    pub url: String,
    pub title: String,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub folder_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Link {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }
}

/// A link that has not been assigned an id by persistence yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLink {
    pub url: String,
    pub title: String,
    pub tags: BTreeSet<String>,
    pub description: Option<String>,
    pub folder_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewLink {
    /// Attaches a persistence-assigned id.
    pub fn into_link(self, id: String) -> Link {
        Link {
            id,
            url: self.url,
            title: self.title,
            tags: self.tags,
            description: self.description,
            folder_id: self.folder_id,
            created_at: self.created_at,
        }
    }
}

/// Partial update for a link. Same `Option<Option<_>>` convention as `FolderPatch`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPatch {
    pub url: Option<String>,
    pub title: Option<String>,
    pub tags: Option<BTreeSet<String>>,
    pub description: Option<Option<String>>,
    pub folder_id: Option<Option<String>>,
}

impl LinkPatch {
    pub fn move_to(folder_id: Option<&str>) -> Self {
        Self {
            folder_id: Some(folder_id.map(str::to_string)),
            ..Self::default()
        }
    }

    pub fn retitle(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none()
            && self.title.is_none()
            && self.tags.is_none()
            && self.description.is_none()
            && self.folder_id.is_none()
    }

    pub fn apply_to(&self, link: &mut Link) {
        if let Some(url) = &self.url {
            link.url = url.clone();
        }
        if let Some(title) = &self.title {
            link.title = title.clone();
        }
        if let Some(tags) = &self.tags {
            link.tags = tags.clone();
        }
        if let Some(description) = &self.description {
            link.description = description.clone();
        }
        if let Some(folder) = &self.folder_id {
            link.folder_id = folder.clone();
        }
    }
}

/// Normalizes tag tokens: trimmed, lowercased, empties dropped, duplicates collapsed.
pub fn normalize_tags<I, S>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Parses comma-separated tag input such as `"Work, urgent,,work"`.
pub fn parse_tags(input: &str) -> BTreeSet<String> {
    normalize_tags(input.split(','))
}
