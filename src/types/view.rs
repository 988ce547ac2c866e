use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::HierarchyError;
use super::folder::Folder;
use super::link::Link;

/// Ordering applied to a folder listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Newest first.
    #[default]
    Date,
    /// Case-aware ascending by folder name / link title.
    Alpha,
    /// Folders by descending item count; links fall back to date order.
    Items,
}

impl FromStr for SortMode {
    type Err = HierarchyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(SortMode::Date),
            "alpha" => Ok(SortMode::Alpha),
            "items" => Ok(SortMode::Items),
            other => Err(HierarchyError::Validation(format!(
                "unknown sort mode '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SortMode::Date => "date",
            SortMode::Alpha => "alpha",
            SortMode::Items => "items",
        };
        f.write_str(s)
    }
}

/// Tag restriction for a listing. The literal `"all"` disables filtering.
///
/// Matching ignores case, so a hand-built `Tag("Work")` behaves like the
/// parsed `Tag("work")`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TagFilter {
    #[default]
    All,
    Tag(String),
}

impl TagFilter {
    pub fn parse(input: &str) -> Self {
        let tag = input.trim().to_lowercase();
        if tag.is_empty() || tag == "all" {
            TagFilter::All
        } else {
            TagFilter::Tag(tag)
        }
    }

    pub fn matches(&self, link: &Link) -> bool {
        match self {
            TagFilter::All => true,
            TagFilter::Tag(tag) if tag.chars().any(char::is_uppercase) => {
                link.has_tag(&tag.to_lowercase())
            }
            TagFilter::Tag(tag) => link.has_tag(tag),
        }
    }
}

impl From<&str> for TagFilter {
    fn from(input: &str) -> Self {
        TagFilter::parse(input)
    }
}

/// The ordered contents of one folder (or the root) as presented.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    pub folders: Vec<Folder>,
    pub links: Vec<Link>,
}

impl Listing {
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty() && self.links.is_empty()
    }
}

/// One entry of a depth-first folder picker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FolderOption {
    pub id: String,
    pub name: String,
    /// 0 for root-level folders.
    pub depth: usize,
}

impl FolderOption {
    /// Name prefixed with two spaces per nesting level.
    pub fn indented_label(&self) -> String {
        format!("{}{}", "  ".repeat(self.depth), self.name)
    }
}
