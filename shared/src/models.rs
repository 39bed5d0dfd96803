use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Project,
    Photo,
    Video,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Project, Category::Photo, Category::Video];

    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Project => "project",
            Category::Photo => "photo",
            Category::Video => "video",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            Category::Project => "Project Upload",
            Category::Photo => "Photo Generation",
            Category::Video => "Video Generation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown category: {0} (expected project, photo or video)")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "project" => Ok(Category::Project),
            "photo" => Ok(Category::Photo),
            "video" => Ok(Category::Video),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn matches(self, entry: &Entry) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => entry.category == category,
        }
    }
}

impl From<Option<Category>> for CategoryFilter {
    fn from(category: Option<Category>) -> Self {
        category.map_or(CategoryFilter::All, CategoryFilter::Only)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: String,
    pub title: String,
    pub team_name: String,
    pub description: String,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none", skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    pub category: Category,
    #[serde(default)]
    pub votes: u32,
    #[serde(with = "time::serde::rfc3339")]
    pub submitted_at: OffsetDateTime,
    #[serde(default)]
    pub voted_by: Vec<String>,
}

impl Entry {
    pub fn has_voter(&self, device_id: &str) -> bool {
        self.voted_by.iter().any(|voter| voter == device_id)
    }

    /// Appends `device_id` to the voters unless it is already there.
    /// Returns whether the vote was recorded.
    pub fn record_vote(&mut self, device_id: &str) -> bool {
        if self.has_voter(device_id) {
            return false;
        }
        self.voted_by.push(device_id.to_string());
        self.votes = self.voted_by.len() as u32;
        true
    }

    /// Drops duplicate voters and resyncs the cached count. Returns whether anything changed.
    pub fn normalize(&mut self) -> bool {
        let before = self.voted_by.len();
        let mut seen = std::collections::HashSet::with_capacity(before);
        self.voted_by.retain(|voter| seen.insert(voter.clone()));

        let expected = self.voted_by.len() as u32;
        let changed = before != self.voted_by.len() || self.votes != expected;
        self.votes = expected;
        changed
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EntryInput {
    pub title: String,
    pub team_name: String,
    pub description: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    pub category: Option<Category>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VoteOutcome {
    Cast,
    AlreadyVoted,
    NotFound,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub projects: Vec<Entry>,
    pub votes: Vec<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub export_date: OffsetDateTime,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
