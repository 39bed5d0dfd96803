use serde::{Deserialize, Serialize};

use crate::models::{Category, Entry};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub project: usize,
    pub photo: usize,
    pub video: usize,
}

impl CategoryCounts {
    pub fn get(&self, category: Category) -> usize {
        match category {
            Category::Project => self.project,
            Category::Photo => self.photo,
            Category::Video => self.video,
        }
    }

    fn bump(&mut self, category: Category) {
        match category {
            Category::Project => self.project += 1,
            Category::Photo => self.photo += 1,
            Category::Video => self.video += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leader {
    pub id: String,
    pub title: String,
    pub votes: u32,
}

impl From<&Entry> for Leader {
    fn from(entry: &Entry) -> Self {
        Self {
            id: entry.id.clone(),
            title: entry.title.clone(),
            votes: entry.votes,
        }
    }
}

/// Board totals, recomputed from scratch on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub total_entries: usize,
    pub total_votes: u64,
    pub category_breakdown: CategoryCounts,
    pub leader: Option<Leader>,
    pub device_vote_count: usize,
}

pub const NO_ENTRIES_PLACEHOLDER: &str = "No projects yet";

impl Statistics {
    pub fn compute(entries: &[Entry], device_vote_count: usize) -> Self {
        let category_breakdown = entries.iter().fold(CategoryCounts::default(), |mut counts, entry| {
            counts.bump(entry.category);
            counts
        });

        Self {
            total_entries: entries.len(),
            total_votes: entries.iter().map(|entry| u64::from(entry.votes)).sum(),
            category_breakdown,
            leader: leader(entries).map(Leader::from),
            device_vote_count,
        }
    }

    pub fn leader_title(&self) -> &str {
        self.leader.as_ref().map_or(NO_ENTRIES_PLACEHOLDER, |leader| leader.title.as_str())
    }

    pub fn leader_votes(&self) -> u32 {
        self.leader.as_ref().map_or(0, |leader| leader.votes)
    }
}

/// Entry with the most votes; ties go to the earliest in store order.
pub fn leader(entries: &[Entry]) -> Option<&Entry> {
    entries.iter().fold(None, |best: Option<&Entry>, entry| match best {
        Some(current) if current.votes >= entry.votes => Some(current),
        _ => Some(entry),
    })
}
