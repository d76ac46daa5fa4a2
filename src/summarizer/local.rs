use std::collections::HashSet;

use async_trait::async_trait;

use super::{SummarizeError, Summarizer};
use crate::models::CommitRecord;

/// Keyword looked for in commit messages, and the label it contributes.
const CATEGORIES: [(&str, &str); 4] = [
    ("add", "additions"),
    ("fix", "fixes"),
    ("update", "updates"),
    ("remove", "removals"),
];

/// Summarizes from commit counts and message keywords alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSummarizer;

impl LocalSummarizer {
    /// Labels whose keyword occurs (case-insensitively) in any message,
    /// in a fixed order.
    pub fn categories(commits: &[CommitRecord]) -> Vec<&'static str> {
        let messages: Vec<String> = commits.iter().map(|c| c.message().to_lowercase()).collect();

        CATEGORIES
            .iter()
            .filter(|(keyword, _)| messages.iter().any(|m| m.contains(keyword)))
            .map(|(_, label)| *label)
            .collect()
    }

    pub fn summarize_commits(&self, commits: &[CommitRecord]) -> Result<String, SummarizeError> {
        let latest = commits.first().ok_or(SummarizeError::EmptyInput)?;
        let authors: HashSet<&str> = commits.iter().map(CommitRecord::author_name).collect();
        let categories = Self::categories(commits);

        let kinds = if categories.is_empty() {
            "none detected".to_string()
        } else {
            categories.join(", ")
        };

        Ok(format!(
            "{} by {}.\nTypes of changes: {}\nMost recent commit: {}",
            plural(commits.len(), "commit"),
            plural(authors.len(), "contributor"),
            kinds,
            latest.message().trim()
        ))
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", count, noun)
    }
}

#[async_trait]
impl Summarizer for LocalSummarizer {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn summarize(&self, commits: &[CommitRecord]) -> Result<String, SummarizeError> {
        self.summarize_commits(commits)
    }
}
