use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A commit as returned by the GitHub commits API.
///
/// The list endpoint omits `files`; the per-commit detail endpoint
/// includes them. Only the fields the digest consumes are modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitRecord {
    #[serde(default)]
    pub sha: String,
    /// API URL of the commit detail resource.
    #[serde(default)]
    pub url: String,
    pub commit: CommitDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<ChangedFile>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitDetails {
    pub message: String,
    pub author: CommitAuthor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Author timestamp, `YYYY-MM-DDTHH:MM:SSZ` on the wire.
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangedFile {
    pub filename: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub additions: u64,
    #[serde(default)]
    pub deletions: u64,
}

impl CommitRecord {
    pub fn message(&self) -> &str {
        &self.commit.message
    }

    pub fn author_name(&self) -> &str {
        &self.commit.author.name
    }

    pub fn authored_at(&self) -> DateTime<Utc> {
        self.commit.author.date
    }

    /// Number of changed files, 0 when the record carries no file list.
    pub fn files_changed(&self) -> usize {
        self.files.as_ref().map_or(0, Vec::len)
    }
}

/// Response projection of a single commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedCommit {
    pub message: String,
    pub author: String,
    pub date: DateTime<Utc>,
    pub files_changed: usize,
}

impl From<&CommitRecord> for FormattedCommit {
    fn from(record: &CommitRecord) -> Self {
        Self {
            message: record.message().to_string(),
            author: record.author_name().to_string(),
            date: record.authored_at(),
            files_changed: record.files_changed(),
        }
    }
}

impl From<FormattedCommit> for CommitRecord {
    /// Rebuilds a bare record. The sha, url and file list are not part of
    /// the projection and come back empty.
    fn from(formatted: FormattedCommit) -> Self {
        Self {
            sha: String::new(),
            url: String::new(),
            commit: CommitDetails {
                message: formatted.message,
                author: CommitAuthor {
                    name: formatted.author,
                    email: None,
                    date: formatted.date,
                },
            },
            files: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_ITEM: &str = r#"{
        "sha": "6dcb09b5b57875f334f61aebed695e2e4193db5e",
        "url": "https://api.github.com/repos/octocat/Hello-World/commits/6dcb09b",
        "commit": {
            "message": "Fix all the bugs",
            "author": {
                "name": "Monalisa Octocat",
                "email": "support@github.com",
                "date": "2011-04-14T16:00:49Z"
            }
        }
    }"#;

    #[test]
    fn deserializes_list_item_without_files() {
        let record: CommitRecord = serde_json::from_str(LIST_ITEM).expect("Should deserialize");

        assert_eq!(record.message(), "Fix all the bugs");
        assert_eq!(record.author_name(), "Monalisa Octocat");
        assert!(record.files.is_none());
        assert_eq!(record.files_changed(), 0);
    }

    #[test]
    fn counts_files_from_detail_response() {
        let json = r#"{
            "sha": "abc",
            "url": "https://api.github.com/repos/o/r/commits/abc",
            "commit": {
                "message": "Add README",
                "author": { "name": "Ada", "date": "2024-03-01T09:15:00Z" }
            },
            "files": [
                { "filename": "README.md", "status": "added", "additions": 10, "deletions": 0 },
                { "filename": "src/lib.rs", "status": "modified", "additions": 2, "deletions": 1 }
            ]
        }"#;

        let record: CommitRecord = serde_json::from_str(json).expect("Should deserialize");
        assert_eq!(record.files_changed(), 2);
    }

    #[test]
    fn formatting_preserves_message_author_and_date() {
        let record: CommitRecord = serde_json::from_str(LIST_ITEM).expect("Should deserialize");

        let formatted = FormattedCommit::from(&record);
        assert_eq!(formatted.files_changed, 0);

        let back = CommitRecord::from(formatted);
        assert_eq!(back.message(), record.message());
        assert_eq!(back.author_name(), record.author_name());
        assert_eq!(back.authored_at(), record.authored_at());
    }

    #[test]
    fn formatted_date_keeps_wire_format() {
        let record: CommitRecord = serde_json::from_str(LIST_ITEM).expect("Should deserialize");
        let json = serde_json::to_value(FormattedCommit::from(&record)).expect("Should serialize");

        assert_eq!(json["date"], "2011-04-14T16:00:49Z");
    }
}
