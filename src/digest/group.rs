use std::collections::BTreeMap;

use crate::models::{CommitRecord, DateGroupedCommits, FormattedCommit};

/// Group commits by the UTC calendar day of their author timestamp.
///
/// Days are ordered newest first. Within a day, commits keep the order
/// they had in `commits`.
pub fn group_by_date(commits: &[CommitRecord]) -> DateGroupedCommits {
    let mut groups: BTreeMap<String, Vec<FormattedCommit>> = BTreeMap::new();

    for commit in commits {
        let day = commit.authored_at().format("%Y-%m-%d").to_string();
        groups.entry(day).or_default().push(FormattedCommit::from(commit));
    }

    DateGroupedCommits::from_sorted(groups.into_iter().rev().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommitAuthor, CommitDetails};
    use chrono::{DateTime, Utc};

    fn commit(message: &str, date: &str) -> CommitRecord {
        CommitRecord {
            sha: message.to_string(),
            url: String::new(),
            commit: CommitDetails {
                message: message.to_string(),
                author: CommitAuthor {
                    name: "Ada".to_string(),
                    email: None,
                    date: date.parse::<DateTime<Utc>>().unwrap(),
                },
            },
            files: None,
        }
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_by_date(&[]).is_empty());
    }

    #[test]
    fn keeps_upstream_order_within_a_day() {
        let grouped = group_by_date(&[
            commit("third", "2024-05-02T18:00:00Z"),
            commit("second", "2024-05-02T12:00:00Z"),
            commit("first", "2024-05-02T06:00:00Z"),
        ]);

        let messages: Vec<_> = grouped
            .get("2024-05-02")
            .unwrap()
            .iter()
            .map(|c| c.message.as_str())
            .collect();
        assert_eq!(messages, ["third", "second", "first"]);
    }

    #[test]
    fn truncates_at_utc_midnight() {
        let grouped = group_by_date(&[
            commit("late", "2024-05-01T23:59:59Z"),
            commit("early", "2024-05-02T00:00:00Z"),
        ]);

        assert_eq!(grouped.dates().collect::<Vec<_>>(), ["2024-05-02", "2024-05-01"]);
    }
}
