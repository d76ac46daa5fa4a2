use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::models::{CommitRecord, DateRange, SummaryStats};

/// Totals for a commit window. `since` and `now` bound the reported
/// date range; they are not used to filter `commits`.
pub fn compute_stats(
    commits: &[CommitRecord],
    since: DateTime<Utc>,
    now: DateTime<Utc>,
) -> SummaryStats {
    let authors: HashSet<&str> = commits.iter().map(CommitRecord::author_name).collect();

    SummaryStats {
        total_commits: commits.len(),
        unique_authors: authors.len(),
        date_range: DateRange {
            from: since.date_naive(),
            to: now.date_naive(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CommitAuthor, CommitDetails};
    use chrono::{NaiveDate, TimeZone};

    fn by(author: &str) -> CommitRecord {
        CommitRecord {
            sha: String::new(),
            url: String::new(),
            commit: CommitDetails {
                message: "change".to_string(),
                author: CommitAuthor {
                    name: author.to_string(),
                    email: None,
                    date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
                },
            },
            files: None,
        }
    }

    #[test]
    fn counts_distinct_author_names() {
        let commits = [by("Ada"), by("Grace"), by("Ada"), by("ada")];
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap();

        let stats = compute_stats(&commits, now - chrono::Duration::days(7), now);

        assert_eq!(stats.total_commits, 4);
        assert_eq!(stats.unique_authors, 3);
        assert_eq!(stats.date_range.from, NaiveDate::from_ymd_opt(2024, 4, 25).unwrap());
        assert_eq!(stats.date_range.to, NaiveDate::from_ymd_opt(2024, 5, 2).unwrap());
    }

    #[test]
    fn empty_window_has_zero_counts() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 0, 0, 0).unwrap();
        let stats = compute_stats(&[], now, now);

        assert_eq!(stats.total_commits, 0);
        assert_eq!(stats.unique_authors, 0);
        assert_eq!(stats.date_range.from, stats.date_range.to);
    }
}
