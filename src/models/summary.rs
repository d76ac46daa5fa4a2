use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::FormattedCommit;

/// Commits grouped by calendar day (`YYYY-MM-DD`), most recent day first.
///
/// Serializes as a JSON object whose keys appear in that order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DateGroupedCommits {
    groups: Vec<(String, Vec<FormattedCommit>)>,
}

impl DateGroupedCommits {
    /// Build from groups already sorted by descending date.
    pub(crate) fn from_sorted(groups: Vec<(String, Vec<FormattedCommit>)>) -> Self {
        Self { groups }
    }

    pub fn dates(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|(date, _)| date.as_str())
    }

    pub fn get(&self, date: &str) -> Option<&[FormattedCommit]> {
        self.groups
            .iter()
            .find(|(key, _)| key == date)
            .map(|(_, commits)| commits.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[FormattedCommit])> {
        self.groups
            .iter()
            .map(|(date, commits)| (date.as_str(), commits.as_slice()))
    }

    /// Number of distinct days.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of commits across all days.
    pub fn commit_count(&self) -> usize {
        self.groups.iter().map(|(_, commits)| commits.len()).sum()
    }
}

impl Serialize for DateGroupedCommits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.groups.len()))?;
        for (date, commits) in &self.groups {
            map.serialize_entry(date, commits)?;
        }
        map.end()
    }
}

/// Aggregate counts over the commit window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_commits: usize,
    pub unique_authors: usize,
    pub date_range: DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Structured response of detailed mode.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedSummary {
    pub summary_stats: SummaryStats,
    pub commits_by_date: DateGroupedCommits,
    /// Commits whose detail fetch failed and are missing from `commits_by_date`.
    pub dropped_commits: usize,
}

/// Flat response of direct mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectSummary {
    pub summary: String,
    pub commit_count: usize,
}

/// The two response shapes of `POST /summarize`. Which one is produced
/// depends on the configured [`DigestMode`](crate::config::DigestMode).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum SummaryResult {
    Detailed(DetailedSummary),
    Direct(DirectSummary),
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn commit(message: &str) -> FormattedCommit {
        FormattedCommit {
            message: message.to_string(),
            author: "Ada".to_string(),
            date: Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap(),
            files_changed: 1,
        }
    }

    #[test]
    fn serializes_groups_in_stored_order() {
        let grouped = DateGroupedCommits::from_sorted(vec![
            ("2024-05-02".to_string(), vec![commit("b")]),
            ("2024-05-01".to_string(), vec![commit("a")]),
        ]);

        let json = serde_json::to_string(&grouped).expect("Should serialize");
        let newer = json.find("2024-05-02").expect("newer key present");
        let older = json.find("2024-05-01").expect("older key present");
        assert!(newer < older);
    }

    #[test]
    fn direct_summary_serializes_flat() {
        let result = SummaryResult::Direct(DirectSummary {
            summary: "text".to_string(),
            commit_count: 2,
        });

        let json = serde_json::to_value(&result).expect("Should serialize");
        assert_eq!(json, serde_json::json!({ "summary": "text", "commit_count": 2 }));
    }

    #[test]
    fn date_range_serializes_as_calendar_dates() {
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 4, 25).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
        };

        let json = serde_json::to_value(&range).expect("Should serialize");
        assert_eq!(json, serde_json::json!({ "from": "2024-04-25", "to": "2024-05-02" }));
    }
}
