//! Pure aggregation over fetched commits: grouping by day and window stats.

mod group;
mod stats;

pub use group::group_by_date;
pub use stats::compute_stats;
