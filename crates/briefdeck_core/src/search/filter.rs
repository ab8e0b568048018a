//! In-memory brief filtering.
//!
//! # Responsibility
//! - Project a brief list onto the subset matching a text query and a status
//!   selector.
//!
//! # Invariants
//! - Output is a subsequence of the input; order is preserved.
//! - Matching is a case-insensitive substring test over title, description
//!   and each tag, with the query taken verbatim. An empty query matches
//!   every brief.
//! - Filtering never touches persistence.

use crate::model::brief::{Brief, BriefStatus};
use std::fmt::{Display, Formatter};

const STATUS_ALL: &str = "all";

/// Status selector: every status, or exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(BriefStatus),
}

impl StatusFilter {
    /// Parses `all` or a status wire value.
    pub fn parse(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(STATUS_ALL) {
            Self::All
        } else {
            Self::Only(BriefStatus::parse(trimmed))
        }
    }

    pub fn matches(&self, status: &BriefStatus) -> bool {
        match self {
            Self::All => true,
            Self::Only(expected) => expected == status,
        }
    }
}

impl Display for StatusFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str(STATUS_ALL),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

/// Active search criteria.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BriefFilter {
    pub query: String,
    pub status: StatusFilter,
}

impl BriefFilter {
    pub fn new(query: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            query: query.into(),
            status,
        }
    }

    /// Returns whether one brief passes both criteria.
    pub fn matches(&self, brief: &Brief) -> bool {
        if !self.status.matches(&brief.status) {
            return false;
        }

        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();

        brief.title.to_lowercase().contains(&needle)
            || brief.description.to_lowercase().contains(&needle)
            || brief
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(&needle))
    }
}

/// Returns the briefs matching `filter`, in input order.
pub fn filter_briefs(briefs: &[Brief], filter: &BriefFilter) -> Vec<Brief> {
    briefs
        .iter()
        .filter(|brief| filter.matches(brief))
        .cloned()
        .collect()
}

/// Per-status totals for dashboard counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub total: usize,
    pub idea: usize,
    pub in_progress: usize,
    pub completed: usize,
    /// Briefs carrying a status outside the known three.
    pub other: usize,
}

impl StatusCounts {
    pub fn tally(briefs: &[Brief]) -> Self {
        briefs.iter().fold(Self::default(), |mut counts, brief| {
            counts.total += 1;
            match brief.status {
                BriefStatus::Idea => counts.idea += 1,
                BriefStatus::InProgress => counts.in_progress += 1,
                BriefStatus::Completed => counts.completed += 1,
                BriefStatus::Other(_) => counts.other += 1,
            }
            counts
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{BriefFilter, StatusFilter};
    use crate::model::brief::{Brief, BriefInput, BriefStatus};

    fn brief(title: &str, description: &str, tags: &[&str], status: BriefStatus) -> Brief {
        Brief::build(
            title.into(),
            BriefInput {
                title: Some(title.to_string()),
                description: Some(description.to_string()),
                tags: Some(tags.iter().map(|t| t.to_string()).collect()),
                status: Some(status),
                ..BriefInput::default()
            },
        )
    }

    #[test]
    fn status_filter_parse_accepts_all_in_any_case() {
        assert_eq!(StatusFilter::parse("ALL"), StatusFilter::All);
        assert_eq!(StatusFilter::parse(""), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("completed"),
            StatusFilter::Only(BriefStatus::Completed)
        );
    }

    #[test]
    fn query_matches_description_and_partial_tag() {
        let target = brief("Poster", "Summer FESTIVAL lineup", &["print"], BriefStatus::Idea);
        assert!(BriefFilter::new("festival", StatusFilter::All).matches(&target));
        assert!(BriefFilter::new("PRI", StatusFilter::All).matches(&target));
        assert!(!BriefFilter::new("web", StatusFilter::All).matches(&target));
    }

    #[test]
    fn query_is_matched_verbatim_including_whitespace() {
        let target = brief("Poster", "", &["print"], BriefStatus::Idea);
        assert!(BriefFilter::new("", StatusFilter::All).matches(&target));
        assert!(!BriefFilter::new(" print ", StatusFilter::All).matches(&target));
        assert!(BriefFilter::new("Post", StatusFilter::All).matches(&target));
    }

    #[test]
    fn status_must_match_even_with_blank_query() {
        let target = brief("Poster", "", &[], BriefStatus::InProgress);
        let filter = BriefFilter::new("  ", StatusFilter::Only(BriefStatus::Idea));
        assert!(!filter.matches(&target));
    }
}
