use serde::Serialize;

use crate::error::DataIntegrityError;
use crate::models::{InterviewRecord, InterviewStatus};

pub const ALL_CATEGORIES: &str = "All Types";
pub const ALL_STATUSES: &str = "All Status";

/// Choices offered by the interview type selector.
pub const CATEGORY_OPTIONS: [&str; 4] =
    [ALL_CATEGORIES, "Technical", "Behavioral", "System Design"];

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    /// Matches categories containing the selection, ignoring case, so
    /// "Technical" selects "Technical Interview".
    Only(String),
}

impl std::str::FromStr for CategoryFilter {
    type Err = std::convert::Infallible;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if value.is_empty()
            || value.eq_ignore_ascii_case(ALL_CATEGORIES)
            || value.eq_ignore_ascii_case("all")
        {
            Ok(CategoryFilter::All)
        } else {
            Ok(CategoryFilter::Only(value.to_string()))
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Only(InterviewStatus),
}

impl std::str::FromStr for StatusFilter {
    type Err = DataIntegrityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case(ALL_STATUSES)
            || trimmed.eq_ignore_ascii_case("all")
        {
            Ok(StatusFilter::All)
        } else {
            trimmed.parse().map(StatusFilter::Only)
        }
    }
}

/// One of the three independent interview predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Category(CategoryFilter),
    Status(StatusFilter),
    Search(String),
}

impl Predicate {
    pub fn matches(&self, record: &InterviewRecord) -> bool {
        match self {
            Predicate::Category(CategoryFilter::All) | Predicate::Status(StatusFilter::All) => true,
            Predicate::Category(CategoryFilter::Only(selection)) => {
                contains_ignore_case(&record.category, selection)
            }
            Predicate::Status(StatusFilter::Only(status)) => record.status == *status,
            Predicate::Search(text) => {
                let text = text.trim();
                text.is_empty()
                    || contains_ignore_case(&record.position, text)
                    || contains_ignore_case(&record.candidate, text)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct InterviewFilter {
    pub category: CategoryFilter,
    pub status: StatusFilter,
    pub search: String,
}

impl InterviewFilter {
    pub fn predicates(&self) -> [Predicate; 3] {
        [
            Predicate::Category(self.category.clone()),
            Predicate::Status(self.status),
            Predicate::Search(self.search.clone()),
        ]
    }

    pub fn is_active(&self) -> bool {
        self.category != CategoryFilter::All
            || self.status != StatusFilter::All
            || !self.search.trim().is_empty()
    }

    /// Keeps the records that satisfy every predicate, in their original order.
    pub fn apply<'a>(&self, records: &'a [InterviewRecord]) -> Vec<&'a InterviewRecord> {
        let predicates = self.predicates();
        records
            .iter()
            .filter(|record| predicates.iter().all(|predicate| predicate.matches(record)))
            .collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Snapshot;

    fn record(
        id: i64,
        position: &str,
        candidate: &str,
        category: &str,
        status: &str,
    ) -> InterviewRecord {
        let at = "2023-12-10T14:00:00";
        InterviewRecord::new(id, position, candidate, at, "1 hour", category, status).unwrap()
    }

    fn mixed() -> Vec<InterviewRecord> {
        vec![
            record(
                1,
                "Senior Frontend Developer",
                "Sarah Johnson",
                "Technical Interview",
                "scheduled",
            ),
            record(2, "Product Manager", "Michael Chen", "Behavioral", "completed"),
            record(3, "Backend Developer", "Priya Natarajan", "Technical Interview", "completed"),
            record(4, "UX Designer", "Emily Brown", "Portfolio Review", "cancelled"),
            record(5, "Platform Engineer", "Dev Rao", "System Design", "completed"),
            record(6, "Frontend Developer", "John Doe", "Technical Screen", "completed"),
        ]
    }

    fn ids(records: &[&InterviewRecord]) -> Vec<i64> {
        records.iter().map(|r| r.id).collect()
    }

    #[test]
    fn defaults_return_sample_list_unchanged() {
        let snapshot = Snapshot::sample().unwrap();
        let filter = InterviewFilter {
            category: ALL_CATEGORIES.parse().unwrap(),
            status: ALL_STATUSES.parse().unwrap(),
            search: String::new(),
        };
        let kept = filter.apply(&snapshot.interviews);
        assert_eq!(kept.len(), 3);
        assert_eq!(ids(&kept), vec![1, 2, 3]);
        assert!(!filter.is_active());
    }

    #[test]
    fn unmatched_search_yields_empty_list() {
        let filter = InterviewFilter {
            search: "zzz-nobody".to_string(),
            ..InterviewFilter::default()
        };
        assert!(filter.apply(&mixed()).is_empty());
    }

    #[test]
    fn predicates_commute_and_keep_order() {
        let records = mixed();
        let filter = InterviewFilter {
            category: "technical".parse().unwrap(),
            status: "Completed".parse().unwrap(),
            search: "developer".to_string(),
        };
        let [a, b, c] = filter.predicates();
        let orders = [
            [&a, &b, &c],
            [&a, &c, &b],
            [&b, &a, &c],
            [&b, &c, &a],
            [&c, &a, &b],
            [&c, &b, &a],
        ];

        let expected = ids(&filter.apply(&records));
        assert_eq!(expected, vec![3, 6]);

        for order in orders {
            let mut remaining: Vec<&InterviewRecord> = records.iter().collect();
            for predicate in order {
                remaining.retain(|record| predicate.matches(record));
            }
            assert_eq!(ids(&remaining), expected);
        }
    }

    #[test]
    fn search_covers_position_and_candidate() {
        let records = mixed();
        let by_candidate = InterviewFilter {
            search: "  emily ".to_string(),
            ..InterviewFilter::default()
        };
        assert_eq!(ids(&by_candidate.apply(&records)), vec![4]);

        let by_position = InterviewFilter {
            search: "Manager".to_string(),
            ..InterviewFilter::default()
        };
        assert_eq!(ids(&by_position.apply(&records)), vec![2]);
    }

    #[test]
    fn status_selection_rejects_unknown_values() {
        assert_eq!("All Status".parse::<StatusFilter>(), Ok(StatusFilter::All));
        assert_eq!(
            "Cancelled".parse::<StatusFilter>(),
            Ok(StatusFilter::Only(InterviewStatus::Cancelled))
        );
        assert_eq!(
            "archived".parse::<StatusFilter>(),
            Err(DataIntegrityError::UnknownStatus("archived".to_string()))
        );
    }
}
