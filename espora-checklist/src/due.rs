//! Due-date categorization for the task dashboard.
//!
//! Weeks run Sunday to Saturday. Relative to a reference day `today`:
//!
//! ```text
//!   past  │ today │ this-week ... Sat │ next-week Sun ... Sat │ later
//! ────────┼───────┼───────────────────┼───────────────────────┼──────→
//! ```
//!
//! An assignment without a due date is `no-date`.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate};
use espora_core::{DueCategory, DueFilter, TaskAssignment};
use std::collections::BTreeMap;

/// Parse a stored due date. Accepts `YYYY-MM-DD`, RFC 3339 timestamps and
/// any string starting with a `YYYY-MM-DD` date.
pub fn parse_due_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.date_naive());
    }
    raw.get(..10)
        .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
}

/// Current calendar day in the local timezone.
pub fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Week boundaries around a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub today: NaiveDate,
    /// Saturday of the current week (may equal `today`).
    pub end_of_week: NaiveDate,
    /// Saturday of the following week.
    pub end_of_next_week: NaiveDate,
}

impl WeekWindow {
    pub fn containing(today: NaiveDate) -> Self {
        let days_left = 6 - u64::from(today.weekday().num_days_from_sunday());
        let end_of_week = today + Days::new(days_left);
        Self {
            today,
            end_of_week,
            end_of_next_week: end_of_week + Days::new(7),
        }
    }

    pub fn classify(&self, due: NaiveDate) -> DueCategory {
        if due < self.today {
            DueCategory::Past
        } else if due == self.today {
            DueCategory::Today
        } else if due <= self.end_of_week {
            DueCategory::ThisWeek
        } else if due <= self.end_of_next_week {
            DueCategory::NextWeek
        } else {
            DueCategory::Later
        }
    }
}

/// Bucket of a raw due date relative to `reference`.
///
/// Empty dates are `no-date`; so are dates that cannot be parsed.
pub fn classify_date(due_date: &str, reference: NaiveDate) -> DueCategory {
    if due_date.trim().is_empty() {
        return DueCategory::NoDate;
    }
    match parse_due_date(due_date) {
        Some(due) => WeekWindow::containing(reference).classify(due),
        None => {
            tracing::debug!(due_date, "Unparseable due date, treating as no-date");
            DueCategory::NoDate
        }
    }
}

/// Bucket of an assignment relative to `reference`.
pub fn classify(assignment: &TaskAssignment, reference: NaiveDate) -> DueCategory {
    classify_date(&assignment.due_date, reference)
}

/// Per-category counts of `assignments` relative to `reference`.
pub fn counts(assignments: &[TaskAssignment], reference: NaiveDate) -> CategoryCounts {
    TaskBoard::new(assignments, reference).counts()
}

/// Per-category assignment counts for dashboard badges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    by_category: BTreeMap<DueCategory, usize>,
    total: usize,
}

impl CategoryCounts {
    pub fn tally(categories: impl IntoIterator<Item = DueCategory>) -> Self {
        let mut counts = Self::default();
        for category in categories {
            *counts.by_category.entry(category).or_insert(0) += 1;
            counts.total += 1;
        }
        counts
    }

    /// Count for a filter; `All` is the total.
    pub fn get(&self, filter: DueFilter) -> usize {
        match filter {
            DueFilter::All => self.total,
            DueFilter::Only(category) => self.by_category.get(&category).copied().unwrap_or(0),
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Every category with its count, zeros included, in dashboard order.
    pub fn iter(&self) -> impl Iterator<Item = (DueCategory, usize)> + '_ {
        DueCategory::ALL
            .into_iter()
            .map(move |category| (category, self.get(DueFilter::Only(category))))
    }
}

/// Assignments categorized against one reference day.
#[derive(Debug, Clone)]
pub struct TaskBoard<'a> {
    entries: Vec<(DueCategory, &'a TaskAssignment)>,
}

impl<'a> TaskBoard<'a> {
    pub fn new(assignments: &'a [TaskAssignment], reference: NaiveDate) -> Self {
        let window = WeekWindow::containing(reference);
        let entries = assignments
            .iter()
            .map(|a| {
                let category = match parse_due_date(&a.due_date) {
                    Some(due) => window.classify(due),
                    None => DueCategory::NoDate,
                };
                (category, a)
            })
            .collect();
        Self { entries }
    }

    /// Assignments matching `filter`, in list order.
    pub fn filter(&self, filter: DueFilter) -> Vec<&'a TaskAssignment> {
        self.entries
            .iter()
            .filter(|(category, _)| filter.matches(*category))
            .map(|(_, a)| *a)
            .collect()
    }

    pub fn counts(&self) -> CategoryCounts {
        CategoryCounts::tally(self.entries.iter().map(|(category, _)| *category))
    }

    pub fn category_of(&self, assignment: &TaskAssignment) -> Option<DueCategory> {
        self.entries
            .iter()
            .find(|(_, a)| a.item_id == assignment.item_id)
            .map(|(category, _)| *category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use espora_core::{ItemId, SectionId, UserId};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn assignment(id: &str, due: &str) -> TaskAssignment {
        TaskAssignment {
            item_id: ItemId::from(id),
            user_id: UserId::from("U1"),
            concept: String::new(),
            section: String::new(),
            section_id: SectionId::from("estrategia"),
            due_date: due.to_string(),
            completed: false,
        }
    }

    // 2025-06-11 is a Wednesday.
    const WED: &str = "2025-06-11";

    #[test]
    fn test_week_window_from_wednesday() {
        let window = WeekWindow::containing(date(WED));
        assert_eq!(window.end_of_week, date("2025-06-14"));
        assert_eq!(window.end_of_next_week, date("2025-06-21"));
    }

    #[test]
    fn test_week_window_on_saturday_and_sunday() {
        let sat = WeekWindow::containing(date("2025-06-14"));
        assert_eq!(sat.end_of_week, date("2025-06-14"));
        let sun = WeekWindow::containing(date("2025-06-15"));
        assert_eq!(sun.end_of_week, date("2025-06-21"));
    }

    #[test]
    fn test_classify_boundaries() {
        let reference = date(WED);
        assert_eq!(classify_date("2025-06-10", reference), DueCategory::Past);
        assert_eq!(classify_date(WED, reference), DueCategory::Today);
        assert_eq!(classify_date("2025-06-12", reference), DueCategory::ThisWeek);
        assert_eq!(classify_date("2025-06-14", reference), DueCategory::ThisWeek);
        assert_eq!(classify_date("2025-06-15", reference), DueCategory::NextWeek);
        assert_eq!(classify_date("2025-06-21", reference), DueCategory::NextWeek);
        assert_eq!(classify_date("2025-06-22", reference), DueCategory::Later);
        assert_eq!(classify_date("", reference), DueCategory::NoDate);
        assert_eq!(classify_date("   ", reference), DueCategory::NoDate);
        assert_eq!(classify_date("someday", reference), DueCategory::NoDate);
    }

    #[test]
    fn test_saturday_tomorrow_is_next_week() {
        let reference = date("2025-06-14");
        assert_eq!(classify_date("2025-06-15", reference), DueCategory::NextWeek);
    }

    #[test]
    fn test_parse_accepts_timestamps() {
        assert_eq!(parse_due_date("2025-06-11T23:30:00Z"), Some(date(WED)));
        assert_eq!(parse_due_date("2025-06-11T08:00"), Some(date(WED)));
        assert_eq!(parse_due_date("11/06/2025"), None);
    }

    #[test]
    fn test_board_filter_and_counts() {
        let list = vec![
            assignment("A", "2025-06-01"),
            assignment("B", WED),
            assignment("C", "2025-06-13"),
            assignment("D", ""),
            assignment("E", "2026-01-01"),
            assignment("F", WED),
        ];
        let board = TaskBoard::new(&list, date(WED));

        let today: Vec<&str> = board
            .filter(DueFilter::Only(DueCategory::Today))
            .iter()
            .map(|a| a.item_id.as_str())
            .collect();
        assert_eq!(today, vec!["B", "F"]);
        assert_eq!(board.filter(DueFilter::All).len(), 6);

        let counts = board.counts();
        assert_eq!(counts.total(), 6);
        assert_eq!(counts.get(DueFilter::All), 6);
        assert_eq!(counts.get(DueFilter::Only(DueCategory::Today)), 2);
        assert_eq!(counts.get(DueFilter::Only(DueCategory::NextWeek)), 0);
        assert_eq!(counts.iter().count(), DueCategory::ALL.len());
        assert_eq!(board.category_of(&list[3]), Some(DueCategory::NoDate));
        assert_eq!(super::counts(&list, date(WED)), counts);
    }
}
