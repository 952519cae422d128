//! Ordering and grouping of seminar lists for display.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

use crate::error::DeskError;
use crate::model::Seminar;
use crate::schedule::Semester;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    #[default]
    Date,
    Title,
    Speaker,
    CreatedAt,
    Duration,
    Capacity,
    Year,
    Semester,
}

impl SortField {
    pub const ALL: [SortField; 8] = [
        SortField::Date,
        SortField::Title,
        SortField::Speaker,
        SortField::CreatedAt,
        SortField::Duration,
        SortField::Capacity,
        SortField::Year,
        SortField::Semester,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Date => "date",
            SortField::Title => "title",
            SortField::Speaker => "speaker",
            SortField::CreatedAt => "created_at",
            SortField::Duration => "duration",
            SortField::Capacity => "capacity",
            SortField::Year => "year",
            SortField::Semester => "semester",
        }
    }

    fn compare(self, a: &Seminar, b: &Seminar) -> Ordering {
        match self {
            SortField::Date => a.timestamp().cmp(&b.timestamp()),
            SortField::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
            SortField::Speaker => lowercase(&a.speaker).cmp(&lowercase(&b.speaker)),
            SortField::CreatedAt => created_millis(a).cmp(&created_millis(b)),
            SortField::Duration => a.duration.unwrap_or(0).cmp(&b.duration.unwrap_or(0)),
            SortField::Capacity => a.capacity.unwrap_or(0).cmp(&b.capacity.unwrap_or(0)),
            SortField::Year => dated_year(a).cmp(&dated_year(b)),
            SortField::Semester => a.derived_semester().cmp(&b.derived_semester()),
        }
    }
}

impl FromStr for SortField {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        SortField::ALL
            .into_iter()
            .find(|field| field.as_str() == wanted)
            .ok_or_else(|| DeskError::Validation(format!("Unknown sort field: {s}")))
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortOrder {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(DeskError::Validation(format!("Unknown sort order: {s}"))),
        }
    }
}

fn lowercase(value: &Option<String>) -> String {
    value.as_deref().unwrap_or_default().to_lowercase()
}

fn created_millis(seminar: &Seminar) -> i64 {
    seminar.created_at.map(|dt| dt.timestamp_millis()).unwrap_or(0)
}

// Undated seminars sort as year 0 here, unlike grouping which files them under 1970.
fn dated_year(seminar: &Seminar) -> i32 {
    seminar.schedule_date().map(|d| d.year()).unwrap_or(0)
}

/// Stable sort by a single field.
pub fn sort_seminars(seminars: &[Seminar], field: SortField, order: SortOrder) -> Vec<Seminar> {
    let mut sorted = seminars.to_vec();
    sorted.sort_by(|a, b| order.apply(field.compare(a, b)));
    sorted
}

/// Sort by year, then semester, then full timestamp, all in one direction.
pub fn sort_seminars_by_year_semester_date(seminars: &[Seminar], order: SortOrder) -> Vec<Seminar> {
    let mut sorted = seminars.to_vec();
    sorted.sort_by(|a, b| {
        let ordering = a
            .year()
            .cmp(&b.year())
            .then_with(|| a.derived_semester().cmp(&b.derived_semester()))
            .then_with(|| a.timestamp().cmp(&b.timestamp()));
        order.apply(ordering)
    });
    sorted
}

pub type GroupedSeminars = BTreeMap<i32, BTreeMap<Semester, Vec<Seminar>>>;

/// Group by year and semester. Every year present gets both semesters, and
/// each group is ordered newest first.
pub fn group_seminars_by_year_semester(seminars: &[Seminar]) -> GroupedSeminars {
    let mut grouped = GroupedSeminars::new();

    for seminar in seminars {
        grouped
            .entry(seminar.year())
            .or_insert_with(|| {
                BTreeMap::from([(Semester::First, Vec::new()), (Semester::Second, Vec::new())])
            })
            .entry(seminar.derived_semester())
            .or_default()
            .push(seminar.clone());
    }

    for semesters in grouped.values_mut() {
        for list in semesters.values_mut() {
            list.sort_by_key(|s| std::cmp::Reverse(s.timestamp()));
        }
    }

    grouped
}
