use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::item::{ItemId, ItemKind, ScheduledItem};

/// The slice of a scheduled item an agenda row needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketEntry {
    pub id: ItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recurrence_index: Option<u32>,
    pub title: String,
    #[serde(flatten)]
    pub kind: ItemKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<DateTime<Utc>>,
    pub is_complete: bool,
}

impl From<&ScheduledItem> for BucketEntry {
    fn from(item: &ScheduledItem) -> Self {
        Self {
            id: item.id,
            recurrence_index: item.recurrence_index,
            title: item.title.clone(),
            kind: item.kind.clone(),
            start_datetime: item.schedule.start_datetime(),
            end_datetime: item.schedule.end_datetime(),
            is_complete: item.is_complete,
        }
    }
}

impl BucketEntry {
    /// Insertion rule: an untimed entry goes before the first timed entry;
    /// a timed entry goes before the first later-starting timed entry.
    /// Ties keep arrival order.
    fn sorts_before(&self, existing: &BucketEntry) -> bool {
        match (self.start_datetime, existing.start_datetime) {
            (Some(new), Some(old)) => new < old,
            (None, Some(_)) => true,
            (Some(_), None) | (None, None) => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySection {
    pub date: NaiveDate,
    pub entries: Vec<BucketEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthSection {
    pub year: i32,
    pub month: u32,
    pub days: Vec<DaySection>,
}

/// Scheduled items grouped by calendar day, each day in start-time order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateBuckets {
    days: BTreeMap<NaiveDate, Vec<BucketEntry>>,
}

impl DateBuckets {
    pub fn get(&self, date: NaiveDate) -> Option<&[BucketEntry]> {
        self.days.get(&date).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &Vec<BucketEntry>)> {
        self.days.iter()
    }

    /// Number of days with at least one entry.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn total_entries(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    fn insert(&mut self, date: NaiveDate, entry: BucketEntry) {
        let bucket = self.days.entry(date).or_default();
        let at = bucket
            .iter()
            .position(|existing| entry.sorts_before(existing))
            .unwrap_or(bucket.len());
        bucket.insert(at, entry);
    }

    /// Days grouped by month, oldest first, for section-list rendering.
    pub fn month_sections(&self) -> Vec<MonthSection> {
        let mut sections: Vec<MonthSection> = Vec::new();
        for (date, entries) in &self.days {
            let day = DaySection {
                date: *date,
                entries: entries.clone(),
            };
            match sections.last_mut() {
                Some(s) if s.year == date.year() && s.month == date.month() => s.days.push(day),
                _ => sections.push(MonthSection {
                    year: date.year(),
                    month: date.month(),
                    days: vec![day],
                }),
            }
        }
        sections
    }
}

/// Group items under every calendar day they occupy in `tz`.
pub fn bucket_by_date<'a, Tz: TimeZone>(
    items: impl IntoIterator<Item = &'a ScheduledItem>,
    tz: &Tz,
) -> DateBuckets {
    let mut buckets = DateBuckets::default();
    for item in items {
        let entry = BucketEntry::from(item);
        for date in item.schedule.occupied_dates(tz) {
            buckets.insert(date, entry.clone());
        }
    }
    buckets
}
