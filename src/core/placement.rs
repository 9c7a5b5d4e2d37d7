use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

use super::date_range::{DateLike, dates_between};
use super::item::ItemId;

/// Color drawn for the filler entries that keep row indices aligned across dates.
pub const TRANSPARENT: &str = "transparent";

/// A date-ranged band to lay out on the calendar grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSpan {
    pub id: ItemId,
    pub start: DateLike,
    pub end: DateLike,
    #[serde(default)]
    pub color: Option<String>,
}

impl PeriodSpan {
    pub fn new(id: ItemId, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            id,
            start: start_date.into(),
            end: end_date.into(),
            color: None,
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// One row slot on one date: part of a period, or a placeholder with no id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedEntry {
    pub starting_day: bool,
    pub ending_day: bool,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ItemId>,
}

impl PlacedEntry {
    pub fn placeholder() -> Self {
        Self {
            starting_day: false,
            ending_day: false,
            color: TRANSPARENT.to_string(),
            id: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayPeriods {
    pub periods: Vec<PlacedEntry>,
}

impl DayPeriods {
    fn is_occupied(&self, row: usize) -> bool {
        self.periods.get(row).is_some_and(|e| !e.is_placeholder())
    }
}

/// A placed period entry flattened with its coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedInterval {
    pub date: NaiveDate,
    pub row: usize,
    pub starting_day: bool,
    pub ending_day: bool,
    pub color: String,
    pub id: Option<ItemId>,
}

/// Per-date row layout of overlapping periods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlacedPeriods {
    dates: BTreeMap<NaiveDate, DayPeriods>,
}

impl PlacedPeriods {
    pub fn get(&self, date: NaiveDate) -> Option<&DayPeriods> {
        self.dates.get(&date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayPeriods)> {
        self.dates.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Rows in use on `date`, placeholders included.
    pub fn row_count(&self, date: NaiveDate) -> usize {
        self.get(date).map_or(0, |day| day.periods.len())
    }

    pub fn max_rows(&self) -> usize {
        self.dates.values().map(|day| day.periods.len()).max().unwrap_or(0)
    }

    /// Every real (non-placeholder) entry with its date and row.
    pub fn placements(&self) -> impl Iterator<Item = PlacedInterval> + '_ {
        self.dates.iter().flat_map(|(date, day)| {
            day.periods
                .iter()
                .enumerate()
                .filter(|(_, entry)| !entry.is_placeholder())
                .map(move |(row, entry)| PlacedInterval {
                    date: *date,
                    row,
                    starting_day: entry.starting_day,
                    ending_day: entry.ending_day,
                    color: entry.color.clone(),
                    id: entry.id,
                })
        })
    }

    /// Lowest row free on every one of `dates`.
    fn free_row(&self, dates: &[NaiveDate]) -> usize {
        let mut row = 0;
        while dates
            .iter()
            .any(|date| self.get(*date).is_some_and(|day| day.is_occupied(row)))
        {
            row += 1;
        }
        row
    }

    fn with_period(mut self, dates: &[NaiveDate], id: ItemId, color: &str) -> Self {
        let row = self.free_row(dates);
        let last = dates.len().saturating_sub(1);
        for (i, date) in dates.iter().enumerate() {
            let day = self.dates.entry(*date).or_default();
            while day.periods.len() < row {
                day.periods.push(PlacedEntry::placeholder());
            }
            let entry = PlacedEntry {
                starting_day: i == 0,
                ending_day: i == last,
                color: color.to_string(),
                id: Some(id),
            };
            if day.periods.len() == row {
                day.periods.push(entry);
            } else {
                day.periods[row] = entry;
            }
        }
        self
    }
}

/// Lay periods out in rows so that no two periods sharing a date share a row.
///
/// Each period keeps one row across its whole span. Periods are placed in
/// input order, each taking the lowest row that is free on all of its dates.
pub fn place_overlapping_periods<Tz: TimeZone>(
    periods: &[PeriodSpan],
    default_color: &str,
    tz: &Tz,
) -> PlacedPeriods {
    periods.iter().fold(PlacedPeriods::default(), |placed, period| {
        let dates = dates_between(&period.start, &period.end, tz);
        if dates.is_empty() {
            log::debug!("Skipping period {} ending before it starts", period.id);
            return placed;
        }
        let color = period.color.as_deref().unwrap_or(default_color);
        placed.with_period(&dates, period.id, color)
    })
}
