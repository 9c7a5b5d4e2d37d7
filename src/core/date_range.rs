use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DateError;

/// Anything that can be resolved to a calendar day once a timezone is known.
///
/// - `Date`: a bare `YYYY-MM-DD`, taken as midnight UTC (so zones west of
///   UTC see the previous day)
/// - `Instant`: an absolute point in time
/// - `Local`: wall-clock time already expressed in the target zone
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DateLike {
    Date(NaiveDate),
    Instant(DateTime<Utc>),
    Local(NaiveDateTime),
}

impl DateLike {
    /// The calendar day this value falls on when viewed in `tz`.
    pub fn local_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        match self {
            Self::Date(date) => tz
                .from_utc_datetime(&date.and_time(NaiveTime::MIN))
                .date_naive(),
            Self::Instant(instant) => instant.with_timezone(tz).date_naive(),
            Self::Local(wall) => wall.date(),
        }
    }
}

impl From<NaiveDate> for DateLike {
    fn from(date: NaiveDate) -> Self {
        Self::Date(date)
    }
}

impl From<DateTime<Utc>> for DateLike {
    fn from(instant: DateTime<Utc>) -> Self {
        Self::Instant(instant)
    }
}

impl From<NaiveDateTime> for DateLike {
    fn from(wall: NaiveDateTime) -> Self {
        Self::Local(wall)
    }
}

impl FromStr for DateLike {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() == 10 {
            if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
                return Ok(Self::Date(date));
            }
        }
        if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
            return Ok(Self::Instant(instant.with_timezone(&Utc)));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(wall) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(Self::Local(wall));
            }
        }
        Err(DateError::Invalid(s.to_string()))
    }
}

impl TryFrom<String> for DateLike {
    type Error = DateError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DateLike> for String {
    fn from(value: DateLike) -> Self {
        value.to_string()
    }
}

impl fmt::Display for DateLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            Self::Instant(instant) => {
                write!(f, "{}", instant.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Self::Local(wall) => write!(f, "{}", wall.format("%Y-%m-%dT%H:%M:%S%.f")),
        }
    }
}

/// Canonical `YYYY-MM-DD` key for a calendar day.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Every calendar day from `start` to `end` inclusive, as seen in `tz`.
///
/// Empty when `start` falls on a later day than `end`.
pub fn dates_between<Tz: TimeZone>(start: &DateLike, end: &DateLike, tz: &Tz) -> Vec<NaiveDate> {
    let first = start.local_date(tz);
    let last = end.local_date(tz);
    first.iter_days().take_while(|day| *day <= last).collect()
}

pub fn date_strings_between<Tz: TimeZone>(
    start: &DateLike,
    end: &DateLike,
    tz: &Tz,
) -> Vec<String> {
    dates_between(start, end, tz)
        .into_iter()
        .map(date_key)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use proptest::prelude::*;

    fn date(s: &str) -> DateLike {
        s.parse().unwrap()
    }

    #[test]
    fn single_day_range() {
        let days = date_strings_between(&date("2024-01-05"), &date("2024-01-05"), &Utc);
        assert_eq!(days, vec!["2024-01-05"]);
    }

    #[test]
    fn range_crosses_month_and_leap_day() {
        let days = date_strings_between(&date("2024-02-28"), &date("2024-03-01"), &Utc);
        assert_eq!(days, vec!["2024-02-28", "2024-02-29", "2024-03-01"]);
    }

    #[test]
    fn reversed_range_is_empty() {
        assert!(dates_between(&date("2024-01-05"), &date("2024-01-04"), &Utc).is_empty());
    }

    #[test]
    fn bare_dates_shift_west_of_utc() {
        let tz = chrono_tz::America::New_York;
        let days = date_strings_between(&date("2024-01-05"), &date("2024-01-06"), &tz);
        assert_eq!(days, vec!["2024-01-04", "2024-01-05"]);
    }

    #[test]
    fn bare_dates_stay_put_east_of_utc() {
        let tz = chrono_tz::Europe::Berlin;
        let days = date_strings_between(&date("2024-01-05"), &date("2024-01-06"), &tz);
        assert_eq!(days, vec!["2024-01-05", "2024-01-06"]);
    }

    #[test]
    fn instants_use_the_given_zone() {
        let start = date("2024-03-10T23:30:00Z");
        let end = date("2024-03-11T01:00:00Z");
        assert_eq!(
            date_strings_between(&start, &end, &Utc),
            vec!["2024-03-10", "2024-03-11"]
        );
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert_eq!(date_strings_between(&start, &end, &tokyo), vec!["2024-03-11"]);
    }

    #[test]
    fn local_wall_time_ignores_zone() {
        let tz = chrono_tz::America::Los_Angeles;
        let start = date("2024-06-01T22:00:00");
        let end = date("2024-06-02 07:15:00");
        assert!(matches!(start, DateLike::Local(_)));
        assert_eq!(date_strings_between(&start, &end, &tz), vec!["2024-06-01", "2024-06-02"]);
    }

    #[test]
    fn malformed_dates_are_rejected() {
        for bad in ["", "2024-13-01", "2024-02-30", "yesterday", "05/01/2024"] {
            assert_eq!(
                bad.parse::<DateLike>(),
                Err(DateError::Invalid(bad.to_string())),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn serde_uses_the_same_parser() {
        let parsed: DateLike = serde_json::from_str("\"2024-01-05\"").unwrap();
        assert_eq!(parsed, date("2024-01-05"));
        assert!(serde_json::from_str::<DateLike>("\"Invalid Date\"").is_err());
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"2024-01-05\"");
    }

    proptest! {
        #[test]
        fn inclusive_range_has_both_endpoints(start in 0i64..40_000, len in 0i64..400) {
            let base = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
            let a = base + chrono::Duration::days(start);
            let b = a + chrono::Duration::days(len);
            let days = date_strings_between(&a.into(), &b.into(), &Utc);
            prop_assert_eq!(days.len() as i64, len + 1);
            prop_assert_eq!(days.first().cloned(), Some(date_key(a)));
            prop_assert_eq!(days.last().cloned(), Some(date_key(b)));
        }
    }
}
