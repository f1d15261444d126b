//! Duration and timestamp rules.
//!
//! - Durations (`std::time::Duration`, `chrono::TimeDelta`) read a
//!   `local_time` node as the time elapsed since midnight, at nanosecond
//!   resolution.
//! - Timestamps (`SystemTime`, `DateTime<Utc>`, `DateTime<Local>`) accept any
//!   of `local_date`, `local_datetime` or `offset_datetime`. Local values are
//!   interpreted in the system time zone; a bare date means local midnight.
//!   A local time that does not exist in that zone (skipped by a DST
//!   transition) is [`GetError::OutOfRange`]; an ambiguous one resolves to
//!   the earlier instant.

use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local, NaiveDateTime, TimeDelta, TimeZone, Timelike, Utc};

use crate::error::{GetError, Result};
use crate::get::{type_mismatch, FromValue, FromValueOwned};
use crate::value::{Value, ValueKind, ValueType};

const TIMESTAMP_SOURCES: &[ValueType] = &[
    ValueType::LocalDate,
    ValueType::LocalDateTime,
    ValueType::OffsetDateTime,
];

fn nanos_since_midnight(value: &Value) -> Result<u64> {
    match value.kind() {
        ValueKind::LocalTime(t) => {
            Ok(u64::from(t.num_seconds_from_midnight()) * 1_000_000_000 + u64::from(t.nanosecond()))
        }
        _ => Err(type_mismatch(&[ValueType::LocalTime], value)),
    }
}

fn local_instant(naive: NaiveDateTime, value: &Value) -> Result<DateTime<Utc>> {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| GetError::OutOfRange {
            target: "timestamp",
            value: naive.to_string(),
            location: value.location().cloned(),
        })
}

fn instant(value: &Value) -> Result<DateTime<Utc>> {
    match value.kind() {
        ValueKind::LocalDate(d) => local_instant(NaiveDateTime::from(*d), value),
        ValueKind::LocalDateTime(dt) => local_instant(*dt, value),
        ValueKind::OffsetDateTime(dt) => Ok(dt.with_timezone(&Utc)),
        _ => Err(type_mismatch(TIMESTAMP_SOURCES, value)),
    }
}

impl<'a> FromValue<'a> for Duration {
    fn from_value(value: &'a Value) -> Result<Self> {
        nanos_since_midnight(value).map(Duration::from_nanos)
    }
}

impl<'a> FromValue<'a> for TimeDelta {
    fn from_value(value: &'a Value) -> Result<Self> {
        // Below 86_401 seconds, well within i64 nanoseconds.
        nanos_since_midnight(value).map(|n| TimeDelta::nanoseconds(n as i64))
    }
}

impl<'a> FromValue<'a> for DateTime<Utc> {
    fn from_value(value: &'a Value) -> Result<Self> {
        instant(value)
    }
}

impl<'a> FromValue<'a> for DateTime<Local> {
    fn from_value(value: &'a Value) -> Result<Self> {
        instant(value).map(|dt| dt.with_timezone(&Local))
    }
}

impl<'a> FromValue<'a> for SystemTime {
    fn from_value(value: &'a Value) -> Result<Self> {
        instant(value).map(SystemTime::from)
    }
}

macro_rules! owned_via_borrow {
    ($($ty:ty),* $(,)?) => {
        $(
            impl FromValueOwned for $ty {
                fn from_value_owned(value: Value) -> Result<Self> {
                    Self::from_value(&value)
                }
            }
        )*
    };
}

owned_via_borrow!(Duration, TimeDelta, DateTime<Utc>, DateTime<Local>, SystemTime);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::get::get;
    use chrono::{FixedOffset, NaiveDate, NaiveTime};

    #[test]
    fn local_time_as_duration() {
        let t = NaiveTime::from_hms_nano_opt(7, 32, 5, 250).unwrap();
        let node = Value::from(t);
        assert_eq!(
            get::<Duration>(&node).unwrap(),
            Duration::new(7 * 3600 + 32 * 60 + 5, 250)
        );
        assert_eq!(
            get::<TimeDelta>(&node).unwrap(),
            TimeDelta::seconds(7 * 3600 + 32 * 60 + 5) + TimeDelta::nanoseconds(250)
        );
    }

    #[test]
    fn duration_requires_local_time() {
        let err = get::<Duration>(&Value::from(30)).unwrap_err();
        assert!(matches!(
            err,
            GetError::TypeMismatch {
                found: ValueType::Integer,
                ..
            }
        ));
    }

    #[test]
    fn offset_datetime_as_utc_and_system_time() {
        let odt = FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(1979, 5, 27, 9, 32, 0)
            .unwrap();
        let node = Value::from(odt);
        let utc: DateTime<Utc> = get(&node).unwrap();
        assert_eq!(utc, Utc.with_ymd_and_hms(1979, 5, 27, 0, 32, 0).unwrap());
        assert_eq!(get::<SystemTime>(&node).unwrap(), SystemTime::from(utc));
    }

    #[test]
    fn local_date_is_local_midnight() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let expected = Local
            .from_local_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
            .earliest()
            .unwrap();
        let got: DateTime<Local> = get(&Value::from(date)).unwrap();
        assert_eq!(got, expected);
    }

    #[test]
    fn local_datetime_is_read_in_the_system_zone() {
        let naive = NaiveDate::from_ymd_opt(1979, 5, 27)
            .unwrap()
            .and_hms_opt(7, 32, 0)
            .unwrap();
        let expected = Local.from_local_datetime(&naive).earliest().unwrap();
        let node = Value::from(naive);
        assert_eq!(get::<DateTime<Local>>(&node).unwrap(), expected);
        assert_eq!(
            get::<DateTime<Utc>>(&node).unwrap(),
            expected.with_timezone(&Utc)
        );
        assert_eq!(
            get::<SystemTime>(&node).unwrap(),
            SystemTime::from(expected.with_timezone(&Utc))
        );
        assert_eq!(
            crate::get::take::<DateTime<Utc>>(node).unwrap(),
            expected.with_timezone(&Utc)
        );
    }

    #[test]
    fn local_time_is_not_a_timestamp() {
        let node = Value::from(NaiveTime::from_hms_opt(1, 2, 3).unwrap());
        let err = get::<SystemTime>(&node).unwrap_err();
        match err {
            GetError::TypeMismatch { expected, found, .. } => {
                assert_eq!(expected, TIMESTAMP_SOURCES);
                assert_eq!(found, ValueType::LocalTime);
            }
            other => panic!("expected TypeMismatch, got {other:?}"),
        }
    }
}
