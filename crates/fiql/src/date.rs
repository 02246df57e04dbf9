//! Date/time literal parsing.
//!
//! A date literal carries a format prefix, matched case-insensitively:
//!
//! | Prefix | Format | Example |
//! |--------|--------|---------|
//! | `L` | epoch milliseconds | `L1577836800000` |
//! | `DTZ` | date, time and zone | `DTZ2020-01-01T12:30:00+0100` |
//! | `DT` | date and time | `DT2020-01-01 12:30:00` |
//! | `D` | date (midnight) | `D2020-01-01` |
//! | `T` | time on 1970-01-01 | `T12:30:00` |
//!
//! Zone-less formats are interpreted in the caller-supplied offset.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{FiqlError, Result};
use crate::value::Timestamp;

#[derive(Debug, Clone, Copy)]
enum DateFormat {
    Zoned(&'static str),
    DateTime(&'static str),
    Date(&'static str),
    Time(&'static str),
}

/// Recognized prefixes, longest first so `D` never shadows `DT` or `DTZ`.
const FORMATS: &[(&str, DateFormat)] = &[
    ("DTZ", DateFormat::Zoned("%Y-%m-%dT%H:%M:%S%z")),
    ("DT", DateFormat::DateTime("%Y-%m-%d %H:%M:%S")),
    ("D", DateFormat::Date("%Y-%m-%d")),
    ("T", DateFormat::Time("%H:%M:%S")),
];

/// Parses a prefixed date literal into a timestamp.
pub fn parse(literal: &str, offset: FixedOffset) -> Result<Timestamp> {
    let upper = literal.to_uppercase();

    if let Some(millis) = upper.strip_prefix('L') {
        return millis
            .parse::<i64>()
            .map(Timestamp::from_millis)
            .map_err(|source| FiqlError::InvalidEpochMillis {
                literal: literal.to_string(),
                source,
            });
    }

    let (rest, format) = FORMATS
        .iter()
        .find_map(|(prefix, format)| upper.strip_prefix(prefix).map(|rest| (rest, *format)))
        .ok_or_else(|| FiqlError::MissingDateFormat {
            literal: literal.to_string(),
        })?;

    let invalid = |source| FiqlError::InvalidDate {
        literal: literal.to_string(),
        source,
    };

    let naive = match format {
        DateFormat::Zoned(fmt) => {
            let dt = DateTime::parse_from_str(rest, fmt).map_err(invalid)?;
            return Ok(Timestamp::from(dt));
        }
        DateFormat::DateTime(fmt) => NaiveDateTime::parse_from_str(rest, fmt).map_err(invalid)?,
        DateFormat::Date(fmt) => NaiveDate::parse_from_str(rest, fmt)
            .map_err(invalid)?
            .and_time(NaiveTime::MIN),
        DateFormat::Time(fmt) => {
            NaiveDate::default().and_time(NaiveTime::parse_from_str(rest, fmt).map_err(invalid)?)
        }
    };

    Ok(Timestamp::from_millis(local_millis(naive, offset)))
}

fn local_millis(naive: NaiveDateTime, offset: FixedOffset) -> i64 {
    naive.and_utc().timestamp_millis() - i64::from(offset.local_minus_utc()) * 1000
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Offset;

    const NEW_YEAR_2020: i64 = 1_577_836_800_000;

    fn utc() -> FixedOffset {
        chrono::Utc.fix()
    }

    #[test]
    fn date_only_is_midnight() {
        assert_eq!(parse("D2020-01-01", utc()).unwrap(), Timestamp(NEW_YEAR_2020));
    }

    #[test]
    fn prefixes_are_case_insensitive() {
        assert_eq!(parse("d2020-01-01", utc()).unwrap(), Timestamp(NEW_YEAR_2020));
        assert_eq!(
            parse("dt2020-01-01 00:00:01", utc()).unwrap(),
            Timestamp(NEW_YEAR_2020 + 1000)
        );
    }

    #[test]
    fn date_time() {
        assert_eq!(
            parse("DT2020-01-01 12:30:00", utc()).unwrap(),
            Timestamp(NEW_YEAR_2020 + (12 * 3600 + 30 * 60) * 1000)
        );
    }

    #[test]
    fn zoned_date_time() {
        assert_eq!(
            parse("DTZ2020-01-01T01:00:00+0100", utc()).unwrap(),
            Timestamp(NEW_YEAR_2020)
        );
    }

    #[test]
    fn time_only_is_on_epoch_day() {
        assert_eq!(parse("T00:01:00", utc()).unwrap(), Timestamp(60_000));
    }

    #[test]
    fn epoch_millis() {
        assert_eq!(parse("L1234", utc()).unwrap(), Timestamp(1234));
        assert_eq!(parse("l-5", utc()).unwrap(), Timestamp(-5));
        assert!(matches!(
            parse("L12x", utc()),
            Err(FiqlError::InvalidEpochMillis { .. })
        ));
    }

    #[test]
    fn zone_less_formats_use_offset() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(
            parse("D2020-01-01", cet).unwrap(),
            Timestamp(NEW_YEAR_2020 - 3_600_000)
        );
        // Explicit zones ignore the default offset.
        assert_eq!(
            parse("DTZ2020-01-01T00:00:00+0000", cet).unwrap(),
            Timestamp(NEW_YEAR_2020)
        );
    }

    #[test]
    fn missing_prefix() {
        let err = parse("X2020-01-01", utc()).unwrap_err();
        assert!(matches!(err, FiqlError::MissingDateFormat { .. }));
        assert!(err.is_value());
        assert!(matches!(
            parse("2020-01-01", utc()),
            Err(FiqlError::MissingDateFormat { .. })
        ));
    }

    #[test]
    fn malformed_after_prefix() {
        assert!(matches!(
            parse("D2020-13-01", utc()),
            Err(FiqlError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse("D2020-01-01 10:00:00", utc()),
            Err(FiqlError::InvalidDate { .. })
        ));
        assert!(matches!(
            parse("T25:00:00", utc()),
            Err(FiqlError::InvalidDate { .. })
        ));
    }
}
