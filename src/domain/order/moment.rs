use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

use super::errors::OrderError;

// ============================================================================
// Moment Wire Format
// ============================================================================
//
// Instants travel as ISO-8601 UTC strings of the exact form
// `yyyy-MM-ddTHH:mm:ssZ`. Sub-second precision is dropped on render.
//
// ============================================================================

pub const MOMENT_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn format_moment(moment: &DateTime<Utc>) -> String {
    moment.format(MOMENT_FORMAT).to_string()
}

pub fn parse_moment(input: &str) -> Result<DateTime<Utc>, OrderError> {
    NaiveDateTime::parse_from_str(input, MOMENT_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| OrderError::InvalidMoment(input.to_string()))
}

/// `#[serde(with = "moment")]` for a required instant.
pub fn serialize<S>(moment: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format_moment(moment))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_moment(&raw).map_err(serde::de::Error::custom)
}

/// `#[serde(with = "moment::option")]` for an instant that may be unset.
pub mod option {
    use super::*;

    pub fn serialize<S>(moment: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match moment {
            Some(moment) => serializer.serialize_some(&format_moment(moment)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| parse_moment(&raw).map_err(serde::de::Error::custom))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};

    #[test]
    fn test_parse_and_format_are_lossless() {
        let parsed = parse_moment("2024-01-15T10:30:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap());
        assert_eq!(format_moment(&parsed), "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_sub_second_precision_is_dropped() {
        let moment = Utc
            .with_ymd_and_hms(2024, 1, 15, 10, 30, 0)
            .unwrap()
            .with_nanosecond(123_000_000)
            .unwrap();
        assert_eq!(format_moment(&moment), "2024-01-15T10:30:00Z");
    }

    #[test]
    fn test_other_shapes_are_rejected() {
        for input in [
            "2024-01-15T10:30:00",
            "2024-01-15T10:30:00.000Z",
            "2024-01-15T10:30:00+00:00",
            "2024-01-15 10:30:00Z",
            "",
        ] {
            assert!(
                matches!(parse_moment(input), Err(OrderError::InvalidMoment(_))),
                "accepted {input:?}"
            );
        }
    }
}
