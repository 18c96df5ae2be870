//! DateTime type for submission timestamps.
//!
//! This module provides a [`DateTime`] type that represents UTC timestamps
//! with subsecond precision and always (de)serializes as RFC3339.

use std::{borrow::Borrow, fmt::Display};
use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

/// A UTC timestamp with subsecond precision.
///
/// Every timestamp recorded by the portal (uploads, verifications, status
/// changes) goes through this type, which guarantees:
///
/// - All times are normalized to UTC
/// - Serialization/deserialization uses RFC3339
///
/// # Examples
///
/// ```
/// # use pengajuan_core::models::DateTime;
/// # use time::OffsetDateTime;
/// let now = DateTime::from(OffsetDateTime::now_utc());
/// println!("{}", now); // Prints in RFC3339 format
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "DateTimeDto", into = "DateTimeDto")]
pub struct DateTime(OffsetDateTime);

impl DateTime {
    /// The current time.
    pub fn now() -> Self {
        OffsetDateTime::now_utc().into()
    }
}

impl Display for DateTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let formatted = self.0.format(&Rfc3339).map_err(|_| std::fmt::Error)?;
        f.write_str(&formatted)
    }
}

impl<T: Borrow<OffsetDateTime>> From<T> for DateTime {
    fn from(value: T) -> Self {
        Self(value.borrow().to_offset(UtcOffset::UTC))
    }
}

impl From<DateTime> for OffsetDateTime {
    fn from(value: DateTime) -> Self {
        value.0
    }
}

// This is a helper type that ensures (de)serialization happens with respect to RFC3339

#[derive(serde::Serialize, serde::Deserialize)]
struct DateTimeDto(#[serde(with = "time::serde::rfc3339")] OffsetDateTime);

impl From<DateTimeDto> for DateTime {
    fn from(value: DateTimeDto) -> Self {
        value.0.into()
    }
}

impl From<DateTime> for DateTimeDto {
    fn from(value: DateTime) -> Self {
        DateTimeDto(value.0)
    }
}

#[cfg(feature = "schemars")]
impl schemars::JsonSchema for DateTime {
    fn inline_schema() -> bool {
        true
    }

    fn schema_name() -> std::borrow::Cow<'static, str> {
        "DateTime".into()
    }

    fn json_schema(_: &mut schemars::SchemaGenerator) -> schemars::Schema {
        schemars::json_schema!({
            "type": "string",
            "format": "date-time",
        })
    }
}
