use pengajuan_core::models::DateTime;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// A UTC timestamp as stored in SQLite.
///
/// Stored without an offset so that text ordering matches time ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, sqlx::Type)]
#[sqlx(transparent)]
pub(crate) struct Timestamp(PrimitiveDateTime);

impl From<DateTime> for Timestamp {
    fn from(value: DateTime) -> Self {
        let utc = OffsetDateTime::from(value).to_offset(UtcOffset::UTC);
        Self(PrimitiveDateTime::new(utc.date(), utc.time()))
    }
}

impl Timestamp {
    pub fn datetime(self) -> DateTime {
        self.0.assume_utc().into()
    }
}
