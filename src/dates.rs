//! Timestamp newtypes and the calendar arithmetic used by the transition
//! engine and the reporting pass.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};

/// Wire format for calendar dates, `YYYY-MM-DD`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A full UTC instant. Contract creation times are instants; everything
/// else on the record is a [`CalendarDate`].
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl PartialOrd for TimeStamp<Utc> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimeStamp<Utc> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.cmp(&other.0)
    }
}

impl TimeStamp<Utc> {
    pub fn now() -> Self {
        Self(Utc::now())
    }

    pub fn new_with(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Self {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .unwrap()
            .into()
    }

    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }

    pub fn date(&self) -> CalendarDate {
        CalendarDate(self.0.date_naive())
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl<C> minicbor::Encode<C> for TimeStamp<Utc> {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        if let Some(nsec) = self.0.timestamp_nanos_opt() {
            return e.i64(nsec)?.ok();
        }

        Err(minicbor::encode::Error::message(
            "failed to encode timestamp. timestamp_nanos_opt returned None",
        ))
    }
}

impl<'b, C> minicbor::Decode<'b, C> for TimeStamp<Utc> {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let nsecs = d.i64()?;

        Ok(TimeStamp(DateTime::from_timestamp_nanos(nsecs)))
    }
}

impl serde::Serialize for TimeStamp<Utc> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> serde::Deserialize<'de> for TimeStamp<Utc> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| TimeStamp(dt.with_timezone(&Utc)))
            .map_err(serde::de::Error::custom)
    }
}

/// A calendar date without a time component. Delivery dates, the
/// last-updated marker and the per-transition stamps are all plain dates.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(CalendarDate)
    }

    pub fn as_naive(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(value: NaiveDate) -> Self {
        CalendarDate(value)
    }
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DATE_FORMAT))
    }
}

impl<C> minicbor::Encode<C> for CalendarDate {
    fn encode<W: minicbor::encode::Write>(
        &self,
        e: &mut minicbor::Encoder<W>,
        _: &mut C,
    ) -> Result<(), minicbor::encode::Error<W::Error>> {
        e.str(&self.to_string())?.ok()
    }
}

impl<'b, C> minicbor::Decode<'b, C> for CalendarDate {
    fn decode(d: &mut minicbor::Decoder<'b>, _: &mut C) -> Result<Self, minicbor::decode::Error> {
        let raw = d.str()?;

        NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(CalendarDate)
            .map_err(|_| minicbor::decode::Error::message("invalid calendar date"))
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, DATE_FORMAT)
            .map(CalendarDate)
            .map_err(serde::de::Error::custom)
    }
}

/// Day count between two calendar dates using year-day arithmetic: the
/// difference of the ordinal day-of-year, plus the full length of every
/// year strictly between the two (leap years included via the calendar).
/// Negative when `later` precedes `earlier`.
pub fn diff_days(later: NaiveDate, earlier: NaiveDate) -> i64 {
    if later.year() < earlier.year() {
        return -diff_days(earlier, later);
    }

    let mut diff = i64::from(later.ordinal()) - i64::from(earlier.ordinal());
    for year in earlier.year()..later.year() {
        diff += days_in_year(year);
    }
    diff
}

fn days_in_year(year: i32) -> i64 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

/// True iff `check` lies strictly inside the open interval (`start`, `end`).
pub fn in_time_span<T: Ord>(start: T, end: T, check: T) -> bool {
    check > start && check < end
}
