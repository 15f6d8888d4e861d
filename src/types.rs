//! Shared listing types.
//!
//! These types are the contract between the loading stage (`movies.json`), the
//! filters, and whatever renders the result. Time codes and dates are parsed
//! into [`TimeCode`] and [`ShowDate`] so malformed values are rejected where
//! the data enters, not halfway through a page render.
//!
//! ## Wire format
//!
//! ```json
//! {
//!     "20250614": [
//!         {
//!             "title": "Dune",
//!             "rating": "PG-13",
//!             "poster": "ZHVuZQ==",
//!             "theater": "Four Star",
//!             "theater_link": "https://fourstar.example",
//!             "map": "https://maps.example/four-star",
//!             "area": "Richmond",
//!             "date": "20250614",
//!             "showings": [
//!                 { "available": "Available", "link": "https://t.example/1", "time": "1930" }
//!             ]
//!         }
//!     ]
//! }
//! ```

use crate::filters::FilterError;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Listings keyed by `YYYYMMDD` date string, as stored in `movies.json`.
pub type Listings = BTreeMap<String, Vec<MovieScreening>>;

/// Input convention accepted by the date formatter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    /// `YYYYMMDD`, digits only.
    #[default]
    Compact,
    /// `YYYY-MM-DD`.
    Dashed,
}

impl DateFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            DateFormat::Compact => "compact",
            DateFormat::Dashed => "dashed",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "compact" => Ok(DateFormat::Compact),
            "dashed" => Ok(DateFormat::Dashed),
            other => Err(format!(
                "unknown date format '{other}' (expected 'compact' or 'dashed')"
            )),
        }
    }
}

/// A 24-hour `HHMM` showtime.
///
/// Ordering is chronological and agrees with comparing the codes as integers
/// (`"0900"` → 900 < `"2200"` → 2200), which is what earliest-showing sorts use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeCode {
    hour: u8,
    minute: u8,
}

impl TimeCode {
    pub fn new(hour: u8, minute: u8) -> Result<Self, FilterError> {
        if hour > 23 || minute > 59 {
            return Err(FilterError::MalformedTime(format!("{hour:02}{minute:02}")));
        }
        Ok(Self { hour, minute })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Integer value of the code, `HH * 100 + MM`.
    pub fn value(self) -> u16 {
        u16::from(self.hour) * 100 + u16::from(self.minute)
    }

    /// 12-hour display form: `"9:30 PM"`, `"12:00 AM"` for midnight.
    pub fn to_display(self) -> String {
        let period = if self.hour >= 12 { "PM" } else { "AM" };
        let hour = match self.hour % 12 {
            0 => 12,
            h => h,
        };
        format!("{}:{:02} {}", hour, self.minute, period)
    }
}

impl FromStr for TimeCode {
    type Err = FilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || FilterError::MalformedTime(s.to_string());
        if s.len() != 4 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let hour: u8 = s[..2].parse().map_err(|_| malformed())?;
        let minute: u8 = s[2..].parse().map_err(|_| malformed())?;
        Self::new(hour, minute).map_err(|_| malformed())
    }
}

impl fmt::Display for TimeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.hour, self.minute)
    }
}

impl TryFrom<String> for TimeCode {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeCode> for String {
    fn from(value: TimeCode) -> Self {
        value.to_string()
    }
}

/// A calendar date as used for listing keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShowDate(NaiveDate);

impl ShowDate {
    /// Parse `YYYYMMDD` or `YYYY-MM-DD`, depending on `format`.
    ///
    /// The segments must be exactly the right width and denote a real
    /// calendar day; `20250230` is rejected rather than rolled over.
    pub fn parse(input: &str, format: DateFormat) -> Result<Self, FilterError> {
        let malformed = || FilterError::MalformedDate(input.to_string());
        let bytes = input.as_bytes();
        let (year, month, day) = match format {
            DateFormat::Compact => {
                if bytes.len() != 8 || !bytes.iter().all(u8::is_ascii_digit) {
                    return Err(malformed());
                }
                (&input[..4], &input[4..6], &input[6..])
            }
            DateFormat::Dashed => {
                let digits_ok = bytes
                    .iter()
                    .enumerate()
                    .all(|(i, b)| if i == 4 || i == 7 { *b == b'-' } else { b.is_ascii_digit() });
                if bytes.len() != 10 || !digits_ok {
                    return Err(malformed());
                }
                (&input[..4], &input[5..7], &input[8..])
            }
        };
        let year: i32 = year.parse().map_err(|_| malformed())?;
        let month: u32 = month.parse().map_err(|_| malformed())?;
        let day: u32 = day.parse().map_err(|_| malformed())?;
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(malformed)
    }

    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn naive(self) -> NaiveDate {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.year()
    }

    /// The `YYYYMMDD` listing key.
    pub fn compact(self) -> String {
        self.0.format("%Y%m%d").to_string()
    }

    /// `"Saturday, 14 June"`.
    pub fn to_display(self) -> String {
        self.0.format("%A, %-d %B").to_string()
    }
}

impl fmt::Display for ShowDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y%m%d"))
    }
}

impl TryFrom<String> for ShowDate {
    type Error = FilterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value, DateFormat::Compact)
    }
}

impl From<ShowDate> for String {
    fn from(value: ShowDate) -> Self {
        value.compact()
    }
}

/// One scheduled start time within a screening.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Showing {
    pub time: TimeCode,
    /// Ticket link; may be empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub link: String,
    /// Availability as scraped, e.g. `"Available"` or `"Sold Out"`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub available: String,
}

impl Showing {
    pub fn at(time: TimeCode) -> Self {
        Self {
            time,
            link: String::new(),
            available: String::new(),
        }
    }
}

/// One movie playing at one theater on one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieScreening {
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub rating: String,
    /// Poster file stem (see [`crate::normalize::poster_file_stem`]).
    #[serde(default, deserialize_with = "null_as_empty")]
    pub poster: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub theater: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub theater_link: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub map: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub area: String,
    /// `YYYYMMDD`.
    pub date: String,
    #[serde(default)]
    pub showings: Vec<Showing>,
}

impl MovieScreening {
    /// Earliest showing time, or `None` when the screening has no showings.
    pub fn earliest_time(&self) -> Option<TimeCode> {
        self.showings.iter().map(|s| s.time).min()
    }

    /// Earliest showing time, failing for a screening with no showings.
    pub fn earliest_showing(&self) -> Result<TimeCode, FilterError> {
        self.earliest_time()
            .ok_or_else(|| FilterError::EmptyShowingsAggregate(self.title.clone()))
    }
}

/// Per-theater entry inside a [`TitleAggregate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheaterEntry {
    pub name: String,
    pub showings: Vec<Showing>,
    pub map: String,
    pub area: String,
    pub theater_link: String,
}

impl From<&MovieScreening> for TheaterEntry {
    fn from(screening: &MovieScreening) -> Self {
        Self {
            name: screening.theater.clone(),
            showings: screening.showings.clone(),
            map: screening.map.clone(),
            area: screening.area.clone(),
            theater_link: screening.theater_link.clone(),
        }
    }
}

/// All screenings of one title merged across theaters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleAggregate {
    pub title: String,
    pub rating: String,
    pub poster: String,
    pub theaters: Vec<TheaterEntry>,
    /// Minimum showing time over every theater. Ordering only; `None` when the
    /// title has no showings at all.
    pub earliest_time: Option<TimeCode>,
}

impl TitleAggregate {
    pub fn earliest(&self) -> Result<TimeCode, FilterError> {
        self.earliest_time
            .ok_or_else(|| FilterError::EmptyShowingsAggregate(self.title.clone()))
    }

    pub fn showing_count(&self) -> usize {
        self.theaters.iter().map(|t| t.showings.len()).sum()
    }
}

/// Scraped fields are sometimes `null` (e.g. a movie without a rating).
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_code_parses_four_digits() {
        let t: TimeCode = "0930".parse().unwrap();
        assert_eq!(t.hour(), 9);
        assert_eq!(t.minute(), 30);
        assert_eq!(t.value(), 930);
        assert_eq!(t.to_string(), "0930");
    }

    #[test]
    fn time_code_rejects_bad_shapes() {
        for bad in ["930", "09300", "9:30", "ab30", "", "2400", "1260", " 930"] {
            assert!(
                matches!(bad.parse::<TimeCode>(), Err(FilterError::MalformedTime(ref s)) if s == bad),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn time_code_order_matches_integer_order() {
        let early: TimeCode = "0900".parse().unwrap();
        let late: TimeCode = "2200".parse().unwrap();
        assert!(early < late);
        assert!(early.value() < late.value());
    }

    #[test]
    fn time_code_serde_is_string() {
        let t: TimeCode = serde_json::from_str("\"1930\"").unwrap();
        assert_eq!(serde_json::to_string(&t).unwrap(), "\"1930\"");
        assert!(serde_json::from_str::<TimeCode>("\"7pm\"").is_err());
    }

    #[test]
    fn show_date_compact_and_dashed_agree() {
        let a = ShowDate::parse("20250614", DateFormat::Compact).unwrap();
        let b = ShowDate::parse("2025-06-14", DateFormat::Dashed).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.compact(), "20250614");
    }

    #[test]
    fn show_date_rejects_wrong_convention() {
        assert!(ShowDate::parse("2025-06-14", DateFormat::Compact).is_err());
        assert!(ShowDate::parse("20250614", DateFormat::Dashed).is_err());
        assert!(ShowDate::parse("2025/06/14", DateFormat::Dashed).is_err());
    }

    #[test]
    fn date_format_from_str() {
        assert_eq!("compact".parse::<DateFormat>(), Ok(DateFormat::Compact));
        assert_eq!("dashed".parse::<DateFormat>(), Ok(DateFormat::Dashed));
        assert!("slashed".parse::<DateFormat>().is_err());
    }

    #[test]
    fn screening_null_fields_become_empty() {
        let json = r#"{
            "title": "Dune",
            "rating": null,
            "poster": "ZHVuZQ==",
            "date": "20250614",
            "showings": [{ "time": "1930", "link": null }]
        }"#;
        let s: MovieScreening = serde_json::from_str(json).unwrap();
        assert_eq!(s.rating, "");
        assert_eq!(s.theater, "");
        assert_eq!(s.showings[0].link, "");
        assert_eq!(s.showings[0].available, "");
    }

    #[test]
    fn earliest_showing_of_empty_screening_is_error() {
        let s = MovieScreening {
            title: "Nothing".into(),
            rating: String::new(),
            poster: String::new(),
            theater: String::new(),
            theater_link: String::new(),
            map: String::new(),
            area: String::new(),
            date: "20250614".into(),
            showings: vec![],
        };
        assert_eq!(s.earliest_time(), None);
        assert_eq!(
            s.earliest_showing(),
            Err(FilterError::EmptyShowingsAggregate("Nothing".into()))
        );
    }
}
