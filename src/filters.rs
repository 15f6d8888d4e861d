//! Template filters for showtime listings.
//!
//! Every filter is a plain function over borrowed input that returns a new
//! value. There is no registry: a renderer imports the functions it needs and
//! calls them directly, so each one can be tested on its own and concurrent
//! renders never share state.
//!
//! | Filter | Input | Output |
//! |--------|-------|--------|
//! | [`format_date`] | `"20250614"` / `"2025-06-14"` | `"Saturday, 14 June"` |
//! | [`format_time`] | `"1930"` | `"7:30 PM"` |
//! | [`group_by_date`] | date → screenings | same, keys ascending |
//! | [`group_by_title`] | flat screenings | one aggregate per title, by earliest showing |
//! | [`sort_by_earliest_showing`] | screenings | copy sorted by earliest showing |
//!
//! ## Failure signalling
//!
//! Malformed dates and times are reported as [`FilterError`] values, never as
//! an "Invalid Date" string or a `NaN:30 PM`. The caller decides whether to
//! skip the record, show a placeholder, or abort the page.
//!
//! ## Empty showings
//!
//! A screening or title with no showings has no earliest time. Such entries
//! sort after everything that has showings and keep their relative input
//! order. Code that needs the actual time gets
//! [`FilterError::EmptyShowingsAggregate`] from
//! [`MovieScreening::earliest_showing`] or [`TitleAggregate::earliest`].

use crate::types::{
    DateFormat, Listings, MovieScreening, ShowDate, TheaterEntry, TimeCode, TitleAggregate,
};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Malformed date: {0:?}")]
    MalformedDate(String),
    #[error("Malformed time: {0:?} (expected 4-digit HHMM)")]
    MalformedTime(String),
    #[error("No showings for {0:?}")]
    EmptyShowingsAggregate(String),
}

/// Format a listing date as `"<Weekday>, <Day> <Month>"`.
///
/// ```
/// use showtimes::filters::format_date;
/// use showtimes::types::DateFormat;
///
/// assert_eq!(format_date("20250614", DateFormat::Compact).unwrap(), "Saturday, 14 June");
/// assert_eq!(format_date("2025-06-14", DateFormat::Dashed).unwrap(), "Saturday, 14 June");
/// ```
pub fn format_date(input: &str, format: DateFormat) -> Result<String, FilterError> {
    Ok(ShowDate::parse(input, format)?.to_display())
}

/// Format a `HHMM` code as `"<H>:<MM> <AM|PM>"`.
///
/// ```
/// use showtimes::filters::format_time;
///
/// assert_eq!(format_time("0000").unwrap(), "12:00 AM");
/// assert_eq!(format_time("1200").unwrap(), "12:00 PM");
/// assert_eq!(format_time("2145").unwrap(), "9:45 PM");
/// ```
pub fn format_time(input: &str) -> Result<String, FilterError> {
    Ok(input.parse::<TimeCode>()?.to_display())
}

/// Parse the display form produced by [`format_time`] back into a code.
///
/// Accepts `"9:30 PM"`, `"12:00 am"`, `"09:30 PM"`. Hours must be 1-12.
pub fn parse_display_time(input: &str) -> Result<TimeCode, FilterError> {
    let malformed = || FilterError::MalformedTime(input.to_string());
    let (clock, period) = input.trim().split_once(' ').ok_or_else(malformed)?;
    let pm = if period.eq_ignore_ascii_case("pm") {
        true
    } else if period.eq_ignore_ascii_case("am") {
        false
    } else {
        return Err(malformed());
    };
    let (hour, minute) = clock.split_once(':').ok_or_else(malformed)?;
    let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(hour) || hour.len() > 2 || minute.len() != 2 || !all_digits(minute) {
        return Err(malformed());
    }
    let hour: u8 = hour.parse().map_err(|_| malformed())?;
    let minute: u8 = minute.parse().map_err(|_| malformed())?;
    if !(1..=12).contains(&hour) {
        return Err(malformed());
    }
    let hour = match (hour, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, false) => h,
        (h, true) => h + 12,
    };
    TimeCode::new(hour, minute).map_err(|_| malformed())
}

/// Re-key date buckets in ascending date order.
///
/// `YYYYMMDD` keys sort chronologically as plain strings. Values are passed
/// through untouched; a key that appears twice has its lists concatenated in
/// input order.
pub fn group_by_date<I>(listings: I) -> Listings
where
    I: IntoIterator<Item = (String, Vec<MovieScreening>)>,
{
    let mut grouped: Listings = BTreeMap::new();
    for (date, movies) in listings {
        grouped.entry(date).or_default().extend(movies);
    }
    grouped
}

/// Merge screenings of the same title across theaters.
///
/// Rating and poster come from the first screening seen for a title; theater
/// entries are appended in input order. Aggregates are ordered by their
/// earliest showing over all theaters, ties in first-seen order.
pub fn group_by_title(screenings: &[MovieScreening]) -> Vec<TitleAggregate> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut aggregates: Vec<TitleAggregate> = Vec::new();

    for screening in screenings {
        let slot = *slots.entry(screening.title.as_str()).or_insert_with(|| {
            aggregates.push(TitleAggregate {
                title: screening.title.clone(),
                rating: screening.rating.clone(),
                poster: screening.poster.clone(),
                theaters: Vec::new(),
                earliest_time: None,
            });
            aggregates.len() - 1
        });

        let aggregate = &mut aggregates[slot];
        aggregate.theaters.push(TheaterEntry::from(screening));
        aggregate.earliest_time = aggregate
            .earliest_time
            .into_iter()
            .chain(screening.earliest_time())
            .min();
    }

    for aggregate in aggregates.iter().filter(|a| a.earliest_time.is_none()) {
        warn!(title = %aggregate.title, "title has no showings; sorting it last");
    }

    aggregates.sort_by(|a, b| cmp_earliest(a.earliest_time, b.earliest_time));
    debug!(
        screenings = screenings.len(),
        titles = aggregates.len(),
        "grouped screenings by title"
    );
    aggregates
}

/// [`group_by_title`] over a single date bucket. Unknown dates yield nothing.
pub fn group_by_title_for_date(listings: &Listings, date: &str) -> Vec<TitleAggregate> {
    listings
        .get(date)
        .map(|movies| group_by_title(movies))
        .unwrap_or_default()
}

/// Copy of `movies` ordered by each movie's own earliest showing.
pub fn sort_by_earliest_showing(movies: &[MovieScreening]) -> Vec<MovieScreening> {
    let mut sorted = movies.to_vec();
    sorted.sort_by(|a, b| cmp_earliest(a.earliest_time(), b.earliest_time()));
    sorted
}

/// `None` is treated as later than any time.
fn cmp_earliest(a: Option<TimeCode>, b: Option<TimeCode>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
