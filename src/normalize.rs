//! Normalization of scraped schedule text into listing values.
//!
//! Theater sites show dates like `"Saturday 14, June"` and times like
//! `"7:30 PM"`. Listings store `YYYYMMDD` and `HHMM`, so the loading stage runs
//! scraped text through these helpers before building [`Listings`].
//!
//! ## Year inference
//!
//! Scraped dates carry no year. [`convert_date`] assumes the current year and
//! moves to next year when that would put the date before yesterday, or when
//! the weekday in the text does not match the current year (a January
//! schedule scraped in December).
//!
//! ## Poster names
//!
//! Posters are saved under the URL-safe base64 of the lowercased poster name,
//! which gives every title a stable, filesystem-safe file stem.

use crate::filters::FilterError;
use crate::types::{Listings, MovieScreening, ShowDate, Showing, TimeCode};
use base64::{Engine as _, engine::general_purpose::URL_SAFE};
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Convert scraped date text to a [`ShowDate`].
///
/// `format` is a chrono format string ending in a year field, e.g.
/// `"%A %d, %B %Y"`; the inferred year is appended to `scraped` before parsing.
pub fn convert_date(scraped: &str, format: &str, today: NaiveDate) -> Result<ShowDate, FilterError> {
    let scraped = scraped.trim();
    let parse = |year: i32| NaiveDate::parse_from_str(&format!("{scraped} {year}"), format).ok();
    let yesterday = today.pred_opt().unwrap_or(today);

    let date = match parse(today.year()) {
        Some(date) if date >= yesterday => Some(date),
        _ => parse(today.year() + 1),
    };
    let date = date.ok_or_else(|| FilterError::MalformedDate(scraped.to_string()))?;
    debug!(scraped, date = %date, "converted scraped date");
    Ok(ShowDate::from_naive(date))
}

/// Convert scraped time text (e.g. `"7:30 PM"` with `"%I:%M %p"`) to a code.
pub fn convert_time(scraped: &str, format: &str) -> Result<TimeCode, FilterError> {
    let scraped = scraped.trim();
    let time = NaiveTime::parse_from_str(scraped, format)
        .map_err(|_| FilterError::MalformedTime(scraped.to_string()))?;
    // hour() < 24 and minute() < 60, so the narrowing is lossless
    TimeCode::new(time.hour() as u8, time.minute() as u8)
}

/// Trim a scraped title and undo the `&amp;` escaping of inner HTML.
pub fn clean_title(raw: &str) -> String {
    raw.trim().replace("&amp;", "&")
}

/// File stem a poster is stored under.
pub fn poster_file_stem(name: &str) -> String {
    URL_SAFE.encode(name.trim().to_lowercase())
}

pub fn poster_file_name(name: &str) -> String {
    format!("{}.png", poster_file_stem(name))
}

/// Venue fields shared by every screening scraped from one theater page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TheaterContext {
    pub theater: String,
    #[serde(default)]
    pub theater_link: String,
    #[serde(default)]
    pub map: String,
    #[serde(default)]
    pub area: String,
}

/// Accumulates scraped showings into [`Listings`].
///
/// Showings are pushed one at a time while walking a movie's session list,
/// then [`finish_screening`](Self::finish_screening) files them under the
/// screening's date. A movie that ends up with no showings is dropped.
#[derive(Debug, Default)]
pub struct ListingsBuilder {
    theater: TheaterContext,
    pending: Vec<Showing>,
    listings: Listings,
}

impl ListingsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to another theater. Unfinished showings are discarded.
    pub fn set_theater(&mut self, theater: TheaterContext) {
        if !self.pending.is_empty() {
            debug!(
                discarded = self.pending.len(),
                theater = %self.theater.theater,
                "discarding unfinished showings"
            );
        }
        self.pending.clear();
        self.theater = theater;
    }

    /// Queue one showing. Entries without a link or time are skipped and
    /// return `Ok(false)`.
    pub fn push_showing(&mut self, time: &str, link: &str, available: &str) -> Result<bool, FilterError> {
        let (time, link) = (time.trim(), link.trim());
        if time.is_empty() || link.is_empty() {
            return Ok(false);
        }
        self.pending.push(Showing {
            time: time.parse()?,
            link: link.to_string(),
            available: available.trim().to_string(),
        });
        Ok(true)
    }

    pub fn pending_showings(&self) -> usize {
        self.pending.len()
    }

    /// File the queued showings as one screening. Returns `false` (and files
    /// nothing) when no showings were queued.
    pub fn finish_screening(&mut self, date: ShowDate, title: &str, rating: &str, poster: &str) -> bool {
        if self.pending.is_empty() {
            return false;
        }
        let key = date.compact();
        let screening = MovieScreening {
            title: clean_title(title),
            rating: rating.trim().to_string(),
            poster: poster.to_string(),
            theater: self.theater.theater.clone(),
            theater_link: self.theater.theater_link.clone(),
            map: self.theater.map.clone(),
            area: self.theater.area.clone(),
            date: key.clone(),
            showings: std::mem::take(&mut self.pending),
        };
        self.listings.entry(key).or_default().push(screening);
        true
    }

    pub fn finish(self) -> Listings {
        self.listings
    }
}
