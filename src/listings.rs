//! Loading, validating, and writing listing files.
//!
//! `movies.json` is the hand-off between the scraper and the site: a map from
//! `YYYYMMDD` to the screenings on that day. Everything the filters assume
//! about it is checked here, once, when the file is read:
//!
//! - every key is a real calendar date in compact form
//! - every screening has a title and is filed under its own date
//! - every showing time is a valid `HHMM` code (enforced by [`TimeCode`]'s
//!   deserializer)
//!
//! [`export_views`] writes the grouped views a template iterates over:
//!
//! ```text
//! public/
//! ├── by_date.json     # date → screenings, dates ascending
//! └── by_title.json    # date → title aggregates, earliest showing first
//! ```
//!
//! [`TimeCode`]: crate::types::TimeCode

use crate::filters;
use crate::types::{DateFormat, Listings, ShowDate, TitleAggregate};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum ListingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Listings validation error: {0}")]
    Validation(String),
}

pub const BY_DATE_FILENAME: &str = "by_date.json";
pub const BY_TITLE_FILENAME: &str = "by_title.json";

/// Read and validate a listings file.
pub fn load_listings(path: &Path) -> Result<Listings, ListingsError> {
    let content = fs::read_to_string(path)?;
    let listings = parse_listings(&content)?;
    debug!(path = %path.display(), dates = listings.len(), "loaded listings");
    Ok(listings)
}

/// Deserialize and validate listings from a JSON string.
pub fn parse_listings(content: &str) -> Result<Listings, ListingsError> {
    let listings: Listings = serde_json::from_str(content)?;
    validate_listings(&listings)?;
    Ok(listings)
}

pub fn validate_listings(listings: &Listings) -> Result<(), ListingsError> {
    for (date, movies) in listings {
        ShowDate::parse(date, DateFormat::Compact)
            .map_err(|e| ListingsError::Validation(format!("date key: {e}")))?;
        for movie in movies {
            if movie.title.trim().is_empty() {
                return Err(ListingsError::Validation(format!(
                    "screening at {:?} on {date} has no title",
                    movie.theater
                )));
            }
            if movie.date != *date {
                return Err(ListingsError::Validation(format!(
                    "{:?} is dated {:?} but filed under {date}",
                    movie.title, movie.date
                )));
            }
        }
    }
    Ok(())
}

/// Write listings as 4-space indented JSON, creating parent directories.
pub fn save_listings(listings: &Listings, path: &Path) -> Result<(), ListingsError> {
    write_json(listings, path)
}

/// Serialize with a 4-space indent, matching the scraper's output.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), ListingsError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, to_pretty_json(value)?)?;
    Ok(())
}

/// Title aggregates for every date bucket.
pub fn titles_by_date(listings: &Listings) -> BTreeMap<String, Vec<TitleAggregate>> {
    listings
        .iter()
        .map(|(date, movies)| (date.clone(), filters::group_by_title(movies)))
        .collect()
}

/// Write [`BY_DATE_FILENAME`] and [`BY_TITLE_FILENAME`] into `output_dir`.
///
/// Returns the written paths in that order.
pub fn export_views(listings: &Listings, output_dir: &Path) -> Result<Vec<PathBuf>, ListingsError> {
    let by_date = filters::group_by_date(listings.clone());
    let by_title = titles_by_date(listings);

    let by_date_path = output_dir.join(BY_DATE_FILENAME);
    let by_title_path = output_dir.join(BY_TITLE_FILENAME);
    write_json(&by_date, &by_date_path)?;
    write_json(&by_title, &by_title_path)?;
    info!(output = %output_dir.display(), "exported grouped views");
    Ok(vec![by_date_path, by_title_path])
}

/// Counts shown by `showtimes check`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingsSummary {
    pub dates: usize,
    pub screenings: usize,
    pub showings: usize,
    pub titles: usize,
    pub theaters: usize,
    /// Screenings with an empty showing list.
    pub empty_screenings: usize,
}

pub fn summarize(listings: &Listings) -> ListingsSummary {
    let mut titles = BTreeSet::new();
    let mut theaters = BTreeSet::new();
    let mut summary = ListingsSummary {
        dates: listings.len(),
        ..ListingsSummary::default()
    };
    for movie in listings.values().flatten() {
        summary.screenings += 1;
        summary.showings += movie.showings.len();
        if movie.showings.is_empty() {
            summary.empty_screenings += 1;
        }
        titles.insert(movie.title.as_str());
        theaters.insert(movie.theater.as_str());
    }
    summary.titles = titles.len();
    summary.theaters = theaters.len();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    const VALID: &str = r#"{
        "20250615": [
            {
                "title": "Alien",
                "rating": "R",
                "poster": "YWxpZW4=",
                "theater": "Balboa",
                "theater_link": "https://balboa.example",
                "map": "",
                "area": "Outer Sunset",
                "date": "20250615",
                "showings": [{ "available": "Available", "link": "https://t.example/a", "time": "2100" }]
            }
        ],
        "20250614": [
            {
                "title": "Dune",
                "rating": null,
                "poster": "ZHVuZQ==",
                "theater": "Four Star",
                "date": "20250614",
                "showings": [{ "link": "https://t.example/d", "time": "1930" }]
            }
        ]
    }"#;

    #[test]
    fn parse_valid_listings() {
        let listings = parse_listings(VALID).unwrap();
        let keys: Vec<&str> = listings.keys().map(String::as_str).collect();
        assert_eq!(keys, ["20250614", "20250615"]);
        assert_eq!(listings["20250614"][0].rating, "");
    }

    #[test]
    fn parse_rejects_bad_time_code() {
        let bad = VALID.replace("\"1930\"", "\"7:30 PM\"");
        assert!(matches!(parse_listings(&bad), Err(ListingsError::Json(_))));
    }

    #[test]
    fn parse_rejects_bad_date_key() {
        let bad = VALID.replace("\"20250614\": [", "\"2025-06-14\": [");
        let err = parse_listings(&bad).unwrap_err();
        assert!(matches!(err, ListingsError::Validation(_)));
        assert!(err.to_string().contains("2025-06-14"));
    }

    #[test]
    fn validate_rejects_misfiled_screening() {
        let mut listings = sample_listings();
        let stray = screening("Stray", "X", "20250620", &["1900"]);
        listings.get_mut("20250614").unwrap().push(stray);
        let err = validate_listings(&listings).unwrap_err();
        assert!(err.to_string().contains("Stray"));
    }

    #[test]
    fn validate_rejects_untitled_screening() {
        let mut listings = sample_listings();
        listings
            .get_mut("20250614")
            .unwrap()
            .push(screening("  ", "X", "20250614", &["1900"]));
        assert!(matches!(
            validate_listings(&listings),
            Err(ListingsError::Validation(_))
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_listings(&tmp.path().join("movies.json"));
        assert!(matches!(result, Err(ListingsError::Io(_))));
    }

    #[test]
    fn save_then_load_preserves_listings() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/movies.json");
        let listings = sample_listings();
        save_listings(&listings, &path).unwrap();
        assert_eq!(load_listings(&path).unwrap(), listings);
    }

    #[test]
    fn saved_json_uses_four_space_indent() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("movies.json");
        save_listings(&sample_listings(), &path).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("{\n    \"20250614\": ["));
    }

    #[test]
    fn export_writes_both_views() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("public");
        let paths = export_views(&sample_listings(), &out).unwrap();
        assert_eq!(paths, [out.join(BY_DATE_FILENAME), out.join(BY_TITLE_FILENAME)]);

        let by_title: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&paths[1]).unwrap()).unwrap();
        let first = &by_title["20250614"][0];
        assert_eq!(first["title"], "Paddington");
        assert_eq!(first["earliest_time"], "1100");
        assert_eq!(first["theaters"][0]["name"], "Balboa");
    }

    #[test]
    fn summarize_counts_everything() {
        let summary = summarize(&sample_listings());
        assert_eq!(
            summary,
            ListingsSummary {
                dates: 2,
                screenings: 6,
                showings: 10,
                titles: 3,
                theaters: 2,
                empty_screenings: 0,
            }
        );
    }

    #[test]
    fn summarize_empty() {
        assert_eq!(summarize(&Listings::new()), ListingsSummary::default());
    }
}
