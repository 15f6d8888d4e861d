//! Shared test utilities for the showtimes test suite.
//!
//! Provides fixture builders for screenings and listings, plus lookup helpers
//! that panic with a readable message on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let grouped = group_by_title(&[
//!     screening("Dune", "Four Star", "20250614", &["1930", "2200"]),
//!     screening("Dune", "Balboa", "20250614", &["1600"]),
//! ]);
//!
//! let dune = find_aggregate(&grouped, "Dune");
//! assert_eq!(theater_names(dune), ["Four Star", "Balboa"]);
//! ```

use crate::types::{Listings, MovieScreening, Showing, TitleAggregate};

// =========================================================================
// Fixture builders
// =========================================================================

/// A screening with the given showing times; other fields are derived from
/// the title and theater so they survive a JSON round-trip unchanged.
pub fn screening(title: &str, theater: &str, date: &str, times: &[&str]) -> MovieScreening {
    let slug = theater.to_lowercase().replace(' ', "-");
    MovieScreening {
        title: title.to_string(),
        rating: "PG-13".to_string(),
        poster: crate::normalize::poster_file_stem(title),
        theater: theater.to_string(),
        theater_link: format!("https://{slug}.example"),
        map: format!("https://maps.example/{slug}"),
        area: "Richmond".to_string(),
        date: date.to_string(),
        showings: times
            .iter()
            .enumerate()
            .map(|(i, t)| Showing {
                time: t.parse().unwrap_or_else(|e| panic!("bad fixture time {t:?}: {e}")),
                link: format!("https://tickets.example/{slug}/{date}/{i}"),
                available: "Available".to_string(),
            })
            .collect(),
    }
}

/// Two days at two theaters, three titles.
///
/// On 20250614, by earliest showing: Paddington (1100), Dune (1600 at
/// Balboa), Alien (2130).
pub fn sample_listings() -> Listings {
    let mut listings = Listings::new();
    listings.insert(
        "20250614".to_string(),
        vec![
            screening("Dune", "Four Star", "20250614", &["1930", "2200"]),
            screening("Alien", "Four Star", "20250614", &["2130"]),
            screening("Paddington", "Balboa", "20250614", &["1100", "1330"]),
            screening("Dune", "Balboa", "20250614", &["1600"]),
        ],
    );
    listings.insert(
        "20250615".to_string(),
        vec![
            screening("Alien", "Balboa", "20250615", &["2000", "2300"]),
            screening("Paddington", "Four Star", "20250615", &["1000", "1230"]),
        ],
    );
    listings
}

// =========================================================================
// Lookups — panic with a clear message on miss
// =========================================================================

/// Find an aggregate by title. Panics if not found.
pub fn find_aggregate<'a>(aggregates: &'a [TitleAggregate], title: &str) -> &'a TitleAggregate {
    aggregates.iter().find(|a| a.title == title).unwrap_or_else(|| {
        let titles = aggregate_titles(aggregates);
        panic!("aggregate '{title}' not found. Available: {titles:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All aggregate titles in output order.
pub fn aggregate_titles(aggregates: &[TitleAggregate]) -> Vec<&str> {
    aggregates.iter().map(|a| a.title.as_str()).collect()
}

/// Theater names of an aggregate in encounter order.
pub fn theater_names(aggregate: &TitleAggregate) -> Vec<&str> {
    aggregate.theaters.iter().map(|t| t.name.as_str()).collect()
}
