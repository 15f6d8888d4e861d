//! # Showtimes
//!
//! Showtime filters for a static movie-listings site. A scraper collects what
//! is playing where; this crate turns that into the shapes a page template
//! iterates over: screenings by date, titles merged across theaters and
//! ordered by their earliest showing, and human-readable dates and times.
//!
//! # Data Flow
//!
//! ```text
//! scraped text  →  normalize   →  movies.json          (YYYYMMDD / HHMM codes)
//! movies.json   →  listings    →  Listings             (validated on load)
//! Listings      →  filters     →  grouped views        (what templates render)
//! ```
//!
//! Rendering, asset copying, and file watching belong to the site generator;
//! this crate never touches templates.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`filters`] | Pure template filters: date/time formatting, grouping, sorting |
//! | [`types`] | `TimeCode`, `ShowDate`, `MovieScreening`, `TitleAggregate`, `Listings` |
//! | [`normalize`] | Scraped text → codes, poster file naming, `ListingsBuilder` |
//! | [`listings`] | `movies.json` loading, validation, saving, and view export |
//! | [`config`] | `showtimes.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Plain Functions Instead of a Filter Registry
//!
//! Filters are ordinary `pub fn`s over borrowed data. A renderer wires up the
//! ones it needs by name; nothing is registered into process-wide state, so
//! every filter is testable in isolation and safe to call from parallel
//! renders.
//!
//! ## Validate at the Boundary
//!
//! Showing times deserialize into [`types::TimeCode`] and date keys are
//! checked when `movies.json` is loaded. Past that point the grouping filters
//! cannot meet a malformed time, and the only condition they report is a
//! title with no showings.
//!
//! ## Errors Instead of Placeholder Strings
//!
//! A bad date or time is a [`filters::FilterError`], not an "Invalid Date" or
//! `NaN` string that looks plausible on a page. One broken record does not
//! stop the rest of the page from rendering; the caller chooses what to show.
//!
//! ## One Date Formatter, Two Conventions
//!
//! Listing keys are `YYYYMMDD`; some data sources use `YYYY-MM-DD`.
//! [`filters::format_date`] takes a [`types::DateFormat`] rather than guessing,
//! and the default comes from `[filters] date_format` in the config.

pub mod config;
pub mod filters;
pub mod listings;
pub mod normalize;
pub mod output;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
