//! CLI output formatting.
//!
//! Output is **information-first**: each date and title leads with its
//! positional index and display text, with raw codes and counts as indented
//! context lines underneath.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Listings: src/_data/movies.json
//!     2 dates, 6 screenings, 10 showings
//!     3 titles at 2 theaters
//!
//! 001 Saturday, 14 June (20250614)
//!     001 Paddington (PG-13)
//!         Balboa: 11:00 AM, 1:30 PM
//!     002 Dune (PG-13)
//!         Four Star: 7:30 PM, 10:00 PM
//!         Balboa: 4:00 PM
//! ```
//!
//! ## Export
//!
//! ```text
//! Wrote public/by_date.json
//! Wrote public/by_title.json
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format functions
//! are pure.

use crate::filters;
use crate::listings::ListingsSummary;
use crate::types::{DateFormat, Listings, Showing, TitleAggregate};
use std::path::{Path, PathBuf};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Display a date key, falling back to the raw key if it does not parse.
fn date_header(index: usize, date: &str) -> String {
    match filters::format_date(date, DateFormat::Compact) {
        Ok(display) => format!("{} {} ({})", format_index(index), display, date),
        Err(_) => format!("{} {}", format_index(index), date),
    }
}

/// `"Dune (PG-13)"`, or just the title when unrated.
fn title_line(index: usize, aggregate: &TitleAggregate) -> String {
    if aggregate.rating.is_empty() {
        format!("{} {}", format_index(index), aggregate.title)
    } else {
        format!("{} {} ({})", format_index(index), aggregate.title, aggregate.rating)
    }
}

/// Comma-separated display times, sold-out showings marked.
fn showing_times(showings: &[Showing]) -> String {
    if showings.is_empty() {
        return "no showings".to_string();
    }
    showings
        .iter()
        .map(|s| {
            let time = s.time.to_display();
            if s.available.eq_ignore_ascii_case("sold out") {
                format!("{time} (sold out)")
            } else {
                time
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Summary header followed by every date, grouped by title.
pub fn format_check_output(listings: &Listings, summary: &ListingsSummary, path: &Path) -> Vec<String> {
    let mut lines = vec![format!("Listings: {}", path.display())];
    lines.push(format!(
        "{}{}, {}, {}",
        indent(1),
        plural(summary.dates, "date"),
        plural(summary.screenings, "screening"),
        plural(summary.showings, "showing"),
    ));
    lines.push(format!(
        "{}{} at {}",
        indent(1),
        plural(summary.titles, "title"),
        plural(summary.theaters, "theater"),
    ));
    if summary.empty_screenings > 0 {
        lines.push(format!(
            "{}{} without showings",
            indent(1),
            plural(summary.empty_screenings, "screening"),
        ));
    }

    for (i, (date, movies)) in listings.iter().enumerate() {
        lines.push(String::new());
        lines.push(date_header(i + 1, date));
        lines.extend(format_title_lines(&filters::group_by_title(movies), 1));
    }
    lines
}

/// Title aggregates with one context line per theater.
pub fn format_title_lines(aggregates: &[TitleAggregate], depth: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, aggregate) in aggregates.iter().enumerate() {
        lines.push(format!("{}{}", indent(depth), title_line(i + 1, aggregate)));
        for theater in &aggregate.theaters {
            lines.push(format!(
                "{}{}: {}",
                indent(depth + 1),
                theater.name,
                showing_times(&theater.showings)
            ));
        }
    }
    lines
}

pub fn format_export_output(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| format!("Wrote {}", p.display()))
        .collect()
}

pub fn print_check_output(listings: &Listings, summary: &ListingsSummary, path: &Path) {
    for line in format_check_output(listings, summary, path) {
        println!("{}", line);
    }
}

pub fn print_export_output(paths: &[PathBuf]) {
    for line in format_export_output(paths) {
        println!("{}", line);
    }
}
