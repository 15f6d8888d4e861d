use clap::{Parser, Subcommand, ValueEnum};
use showtimes::types::{DateFormat, MovieScreening};
use showtimes::{config, filters, listings, normalize, output};
use std::path::PathBuf;
use tracing::debug;

/// Shared flag for commands that read the listings file.
#[derive(clap::Args, Clone)]
struct ListingsArgs {
    /// Listings file (default: <dirs.input>/<dirs.listings> from the config)
    #[arg(long)]
    listings: Option<PathBuf>,
}

#[derive(Parser)]
#[command(name = "showtimes")]
#[command(about = "Showtime filters for a static movie-listings site")]
#[command(long_about = "\
Showtime filters for a static movie-listings site

Reads the scraped listings file (date -> screenings) and produces the views
the site templates render: screenings by date, titles merged across theaters
and ordered by earliest showing, and display-formatted dates and times.

Listings shape:

  {
    \"20250614\": [
      {
        \"title\": \"Dune\", \"rating\": \"PG-13\", \"poster\": \"ZHVuZQ==\",
        \"theater\": \"Four Star\", \"theater_link\": \"...\", \"map\": \"...\",
        \"area\": \"Richmond\", \"date\": \"20250614\",
        \"showings\": [{ \"time\": \"1930\", \"link\": \"...\", \"available\": \"Available\" }]
      }
    ]
  }

Run 'showtimes gen-config' to generate a documented showtimes.toml.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = config::CONFIG_FILENAME, global = true)]
    config: PathBuf,

    /// Log debug details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, ValueEnum)]
enum GroupKey {
    Date,
    Title,
}

#[derive(Subcommand)]
enum Command {
    /// Validate the listings file and print a summary
    Check(ListingsArgs),
    /// Print a grouped view of the listings as JSON
    Group {
        /// Grouping key
        #[arg(long, value_enum)]
        by: GroupKey,
        /// Restrict title grouping to one YYYYMMDD date
        #[arg(long)]
        date: Option<String>,
        #[command(flatten)]
        listings: ListingsArgs,
    },
    /// Write by_date.json and by_title.json into the output directory
    Export(ListingsArgs),
    /// Format a listing date for display
    FormatDate {
        date: String,
        /// Input convention (default: filters.date_format from the config)
        #[arg(long)]
        format: Option<DateFormat>,
    },
    /// Format an HHMM showtime for display
    FormatTime { time: String },
    /// Convert scraped date text (e.g. "Saturday 14, June") to YYYYMMDD
    ConvertDate { text: String },
    /// Convert scraped time text (e.g. "7:30 PM") to HHMM
    ConvertTime { text: String },
    /// Print a stock showtimes.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Command::GenConfig = cli.command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = config::load_config(&cli.config)?;
    debug!(config = %cli.config.display(), "loaded config");
    let listings_path =
        |args: &ListingsArgs| args.listings.clone().unwrap_or_else(|| site_config.dirs.listings_path());

    match cli.command {
        Command::Check(args) => {
            let path = listings_path(&args);
            let data = listings::load_listings(&path)?;
            let summary = listings::summarize(&data);
            output::print_check_output(&data, &summary, &path);
            println!("==> Listings are valid");
        }
        Command::Group { by, date, listings: args } => {
            let data = listings::load_listings(&listings_path(&args))?;
            let json = match (by, date) {
                (GroupKey::Date, _) => listings::to_pretty_json(&filters::group_by_date(data))?,
                (GroupKey::Title, Some(date)) => {
                    listings::to_pretty_json(&filters::group_by_title_for_date(&data, &date))?
                }
                (GroupKey::Title, None) => {
                    let all: Vec<MovieScreening> = data.into_values().flatten().collect();
                    listings::to_pretty_json(&filters::group_by_title(&all))?
                }
            };
            println!("{}", json);
        }
        Command::Export(args) => {
            let data = listings::load_listings(&listings_path(&args))?;
            let paths = listings::export_views(&data, &site_config.dirs.output_path())?;
            output::print_export_output(&paths);
        }
        Command::FormatDate { date, format } => {
            let format = format.unwrap_or(site_config.filters.date_format);
            println!("{}", filters::format_date(&date, format)?);
        }
        Command::FormatTime { time } => {
            println!("{}", filters::format_time(&time)?);
        }
        Command::ConvertDate { text } => {
            let today = chrono::Local::now().date_naive();
            let date = normalize::convert_date(&text, &site_config.scrape.date_format, today)?;
            println!("{}", date.compact());
        }
        Command::ConvertTime { text } => {
            let time = normalize::convert_time(&text, &site_config.scrape.time_format)?;
            println!("{}", time);
        }
        Command::GenConfig => {}
    }

    Ok(())
}
