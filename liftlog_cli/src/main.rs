use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use liftlog_core::format::{format_best_performance, format_header, format_set_line};
use liftlog_core::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "liftlog")]
#[command(about = "Workout log report: best lifts and day-by-day comparisons", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override the workout log file
    #[arg(long, global = true)]
    file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Best set per exercise, ranked by estimated 1RM (default)
    Best {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Sets logged on a day, next to the previous time each exercise was done
    Day {
        /// Day to show (YYYY-MM-DD)
        date: NaiveDate,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Days with logged training
    Dates {
        /// Only list days in this month (YYYY-MM)
        #[arg(long, value_parser = parse_month)]
        month: Option<YearMonth>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Estimate a one-rep max from weight and reps
    OneRm {
        #[arg(value_parser = parse_weight)]
        weight: f64,
        reps: u32,
    },

    /// Report rows of the workout log that were skipped
    Check,

    /// Show the effective configuration
    Config {
        /// Write a default config file if none exists
        #[arg(long)]
        init: bool,
    },
}

#[derive(Clone, Copy, Debug)]
struct YearMonth {
    year: i32,
    month: u32,
}

fn parse_month(value: &str) -> std::result::Result<YearMonth, String> {
    let first_day = NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d")
        .map_err(|_| format!("expected YYYY-MM, got {:?}", value))?;

    Ok(YearMonth {
        year: first_day.year(),
        month: first_day.month(),
    })
}

fn parse_weight(value: &str) -> std::result::Result<f64, String> {
    match value.parse::<f64>() {
        Ok(weight) if weight.is_finite() && weight >= 0.0 => Ok(weight),
        _ => Err(format!("expected a non-negative weight, got {:?}", value)),
    }
}

fn main() -> Result<()> {
    // Initialize logging
    liftlog_core::logging::init();

    let cli = Cli::parse();

    // Determine workout log
    let config = Config::load()?;
    let log_file = match cli.file {
        Some(file) => {
            tracing::debug!("Using workout log {:?} from --file", file);
            file
        }
        None => {
            tracing::debug!(
                "Using workout log {:?} from config {:?}",
                config.data.log_file,
                Config::default_config_path()
            );
            config.data.log_file.clone()
        }
    };

    match cli.command {
        Some(Commands::Best { json }) => cmd_best(&log_file, &config, json),
        Some(Commands::Day { date, json }) => cmd_day(&log_file, &config, date, json),
        Some(Commands::Dates { month, json }) => cmd_dates(&log_file, &config, month, json),
        Some(Commands::OneRm { weight, reps }) => cmd_one_rm(weight, reps, &config),
        Some(Commands::Check) => cmd_check(&log_file, &config),
        Some(Commands::Config { init }) => cmd_config(&config, init),
        None => {
            // Default to "best" command
            cmd_best(&log_file, &config, false)
        }
    }
}

fn load_store(log_file: &Path, config: &Config) -> Result<LoadReport> {
    let options = config.parsing.options()?;
    Ok(SessionStore::load(log_file, &options))
}

fn cmd_best(log_file: &Path, config: &Config, json: bool) -> Result<()> {
    let report = load_store(log_file, config)?;
    let best = best_performances(&report.store);

    if json {
        println!("{}", serde_json::to_string_pretty(&best)?);
        return Ok(());
    }

    if best.is_empty() {
        println!("No ranked sets logged yet.");
        return Ok(());
    }

    println!("Best performances (estimated 1RM)");
    println!();
    for performance in &best {
        println!(
            "  {}",
            format_best_performance(performance, &config.display.default_unit)
        );
    }

    Ok(())
}

fn cmd_day(log_file: &Path, config: &Config, date: NaiveDate, json: bool) -> Result<()> {
    let report = load_store(log_file, config)?;
    let day = day_report(&report.store, date);

    if json {
        println!("{}", serde_json::to_string_pretty(&day)?);
        return Ok(());
    }

    let Some(ref header) = day.header else {
        println!("No training logged on {}.", date.format("%Y-%m-%d"));
        return Ok(());
    };

    let unit = config.display.default_unit.as_str();
    println!("{}", format_header(header));

    for exercise in &day.exercises {
        println!();
        println!("{} :", exercise.exercise);
        for set in &exercise.sets {
            println!("  {}", format_set_line(set, unit));
        }

        match exercise.previous {
            Some(previous) => {
                println!("  Last time ({}):", previous.day().format("%Y-%m-%d"));
                for set in &exercise.previous_sets {
                    println!("    {}", format_set_line(set, unit));
                }
            }
            None => println!("  First time logged."),
        }
    }

    Ok(())
}

fn cmd_dates(
    log_file: &Path,
    config: &Config,
    month: Option<YearMonth>,
    json: bool,
) -> Result<()> {
    let report = load_store(log_file, config)?;
    let dates: Vec<NaiveDate> = training_dates(&report.store)
        .into_iter()
        .filter(|d| month.map_or(true, |m| d.year() == m.year && d.month() == m.month))
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&dates)?);
        return Ok(());
    }

    if dates.is_empty() {
        println!("No training days logged.");
        return Ok(());
    }

    for date in &dates {
        println!("{}", date.format("%Y-%m-%d"));
    }

    Ok(())
}

fn cmd_one_rm(weight: f64, reps: u32, config: &Config) -> Result<()> {
    println!(
        "Estimated 1RM: {} {}",
        estimate_one_rep_max(weight, reps),
        config.display.default_unit
    );
    Ok(())
}

fn cmd_check(log_file: &Path, config: &Config) -> Result<()> {
    let report = load_store(log_file, config)?;

    match report.source {
        SourceStatus::Missing => {
            println!("No workout log at {}", log_file.display());
            return Ok(());
        }
        SourceStatus::Unreadable(ref reason) => {
            println!("Could not read {}: {}", log_file.display(), reason);
            if report.store.is_empty() {
                return Ok(());
            }
            println!("Kept {} sets read before the error", report.store.len());
        }
        SourceStatus::Loaded => {
            println!(
                "Loaded {} sets from {}",
                report.store.len(),
                log_file.display()
            );
        }
    }

    if report.skipped.is_empty() {
        println!("✓ No skipped rows");
        return Ok(());
    }

    println!("Skipped rows: {}", report.skipped.len());
    for row in &report.skipped {
        println!("  line {}: {}", row.line, row.reason);
        if !row.content.is_empty() {
            println!("    {}", row.content);
        }
    }

    Ok(())
}

fn cmd_config(config: &Config, init: bool) -> Result<()> {
    let config_path = Config::default_config_path();

    if init {
        if config_path.exists() {
            println!("Config already exists at {}", config_path.display());
        } else {
            Config::default().save_to(&config_path)?;
            println!("✓ Wrote default config to {}", config_path.display());
        }
        return Ok(());
    }

    println!("# {}", config_path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
