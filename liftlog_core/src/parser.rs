//! Record parser for the flat workout CSV.
//!
//! Each data line carries ten positional columns:
//! `Date, WorkoutName, Exercise, Set, Weight, Reps, Distance, Duration, MeasurementUnit, Notes`.
//! The first line is a header and is always skipped. A malformed line is
//! reported as a [`SkippedRow`] and parsing moves on to the next one.
//!
//! Dates are accepted year-first (`2024-06-10`), as numeric dates ordered by
//! [`DateOrder`] with a two- or four-digit year (`10/06/24`, `10.06.2024`),
//! or with an English month name (`10 June 2024`, `Jun 10, 2024`). Weekday
//! names and other languages are not recognised.

use crate::{RowParseError, TrainingSession};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::io;

/// Number of positional columns in a data line
pub const COLUMN_COUNT: usize = 10;

/// Column names as they appear in the header line
pub const HEADER: [&str; COLUMN_COUNT] = [
    "Date",
    "WorkoutName",
    "Exercise",
    "Set",
    "Weight",
    "Reps",
    "Distance",
    "Duration",
    "MeasurementUnit",
    "Notes",
];

const ISO_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];
const DAY_FIRST_FORMATS: &[&str] = &["%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y"];
const DAY_FIRST_SHORT_YEAR_FORMATS: &[&str] = &["%d/%m/%y", "%d.%m.%y", "%d-%m-%y"];
const MONTH_FIRST_FORMATS: &[&str] = &["%m/%d/%Y", "%m.%d.%Y", "%m-%d-%Y"];
const MONTH_FIRST_SHORT_YEAR_FORMATS: &[&str] = &["%m/%d/%y", "%m.%d.%y", "%m-%d-%y"];
const MONTH_NAME_FORMATS: &[&str] = &[
    "%d %B %Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %b %Y",
    "%b %d %Y",
    "%b %d, %Y",
];
const TIME_FORMATS: &[&str] = &[
    "%H:%M:%S",
    "%H:%M:%S%.f",
    "%H:%M",
    "%I:%M:%S %p",
    "%I:%M %p",
];

/// Field order of numeric dates that are not year-first
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateOrder {
    /// `10/06/2024` is 10 June
    #[default]
    DayFirst,
    /// `06/10/2024` is 10 June
    MonthFirst,
}

/// Knobs for reading a workout log
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseOptions {
    pub delimiter: u8,
    pub date_order: DateOrder,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            date_order: DateOrder::default(),
        }
    }
}

/// A data line that was left out of the store
#[derive(Clone, Debug, PartialEq)]
pub struct SkippedRow {
    /// 1-based line number in the source, header included
    pub line: u64,
    pub content: String,
    pub reason: RowParseError,
}

/// Outcome of parsing a whole log: the rows that made it and the ones that didn't
#[derive(Clone, Debug, Default)]
pub struct ParsedLog {
    pub sessions: Vec<TrainingSession>,
    pub skipped: Vec<SkippedRow>,
    /// Set when reading stopped early on an I/O error
    pub read_error: Option<String>,
}

/// Parse a workout log from any reader
///
/// Never fails as a whole. Rows that cannot be parsed end up in
/// [`ParsedLog::skipped`]. An I/O error stops reading, keeps what was
/// parsed so far and is reported in [`ParsedLog::read_error`].
pub fn parse_log<R: io::Read>(reader: R, options: &ParseOptions) -> ParsedLog {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .delimiter(options.delimiter)
        .from_reader(reader);

    let separator = char::from(options.delimiter).to_string();
    let mut parsed = ParsedLog::default();

    match csv_reader.byte_headers() {
        Ok(headers) if !headers.is_empty() && !header_matches(headers) => {
            tracing::warn!(
                "Unexpected header {:?}, reading columns by position",
                String::from_utf8_lossy(headers.as_slice())
            );
        }
        Ok(_) => {}
        Err(e) => {
            tracing::error!("Stopped reading workout log: {}", e);
            parsed.read_error = Some(e.to_string());
            return parsed;
        }
    }

    for result in csv_reader.byte_records() {
        let record = match result {
            Ok(record) => record,
            Err(e) => {
                tracing::error!("Stopped reading workout log: {}", e);
                parsed.read_error = Some(e.to_string());
                break;
            }
        };

        let line = record.position().map_or(0, |p| p.line());
        let outcome = match record
            .iter()
            .map(std::str::from_utf8)
            .collect::<Result<Vec<&str>, _>>()
        {
            Ok(fields) => parse_record(&fields, options.date_order)
                .map_err(|reason| (reason, fields.join(separator.as_str()))),
            Err(e) => {
                let content = record
                    .iter()
                    .map(String::from_utf8_lossy)
                    .collect::<Vec<_>>()
                    .join(separator.as_str());
                Err((
                    RowParseError::Encoding {
                        message: e.to_string(),
                    },
                    content,
                ))
            }
        };

        match outcome {
            Ok(session) => parsed.sessions.push(session),
            Err((reason, content)) => {
                tracing::warn!("Skipping line {}: {} ({:?})", line, reason, content);
                parsed.skipped.push(SkippedRow {
                    line,
                    content,
                    reason,
                });
            }
        }
    }

    parsed
}

/// Parse a workout log held in memory
pub fn parse_str(text: &str, options: &ParseOptions) -> ParsedLog {
    parse_log(text.as_bytes(), options)
}

/// Turn the fields of one data line into a `TrainingSession`
pub fn parse_record(
    fields: &[&str],
    date_order: DateOrder,
) -> Result<TrainingSession, RowParseError> {
    let [date, workout_name, exercise, set, weight, reps, distance, duration, unit, notes] = fields
    else {
        return Err(RowParseError::ColumnCount {
            found: fields.len(),
        });
    };

    let date = parse_date(date, date_order).ok_or_else(|| RowParseError::Date {
        value: date.to_string(),
    })?;

    let set_number = set
        .trim()
        .parse::<u32>()
        .map_err(|_| RowParseError::SetNumber {
            value: set.to_string(),
        })?;

    let weight = match *weight {
        "" => None,
        raw => Some(parse_weight(raw).ok_or_else(|| RowParseError::Weight {
            value: raw.to_string(),
        })?),
    };

    let reps = match *reps {
        "" => None,
        raw => Some(raw.trim().parse::<u32>().map_err(|_| RowParseError::Reps {
            value: raw.to_string(),
        })?),
    };

    Ok(TrainingSession {
        date,
        workout_name: workout_name.to_string(),
        exercise: exercise.to_string(),
        set_number,
        weight,
        reps,
        distance: non_empty(distance),
        duration: non_empty(duration),
        measurement_unit: unit.to_string(),
        notes: notes.to_string(),
    })
}

/// Parse a logged date, with or without a time of day
///
/// Year-first dates need a four-digit year. Slash, dot and dash separated
/// dates that start with the day or month follow `order` and take a two-
/// or four-digit year. A missing time means midnight; an RFC 3339 offset is
/// dropped and the wall time kept.
pub fn parse_date(value: &str, order: DateOrder) -> Option<NaiveDateTime> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.naive_local());
    }

    if let Some(day) = parse_day(value, order) {
        return Some(day.and_time(NaiveTime::MIN));
    }

    // Month names contain spaces, so try every split between day and time
    value.match_indices([' ', 'T']).find_map(|(at, _)| {
        let day = parse_day(&value[..at], order)?;
        let time = parse_time(value[at + 1..].trim())?;
        Some(day.and_time(time))
    })
}

fn parse_day(value: &str, order: DateOrder) -> Option<NaiveDate> {
    let formats = if value.chars().any(|c| c.is_ascii_alphabetic()) {
        MONTH_NAME_FORMATS
    } else if value.len() >= 4 && value.as_bytes()[..4].iter().all(u8::is_ascii_digit) {
        ISO_DATE_FORMATS
    } else {
        let year_digits = value.rsplit(['/', '.', '-']).next().map_or(0, str::len);
        match (order, year_digits) {
            (DateOrder::DayFirst, 4) => DAY_FIRST_FORMATS,
            (DateOrder::DayFirst, 2) => DAY_FIRST_SHORT_YEAR_FORMATS,
            (DateOrder::MonthFirst, 4) => MONTH_FIRST_FORMATS,
            (DateOrder::MonthFirst, 2) => MONTH_FIRST_SHORT_YEAR_FORMATS,
            _ => return None,
        }
    };

    formats
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
}

fn header_matches(headers: &csv::ByteRecord) -> bool {
    headers.len() == COLUMN_COUNT
        && headers.iter().zip(HEADER).all(|(field, name)| {
            std::str::from_utf8(field).map_or(false, |f| f.trim().eq_ignore_ascii_case(name))
        })
}

fn parse_time(value: &str) -> Option<NaiveTime> {
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(value, format).ok())
}

fn parse_weight(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|weight| weight.is_finite())
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
