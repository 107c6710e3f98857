//! Text formatting of logged sets and query results.
//!
//! Shared by every presentation layer so the numbers read the same
//! everywhere: weights in shortest form (`100`, `102.5`), `N/A` for
//! missing values, rounded 1RM estimates.

use crate::{BestPerformance, TrainingSession, WorkoutHeader};
use std::fmt;

/// Placeholder for a value that was not logged
pub const NOT_AVAILABLE: &str = "N/A";

/// Format a weight without a trailing `.0`
pub fn format_weight(weight: f64) -> String {
    format!("{}", weight)
}

/// Format an optional value, falling back to `N/A`
pub fn format_optional<T: fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| v.to_string())
}

/// Unit label for a set: its own measurement unit, or `fallback` when blank
pub fn unit_label<'a>(session: &'a TrainingSession, fallback: &'a str) -> &'a str {
    match session.measurement_unit.trim() {
        "" => fallback,
        unit => unit,
    }
}

/// Day header: `2024-06-10 18:30 - Push Day`
pub fn format_header(header: &WorkoutHeader<'_>) -> String {
    format!(
        "{} - {}",
        header.started_at.format("%Y-%m-%d %H:%M"),
        header.workout_name
    )
}

/// One line per set: `Set: 1, Weight: 100 kg, Reps: 5, 1RM: 113 kg`
///
/// The 1RM part is only present when both weight and reps were logged.
pub fn format_set_line(session: &TrainingSession, default_unit: &str) -> String {
    let unit = unit_label(session, default_unit);
    let weight = session
        .weight
        .map_or_else(|| NOT_AVAILABLE.to_string(), |w| format!("{} {}", format_weight(w), unit));

    let mut line = format!(
        "Set: {}, Weight: {}, Reps: {}",
        session.set_number,
        weight,
        format_optional(session.reps)
    );

    if let Some(one_rep_max) = session.estimated_one_rep_max() {
        line.push_str(&format!(", 1RM: {} {}", one_rep_max, unit));
    }

    line
}

/// Summary of a best set: `Squat: 120 kg x 3 (1RM 129 kg) on 2024-06-03`
pub fn format_best_performance(best: &BestPerformance<'_>, default_unit: &str) -> String {
    let session = best.session;
    let unit = unit_label(session, default_unit);

    format!(
        "{}: {} {} x {} (1RM {} {}) on {}",
        best.exercise,
        format_optional(session.weight.map(format_weight)),
        unit,
        format_optional(session.reps),
        best.one_rep_max,
        unit,
        session.day().format("%Y-%m-%d")
    )
}

impl fmt::Display for TrainingSession {
    /// `Set: 2, Weight: 100 kg, Reps: 5, Notes: paused`, listing only the
    /// fields that were logged
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut details = Vec::new();

        if let Some(weight) = self.weight {
            details.push(format!(
                "Weight: {} {}",
                format_weight(weight),
                self.measurement_unit
            ));
        }
        if let Some(reps) = self.reps {
            details.push(format!("Reps: {}", reps));
        }
        if let Some(ref distance) = self.distance {
            details.push(format!("Distance: {}", distance));
        }
        if let Some(ref duration) = self.duration {
            details.push(format!("Duration: {}", duration));
        }
        if !self.notes.is_empty() {
            details.push(format!("Notes: {}", self.notes));
        }

        write!(f, "Set: {}", self.set_number)?;
        if !details.is_empty() {
            write!(f, ", {}", details.join(", "))?;
        }
        Ok(())
    }
}
