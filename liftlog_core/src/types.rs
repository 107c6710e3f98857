//! Core domain types for the Liftlog report.
//!
//! This module defines:
//! - `TrainingSession`, one logged set as read from the workout CSV
//! - Derived query results (best performances, per-exercise groupings, day reports)

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

// ============================================================================
// Logged Sets
// ============================================================================

/// One logged set from the workout log
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrainingSession {
    pub date: NaiveDateTime,
    pub workout_name: String,
    pub exercise: String,
    pub set_number: u32,
    /// Absent for bodyweight or no-load exercises
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub distance: Option<String>,
    pub duration: Option<String>,
    pub measurement_unit: String,
    pub notes: String,
}

impl TrainingSession {
    /// Grouping key: the exercise name with surrounding whitespace removed.
    /// Comparison stays case-sensitive.
    pub fn exercise_key(&self) -> &str {
        self.exercise.trim()
    }

    /// Calendar day this set was logged on
    pub fn day(&self) -> NaiveDate {
        self.date.date()
    }

    /// Whether both weight and reps are present
    pub fn is_rankable(&self) -> bool {
        self.weight.is_some() && self.reps.is_some()
    }

    /// Rounded estimated 1RM, or `None` when weight or reps is missing
    pub fn estimated_one_rep_max(&self) -> Option<i64> {
        match (self.weight, self.reps) {
            (Some(weight), Some(reps)) => Some(crate::engine::estimate_one_rep_max(weight, reps)),
            _ => None,
        }
    }

    /// Rounded estimated 1RM for sorting; zero when the set is not rankable
    pub fn one_rep_max(&self) -> i64 {
        self.estimated_one_rep_max().unwrap_or(0)
    }
}

// ============================================================================
// Derived Query Results
// ============================================================================

/// The best-ever set for one exercise
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BestPerformance<'a> {
    pub exercise: &'a str,
    pub session: &'a TrainingSession,
    pub one_rep_max: i64,
}

/// All sets of one exercise on a given day, in log order
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExerciseGroup<'a> {
    pub exercise: &'a str,
    pub sets: Vec<&'a TrainingSession>,
}

/// Date-time and workout name of the first set logged on a day
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WorkoutHeader<'a> {
    pub started_at: NaiveDateTime,
    pub workout_name: &'a str,
}

/// A day's sets for one exercise joined with the last time it was trained
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ExerciseComparison<'a> {
    pub exercise: &'a str,
    pub sets: Vec<&'a TrainingSession>,
    /// Most recent set of this exercise strictly before the day
    pub previous: Option<&'a TrainingSession>,
    /// Every set of this exercise logged on the same day as `previous`
    pub previous_sets: Vec<&'a TrainingSession>,
}

/// Everything shown for a selected calendar day
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayReport<'a> {
    pub date: NaiveDate,
    pub header: Option<WorkoutHeader<'a>>,
    pub exercises: Vec<ExerciseComparison<'a>>,
}

impl DayReport<'_> {
    /// True when nothing was logged on the day
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }
}
