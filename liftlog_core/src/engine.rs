//! Performance queries over the session store.
//!
//! All functions here are pure reads of an immutable [`SessionStore`]:
//! - Best set per exercise, ranked by estimated 1RM
//! - Sets performed on a calendar day, grouped by exercise
//! - Most recent earlier occurrence of an exercise
//! - Distinct training days for calendar marking
//!
//! Exercise names are grouped case-sensitively after trimming surrounding
//! whitespace. Groups appear in the order their first set was logged.

use crate::{
    BestPerformance, DayReport, ExerciseComparison, ExerciseGroup, SessionStore,
    TrainingSession, WorkoutHeader,
};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// Per-rep increment of the Epley estimate (`1 + reps / 40`)
pub const EPLEY_FACTOR: f64 = 0.025;

/// Unrounded Epley estimate: `weight * (1 + 0.025 * reps)`
pub fn epley(weight: f64, reps: u32) -> f64 {
    weight * (1.0 + EPLEY_FACTOR * f64::from(reps))
}

/// Estimated one-repetition maximum, rounded to the nearest integer
///
/// Halves round away from zero (`112.5` becomes `113`). Out-of-range
/// results saturate at the `i64` bounds.
pub fn estimate_one_rep_max(weight: f64, reps: u32) -> i64 {
    epley(weight, reps).round() as i64
}

/// Best-ever set per exercise
///
/// Only sets with both weight and reps take part. Within an exercise the
/// set with the highest unrounded estimate wins; on a tie the one logged
/// first is kept.
pub fn best_performances(store: &SessionStore) -> Vec<BestPerformance<'_>> {
    let mut best: Vec<(f64, &TrainingSession)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for session in store {
        let (Some(weight), Some(reps)) = (session.weight, session.reps) else {
            continue;
        };
        let estimate = epley(weight, reps);

        match index.get(session.exercise_key()) {
            Some(&slot) => {
                if estimate > best[slot].0 {
                    best[slot] = (estimate, session);
                }
            }
            None => {
                index.insert(session.exercise_key(), best.len());
                best.push((estimate, session));
            }
        }
    }

    tracing::debug!("Ranked best performances for {} exercises", best.len());

    best.into_iter()
        .map(|(_, session)| BestPerformance {
            exercise: session.exercise_key(),
            session,
            one_rep_max: session.one_rep_max(),
        })
        .collect()
}

/// Sets logged on `date`, grouped by exercise
///
/// Time of day is ignored. Within each group the sets keep their log order.
pub fn sessions_on_date(store: &SessionStore, date: NaiveDate) -> Vec<ExerciseGroup<'_>> {
    group_by_exercise(store.iter().filter(|s| s.day() == date))
}

/// Most recent set of `exercise` logged on a day strictly before `before`
///
/// The exercise name is trimmed before comparing. When several sets share
/// the latest timestamp, the one logged first is returned.
pub fn most_recent_prior<'a>(
    store: &'a SessionStore,
    exercise: &str,
    before: NaiveDate,
) -> Option<&'a TrainingSession> {
    let exercise = exercise.trim();

    let mut latest: Option<&TrainingSession> = None;
    for session in store
        .iter()
        .filter(|s| s.exercise_key() == exercise && s.day() < before)
    {
        if latest.map_or(true, |current| session.date > current.date) {
            latest = Some(session);
        }
    }

    latest
}

/// Distinct calendar days with at least one logged set
pub fn training_dates(store: &SessionStore) -> BTreeSet<NaiveDate> {
    store.iter().map(TrainingSession::day).collect()
}

/// Start time and workout name of the first set logged on `date`
pub fn workout_header(store: &SessionStore, date: NaiveDate) -> Option<WorkoutHeader<'_>> {
    store
        .iter()
        .find(|s| s.day() == date)
        .map(|first| WorkoutHeader {
            started_at: first.date,
            workout_name: &first.workout_name,
        })
}

/// Everything shown for a selected day: header, the day's sets per
/// exercise, and each exercise's previous occurrence
pub fn day_report(store: &SessionStore, date: NaiveDate) -> DayReport<'_> {
    let exercises = sessions_on_date(store, date)
        .into_iter()
        .map(|group| {
            let previous = most_recent_prior(store, group.exercise, date);
            let previous_sets = previous
                .map(|prior| {
                    store
                        .iter()
                        .filter(|s| s.exercise_key() == group.exercise && s.day() == prior.day())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default();

            ExerciseComparison {
                exercise: group.exercise,
                sets: group.sets,
                previous,
                previous_sets,
            }
        })
        .collect();

    DayReport {
        date,
        header: workout_header(store, date),
        exercises,
    }
}

fn group_by_exercise<'a>(
    sessions: impl Iterator<Item = &'a TrainingSession>,
) -> Vec<ExerciseGroup<'a>> {
    let mut groups: Vec<ExerciseGroup<'a>> = Vec::new();
    let mut index: HashMap<&'a str, usize> = HashMap::new();

    for session in sessions {
        let key = session.exercise_key();
        match index.get(key) {
            Some(&slot) => groups[slot].sets.push(session),
            None => {
                index.insert(key, groups.len());
                groups.push(ExerciseGroup {
                    exercise: key,
                    sets: vec![session],
                });
            }
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn at(date: &str) -> NaiveDateTime {
        let text = if date.len() == 10 {
            format!("{} 00:00:00", date)
        } else {
            date.to_string()
        };
        NaiveDateTime::parse_from_str(&text, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn day(date: &str) -> NaiveDate {
        NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap()
    }

    fn set(
        date: &str,
        exercise: &str,
        set_number: u32,
        weight: Option<f64>,
        reps: Option<u32>,
    ) -> TrainingSession {
        TrainingSession {
            date: at(date),
            workout_name: "Workout".into(),
            exercise: exercise.into(),
            set_number,
            weight,
            reps,
            distance: None,
            duration: None,
            measurement_unit: "kg".into(),
            notes: String::new(),
        }
    }

    fn store(sessions: Vec<TrainingSession>) -> SessionStore {
        SessionStore::from_sessions(sessions)
    }

    #[test]
    fn test_epley_estimate() {
        assert_eq!(estimate_one_rep_max(100.0, 10), 125);
        assert_eq!(estimate_one_rep_max(120.0, 3), 129);
        assert_eq!(estimate_one_rep_max(100.0, 5), 113);
        assert_eq!(estimate_one_rep_max(80.0, 0), 80);
        assert!((epley(100.0, 5) - 112.5).abs() < 1e-9);
    }

    #[test]
    fn test_estimate_is_monotonic() {
        let weights = [0.0, 2.5, 20.0, 57.5, 100.0, 142.5, 250.0];
        for reps in 0..30 {
            for pair in weights.windows(2) {
                assert!(
                    estimate_one_rep_max(pair[0], reps) <= estimate_one_rep_max(pair[1], reps)
                );
            }
        }
        for weight in weights {
            for reps in 0..30 {
                assert!(
                    estimate_one_rep_max(weight, reps) <= estimate_one_rep_max(weight, reps + 1)
                );
            }
        }
    }

    #[test]
    fn test_best_performance_ranks_by_estimate() {
        let store = store(vec![
            set("2024-06-03", "Squat", 1, Some(100.0), Some(5)),
            set("2024-06-03", "Squat", 2, Some(120.0), Some(3)),
            set("2024-06-05", "Squat", 1, Some(110.0), Some(1)),
        ]);

        let best = best_performances(&store);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].exercise, "Squat");
        assert_eq!(best[0].session.weight, Some(120.0));
        assert_eq!(best[0].session.reps, Some(3));
        assert_eq!(best[0].one_rep_max, 129);
    }

    #[test]
    fn test_best_performance_prefers_estimate_over_raw_weight() {
        let store = store(vec![
            set("2024-06-03", "Bench Press", 1, Some(100.0), Some(1)),
            set("2024-06-03", "Bench Press", 2, Some(90.0), Some(10)),
        ]);

        let best = best_performances(&store);
        assert_eq!(best[0].session.set_number, 2);
    }

    #[test]
    fn test_best_performance_skips_unrankable_sets() {
        let store = store(vec![
            set("2024-06-03", "Pull Up", 1, None, Some(12)),
            set("2024-06-03", "Sled", 1, Some(200.0), None),
            set("2024-06-03", "Squat", 1, Some(60.0), Some(5)),
        ]);

        let best = best_performances(&store);
        assert_eq!(best.len(), 1);
        assert_eq!(best[0].exercise, "Squat");
    }

    #[test]
    fn test_best_performance_ties_keep_first() {
        let store = store(vec![
            set("2024-06-03", "Deadlift", 1, Some(100.0), Some(4)),
            set("2024-06-10", "Deadlift", 1, Some(100.0), Some(4)),
        ]);

        let best = best_performances(&store);
        assert_eq!(best[0].session.date, at("2024-06-03"));
    }

    #[test]
    fn test_best_performance_groups_trimmed_case_sensitive() {
        let store = store(vec![
            set("2024-06-03", "Squat", 1, Some(100.0), Some(5)),
            set("2024-06-03", " Squat ", 2, Some(140.0), Some(2)),
            set("2024-06-03", "squat", 3, Some(50.0), Some(5)),
            set("2024-06-03", "Bench Press", 1, Some(80.0), Some(5)),
        ]);

        let best = best_performances(&store);
        let exercises: Vec<_> = best.iter().map(|b| b.exercise).collect();
        assert_eq!(exercises, vec!["Squat", "squat", "Bench Press"]);
        assert_eq!(best[0].session.set_number, 2);
    }

    #[test]
    fn test_sessions_on_date_grouping_and_order() {
        let store = store(vec![
            set("2024-06-09 18:00:00", "Bench Press", 1, Some(80.0), Some(5)),
            set("2024-06-10 18:00:00", "Bench Press", 3, Some(100.0), Some(5)),
            set("2024-06-10 18:05:00", "Row", 1, Some(60.0), Some(10)),
            set("2024-06-10 18:10:00", "Bench Press", 1, Some(100.0), Some(5)),
            set("2024-06-10 18:15:00", "Row ", 2, Some(60.0), Some(10)),
            set("2024-06-11 09:00:00", "Row", 1, Some(60.0), Some(10)),
        ]);

        let groups = sessions_on_date(&store, day("2024-06-10"));
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].exercise, "Bench Press");
        assert_eq!(groups[1].exercise, "Row");

        let bench: Vec<_> = groups[0].sets.iter().map(|s| s.set_number).collect();
        assert_eq!(bench, vec![3, 1]);
        let row: Vec<_> = groups[1].sets.iter().map(|s| s.set_number).collect();
        assert_eq!(row, vec![1, 2]);

        assert_eq!(groups, sessions_on_date(&store, day("2024-06-10")));
        assert!(sessions_on_date(&store, day("2024-06-12")).is_empty());
    }

    #[test]
    fn test_most_recent_prior() {
        let store = store(vec![
            set("2024-05-20 18:00:00", "Bench Press", 1, Some(90.0), Some(5)),
            set("2024-06-03 18:00:00", "Bench Press", 1, Some(95.0), Some(5)),
            set("2024-06-01 18:00:00", "Bench Press", 1, Some(92.5), Some(5)),
            set("2024-06-10 07:00:00", "Bench Press", 1, Some(100.0), Some(5)),
            set("2024-06-07 18:00:00", "Squat", 1, Some(120.0), Some(5)),
        ]);

        let prior = most_recent_prior(&store, "Bench Press", day("2024-06-10")).unwrap();
        assert_eq!(prior.weight, Some(95.0));

        let prior = most_recent_prior(&store, "  Bench Press ", day("2024-06-02")).unwrap();
        assert_eq!(prior.weight, Some(92.5));

        assert!(most_recent_prior(&store, "Bench Press", day("2024-05-20")).is_none());
        assert!(most_recent_prior(&store, "Deadlift", day("2024-06-10")).is_none());
    }

    #[test]
    fn test_most_recent_prior_tie_keeps_first() {
        let store = store(vec![
            set("2024-06-03 18:00:00", "Squat", 1, Some(100.0), Some(5)),
            set("2024-06-03 18:00:00", "Squat", 2, Some(105.0), Some(5)),
        ]);

        let prior = most_recent_prior(&store, "Squat", day("2024-06-10")).unwrap();
        assert_eq!(prior.set_number, 1);
    }

    #[test]
    fn test_training_dates() {
        let store = store(vec![
            set("2024-06-10 18:00:00", "Squat", 1, Some(100.0), Some(5)),
            set("2024-06-03 08:00:00", "Squat", 1, Some(100.0), Some(5)),
            set("2024-06-10 19:00:00", "Row", 1, Some(60.0), Some(8)),
        ]);

        let dates: Vec<_> = training_dates(&store).into_iter().collect();
        assert_eq!(dates, vec![day("2024-06-03"), day("2024-06-10")]);
    }

    #[test]
    fn test_day_report_joins_previous_occurrence() {
        let mut first = set("2024-06-03 18:00:00", "Squat", 1, Some(100.0), Some(5));
        first.workout_name = "Legs A".into();
        let mut today = set("2024-06-10 17:45:00", "Squat", 1, Some(105.0), Some(5));
        today.workout_name = "Legs B".into();

        let store = store(vec![
            first,
            set("2024-06-03 18:00:00", "Squat", 2, Some(100.0), Some(5)),
            today,
            set("2024-06-10 18:00:00", "Lunge", 1, None, Some(12)),
        ]);

        let report = day_report(&store, day("2024-06-10"));
        let header = report.header.as_ref().unwrap();
        assert_eq!(header.workout_name, "Legs B");
        assert_eq!(header.started_at, at("2024-06-10 17:45:00"));

        assert_eq!(report.exercises.len(), 2);
        let squat = &report.exercises[0];
        assert_eq!(squat.exercise, "Squat");
        assert_eq!(squat.previous.map(|s| s.day()), Some(day("2024-06-03")));
        assert_eq!(squat.previous_sets.len(), 2);

        let lunge = &report.exercises[1];
        assert!(lunge.previous.is_none());
        assert!(lunge.previous_sets.is_empty());
    }

    #[test]
    fn test_queries_on_empty_store() {
        let store = SessionStore::default();
        let date = day("2024-06-10");

        assert!(best_performances(&store).is_empty());
        assert!(sessions_on_date(&store, date).is_empty());
        assert!(most_recent_prior(&store, "Squat", date).is_none());
        assert!(training_dates(&store).is_empty());
        assert!(workout_header(&store, date).is_none());
        assert!(day_report(&store, date).is_empty());
    }
}
