//! Load-once, read-many store of logged sets.
//!
//! The store is built a single time from the workout CSV and never changes
//! afterwards. Every query in [`crate::engine`] reads from it.

use crate::parser::{self, ParseOptions, SkippedRow};
use crate::TrainingSession;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

/// Immutable, ordered collection of logged sets
#[derive(Clone, Debug, Default)]
pub struct SessionStore {
    sessions: Vec<TrainingSession>,
}

/// What happened to the source file during a load
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SourceStatus {
    /// File was read (possibly with skipped rows)
    Loaded,
    /// File does not exist; the store is empty
    Missing,
    /// File exists but could not be opened or read to the end; the store
    /// holds whatever was parsed before the error
    Unreadable(String),
}

/// Result of loading a store: the store itself plus per-row diagnostics
#[derive(Clone, Debug)]
pub struct LoadReport {
    pub store: SessionStore,
    pub skipped: Vec<SkippedRow>,
    pub source: SourceStatus,
}

impl SessionStore {
    /// Build a store from already parsed sets, keeping their order
    pub fn from_sessions(sessions: Vec<TrainingSession>) -> Self {
        Self { sessions }
    }

    /// Load the workout log at `path`
    ///
    /// Never fails. A missing file or one that cannot be opened yields an
    /// empty store, and malformed rows are listed in [`LoadReport::skipped`].
    /// A read error part way through keeps the sets parsed before it and
    /// reports the source as [`SourceStatus::Unreadable`].
    pub fn load(path: &Path, options: &ParseOptions) -> LoadReport {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No workout log found at {:?}, starting empty", path);
                return LoadReport::empty(SourceStatus::Missing);
            }
            Err(e) => {
                tracing::warn!(
                    "Unable to open workout log {:?}: {}. Starting empty.",
                    path,
                    e
                );
                return LoadReport::empty(SourceStatus::Unreadable(e.to_string()));
            }
        };

        let parsed = parser::parse_log(BufReader::new(file), options);

        let source = match parsed.read_error {
            Some(reason) => {
                tracing::warn!(
                    "Reading workout log {:?} failed after {} sets: {}",
                    path,
                    parsed.sessions.len(),
                    reason
                );
                SourceStatus::Unreadable(reason)
            }
            None => {
                tracing::info!(
                    "Loaded {} sets from {:?} ({} skipped)",
                    parsed.sessions.len(),
                    path,
                    parsed.skipped.len()
                );
                SourceStatus::Loaded
            }
        };

        LoadReport {
            store: Self::from_sessions(parsed.sessions),
            skipped: parsed.skipped,
            source,
        }
    }

    /// All sets in log order
    pub fn sessions(&self) -> &[TrainingSession] {
        &self.sessions
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrainingSession> {
        self.sessions.iter()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl<'a> IntoIterator for &'a SessionStore {
    type Item = &'a TrainingSession;
    type IntoIter = std::slice::Iter<'a, TrainingSession>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl LoadReport {
    fn empty(source: SourceStatus) -> Self {
        Self {
            store: SessionStore::default(),
            skipped: Vec::new(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RowParseError;

    const SAMPLE: &str = "\
Date,WorkoutName,Exercise,Set,Weight,Reps,Distance,Duration,MeasurementUnit,Notes
2024-06-03 18:00:00,Legs,Squat,1,100,5,,,kg,
2024-06-03 18:00:00,Legs,Squat,X,100,5,,,kg,
2024-06-03 18:00:00,Legs,Squat,2,120,3,,,kg,
2024-06-05 07:30:00,Cardio,Run,1,,,5,00:28:00,km,easy
";

    #[test]
    fn test_load_from_file() {
        crate::logging::init_test();

        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("workouts.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let report = SessionStore::load(&path, &ParseOptions::default());
        assert_eq!(report.source, SourceStatus::Loaded);
        assert_eq!(report.store.len(), 3);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].line, 3);
        assert_eq!(
            report.skipped[0].reason,
            RowParseError::SetNumber { value: "X".into() }
        );

        let exercises: Vec<_> = report.store.iter().map(|s| s.exercise.as_str()).collect();
        assert_eq!(exercises, vec!["Squat", "Squat", "Run"]);
    }

    #[test]
    fn test_missing_file_yields_empty_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("nonexistent.csv");

        let report = SessionStore::load(&path, &ParseOptions::default());
        assert_eq!(report.source, SourceStatus::Missing);
        assert!(report.store.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_directory_is_unreadable_not_fatal() {
        let temp_dir = tempfile::tempdir().unwrap();

        let report = SessionStore::load(temp_dir.path(), &ParseOptions::default());
        assert!(report.store.is_empty());
        assert!(report.skipped.is_empty());
        assert!(matches!(report.source, SourceStatus::Unreadable(_)));
    }

    #[test]
    fn test_store_preserves_order() {
        let parsed = parser::parse_str(SAMPLE, &ParseOptions::default());
        let store = SessionStore::from_sessions(parsed.sessions);

        let sets: Vec<_> = (&store).into_iter().map(|s| s.set_number).collect();
        assert_eq!(sets, vec![1, 2, 1]);
        assert_eq!(store.sessions().len(), store.len());
    }
}
