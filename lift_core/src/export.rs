//! CSV export of the flattened history table.

use crate::types::date_format;
use crate::{Result, SetRow};
use std::fs::File;
use std::path::Path;

/// A row in the CSV output
#[derive(Debug, serde::Serialize)]
struct CsvRow<'a> {
    date: String,
    workout_type: &'a str,
    exercise: &'a str,
    set: usize,
    weight: f64,
    reps: u32,
    target_reps: u32,
}

impl<'a> From<&'a SetRow> for CsvRow<'a> {
    fn from(row: &'a SetRow) -> Self {
        CsvRow {
            date: row.date.format(date_format::FORMAT).to_string(),
            workout_type: &row.workout_type,
            exercise: &row.exercise,
            set: row.set_index,
            weight: row.weight,
            reps: row.reps,
            target_reps: row.target_reps,
        }
    }
}

/// Write history rows to a CSV file, replacing any existing file
///
/// Returns the number of rows written. The file is synced to disk before
/// returning.
pub fn export_rows_csv(rows: &[SetRow], path: &Path) -> Result<usize> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(file);

    for row in rows {
        writer.serialize(CsvRow::from(row))?;
    }

    // Headers are only emitted alongside the first record
    if rows.is_empty() {
        writer.write_record([
            "date",
            "workout_type",
            "exercise",
            "set",
            "weight",
            "reps",
            "target_reps",
        ])?;
    }

    writer.flush()?;
    let file = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
    file.sync_all()?;

    tracing::info!("Exported {} rows to {:?}", rows.len(), path);
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::flatten;
    use crate::{Session, SetEntry};
    use uuid::Uuid;

    fn create_test_session(exercise: &str) -> Session {
        Session {
            id: Uuid::new_v4(),
            date: date_format::parse("2024-01-01 18:30").unwrap(),
            workout_type: "Full Body".into(),
            exercise: exercise.into(),
            target_reps: 5,
            sets: vec![SetEntry::new(225.0, 5), SetEntry::new(227.5, 4)],
        }
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("out").join("history.csv");

        let rows = flatten(&[create_test_session("Squat"), create_test_session("Deadlift")]);
        let count = export_rows_csv(&rows, &csv_path).unwrap();
        assert_eq!(count, 4);

        let content = std::fs::read_to_string(&csv_path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next(),
            Some("date,workout_type,exercise,set,weight,reps,target_reps")
        );
        assert_eq!(lines.next(), Some("2024-01-01 18:30,Full Body,Squat,1,225.0,5,5"));

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 4);
    }

    #[test]
    fn test_export_empty_history_has_header_only() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("empty.csv");

        let count = export_rows_csv(&[], &csv_path).unwrap();
        assert_eq!(count, 0);

        let content = std::fs::read_to_string(&csv_path).unwrap();
        assert_eq!(content.lines().count(), 1);
        assert!(content.starts_with("date,workout_type"));
    }

    #[test]
    fn test_export_overwrites() {
        let temp_dir = tempfile::tempdir().unwrap();
        let csv_path = temp_dir.path().join("history.csv");

        export_rows_csv(&flatten(&[create_test_session("Squat")]), &csv_path).unwrap();
        export_rows_csv(&flatten(&[create_test_session("Row")]), &csv_path).unwrap();

        let reader = csv::Reader::from_path(&csv_path).unwrap();
        assert_eq!(reader.into_records().count(), 2);
    }
}
