//! History aggregation over logged sessions.
//!
//! Sessions are flattened into one row per set, and the latest row for each
//! exercise drives the summary recommendation table.

use crate::progression::next_weight;
use crate::{Recommendation, Session, SetRow};
use std::collections::BTreeMap;

/// Flatten sessions into one row per logged set
///
/// Set indices start at 1 within each session. Sessions with no sets
/// contribute nothing.
pub fn flatten(sessions: &[Session]) -> Vec<SetRow> {
    let rows: Vec<SetRow> = sessions
        .iter()
        .flat_map(|session| {
            session.sets.iter().enumerate().map(move |(idx, set)| SetRow {
                date: session.date,
                workout_type: session.workout_type.clone(),
                exercise: session.exercise.clone(),
                set_index: idx + 1,
                weight: set.weight,
                reps: set.reps,
                target_reps: session.target_reps,
            })
        })
        .collect();

    tracing::debug!(
        "Flattened {} sessions into {} set rows",
        sessions.len(),
        rows.len()
    );
    rows
}

/// Latest status per exercise, keyed (and ordered) by exercise name
///
/// The latest row is the one with the greatest date. Rows sharing that date
/// resolve to whichever comes last in `rows`. Only that single row is
/// judged against its target, not the rest of its session.
pub fn latest_per_exercise(rows: &[SetRow]) -> BTreeMap<String, Recommendation> {
    let mut latest: BTreeMap<&str, &SetRow> = BTreeMap::new();

    for row in rows {
        latest
            .entry(row.exercise.as_str())
            .and_modify(|current| {
                if row.date >= current.date {
                    *current = row;
                }
            })
            .or_insert(row);
    }

    latest
        .into_iter()
        .map(|(exercise, row)| {
            let hit_target = row.reps >= row.target_reps;
            let recommendation = Recommendation {
                exercise: exercise.to_string(),
                last_weight: row.weight,
                hit_target,
                recommended_weight: next_weight(row.weight, hit_target),
            };
            (exercise.to_string(), recommendation)
        })
        .collect()
}

/// Sort rows for the history table: newest first, then exercise, then set
pub fn sort_for_display(rows: &mut [SetRow]) {
    rows.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then_with(|| a.exercise.cmp(&b.exercise))
            .then_with(|| a.set_index.cmp(&b.set_index))
    });
}
