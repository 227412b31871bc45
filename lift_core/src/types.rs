//! Core domain types for the workout log.
//!
//! This module defines:
//! - Logged sets and sessions (the persisted records)
//! - Flattened per-set history rows
//! - Per-exercise recommendations (derived, never stored)
//! - Workout type labels

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

// ============================================================================
// Session Types
// ============================================================================

/// A single logged set.
///
/// A weight of zero marks a non-working set (warm-up or left blank) and is
/// ignored by the recommendation math.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct SetEntry {
    pub weight: f64,
    pub reps: u32,
}

impl SetEntry {
    pub fn new(weight: f64, reps: u32) -> Self {
        Self { weight, reps }
    }

    /// Whether this set counts towards progression
    pub fn is_working(&self) -> bool {
        self.weight > 0.0
    }
}

/// A recorded exercise session
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Session {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    #[serde(with = "date_format")]
    pub date: NaiveDateTime,
    pub workout_type: String,
    pub exercise: String,
    pub target_reps: u32,
    pub sets: Vec<SetEntry>,
}

// ============================================================================
// Derived Views
// ============================================================================

/// One row of the flattened history table
#[derive(Clone, Debug, PartialEq)]
pub struct SetRow {
    pub date: NaiveDateTime,
    pub workout_type: String,
    pub exercise: String,
    /// 1-based position of the set within its session
    pub set_index: usize,
    pub weight: f64,
    pub reps: u32,
    pub target_reps: u32,
}

/// Latest status and next-week suggestion for one exercise
#[derive(Clone, Debug, PartialEq)]
pub struct Recommendation {
    pub exercise: String,
    pub last_weight: f64,
    pub hit_target: bool,
    pub recommended_weight: f64,
}

// ============================================================================
// Workout Types
// ============================================================================

/// Workout split label attached to a session
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum WorkoutType {
    #[default]
    Upper,
    Lower,
    Push,
    Pull,
    Legs,
    FullBody,
    Custom(String),
}

impl WorkoutType {
    /// Parse a user-supplied label. Unknown labels become `Custom`.
    pub fn parse(s: &str) -> Self {
        let trimmed = s.trim();
        match trimmed.to_lowercase().as_str() {
            "upper" => WorkoutType::Upper,
            "lower" => WorkoutType::Lower,
            "push" => WorkoutType::Push,
            "pull" => WorkoutType::Pull,
            "legs" => WorkoutType::Legs,
            "full" | "full body" | "full_body" | "fullbody" => WorkoutType::FullBody,
            "" => WorkoutType::Custom("Custom".into()),
            _ => WorkoutType::Custom(trimmed.to_string()),
        }
    }

    /// Label as stored on the session
    pub fn label(&self) -> &str {
        match self {
            WorkoutType::Upper => "Upper",
            WorkoutType::Lower => "Lower",
            WorkoutType::Push => "Push",
            WorkoutType::Pull => "Pull",
            WorkoutType::Legs => "Legs",
            WorkoutType::FullBody => "Full Body",
            WorkoutType::Custom(label) => label,
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Date Format
// ============================================================================

/// Session dates are stored at minute precision, e.g. `2024-01-01 18:30`.
pub mod date_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse(&s).map_err(serde::de::Error::custom)
    }

    /// Parse a stored date, also accepting a bare `YYYY-MM-DD` (midnight)
    pub fn parse(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
        let s = s.trim();
        NaiveDateTime::parse_from_str(s, FORMAT).or_else(|e| {
            chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .map(|d| d.and_time(chrono::NaiveTime::MIN))
                .map_err(|_| e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_json_shape() {
        let json = r#"{
            "date": "2024-01-01 18:30",
            "workout_type": "Upper",
            "exercise": "Bench",
            "target_reps": 10,
            "sets": [{"weight": 135.0, "reps": 10}, {"weight": 0.0, "reps": 0}]
        }"#;

        let session: Session = serde_json::from_str(json).unwrap();
        assert_eq!(session.exercise, "Bench");
        assert_eq!(session.sets.len(), 2);
        assert!(session.sets[0].is_working());
        assert!(!session.sets[1].is_working());

        let out = serde_json::to_string(&session).unwrap();
        assert!(out.contains("\"date\":\"2024-01-01 18:30\""));
        assert!(out.contains(&session.id.to_string()));
    }

    #[test]
    fn test_date_accepts_bare_day() {
        let parsed = date_format::parse("2024-01-01").unwrap();
        assert_eq!(parsed.format(date_format::FORMAT).to_string(), "2024-01-01 00:00");
        assert!(date_format::parse("yesterday").is_err());
    }

    #[test]
    fn test_parse_workout_types() {
        assert_eq!(WorkoutType::parse("upper"), WorkoutType::Upper);
        assert_eq!(WorkoutType::parse("PUSH"), WorkoutType::Push);
        assert_eq!(WorkoutType::parse("full_body"), WorkoutType::FullBody);
        assert_eq!(WorkoutType::parse("Full Body").label(), "Full Body");

        match WorkoutType::parse("  Arms day ") {
            WorkoutType::Custom(s) => assert_eq!(s, "Arms day"),
            _ => panic!("Expected Custom variant"),
        }
        assert_eq!(WorkoutType::parse("").label(), "Custom");
    }
}
