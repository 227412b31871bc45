//! Session entry: raw form state, sanitizing and validation.
//!
//! A [`SessionDraft`] holds exactly what the user typed. Numeric fields that
//! can't be read fall back to 0 and produce an [`InputWarning`] instead of an
//! error. Structural problems (blank exercise, out-of-range counts) are
//! rejected with [`Error::Validation`] when the draft is turned into a
//! [`Session`].

use crate::progression::recommend_for_sets;
use crate::{Error, Result, Session, SetEntry, WorkoutType};
use chrono::NaiveDateTime;
use std::fmt;
use std::ops::RangeInclusive;
use uuid::Uuid;

/// Allowed target reps per set
pub const TARGET_REPS_RANGE: RangeInclusive<u32> = 1..=30;

/// Allowed number of sets in one session
pub const SET_COUNT_RANGE: RangeInclusive<usize> = 1..=10;

/// Highest rep count accepted for a single set
pub const MAX_REPS: u32 = 100;

/// Which numeric field of a set was sanitized
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputField {
    Weight,
    Reps,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputField::Weight => f.write_str("weight"),
            InputField::Reps => f.write_str("reps"),
        }
    }
}

/// A numeric field that was replaced with 0
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InputWarning {
    /// 1-based set number
    pub set_index: usize,
    pub field: InputField,
    pub text: String,
}

impl fmt::Display for InputWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.text.is_empty() {
            write!(f, "Set {} {}: missing, using 0", self.set_index, self.field)
        } else {
            write!(
                f,
                "Set {} {}: could not read {:?}, using 0",
                self.set_index, self.field, self.text
            )
        }
    }
}

/// Raw text of one set as entered
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SetInput {
    pub weight: String,
    /// `None` when the reps field was never supplied, as opposed to left blank
    pub reps: Option<String>,
}

impl SetInput {
    pub fn new(weight: impl Into<String>, reps: impl Into<String>) -> Self {
        Self {
            weight: weight.into(),
            reps: Some(reps.into()),
        }
    }

    /// A set where only the weight was given
    pub fn weight_only(weight: impl Into<String>) -> Self {
        Self {
            weight: weight.into(),
            reps: None,
        }
    }
}

/// Parse a weight field. Blank means 0; unreadable, negative or non-finite
/// text yields `None`.
pub fn parse_weight(text: &str) -> Option<f64> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0.0);
    }
    text.parse::<f64>()
        .ok()
        .filter(|w| w.is_finite() && *w >= 0.0)
}

/// Parse a reps field. Blank means 0; anything else unreadable yields `None`.
pub fn parse_reps(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return Some(0);
    }
    text.parse::<u32>().ok()
}

/// Split a `WEIGHTxREPS` spec such as `135x10` into its raw fields
///
/// `x`, `X` and `*` are accepted as separators. Without a separator the whole
/// text is taken as the weight and reps are left missing.
pub fn parse_set_spec(spec: &str) -> SetInput {
    match spec.split_once(['x', 'X', '*']) {
        Some((weight, reps)) => SetInput::new(weight.trim(), reps.trim()),
        None => SetInput::weight_only(spec.trim()),
    }
}

/// Split a prompt line such as `135 10` into its raw fields
///
/// Tokens past the second are returned separately so the caller can report
/// that they were ignored.
pub fn parse_set_line(line: &str) -> (SetInput, Option<String>) {
    let mut fields = line.split_whitespace();
    let input = match (fields.next(), fields.next()) {
        (Some(weight), Some(reps)) => SetInput::new(weight, reps),
        (Some(weight), None) => SetInput::weight_only(weight),
        (None, _) => SetInput::new("", ""),
    };

    let extra: Vec<&str> = fields.collect();
    let extra = (!extra.is_empty()).then(|| extra.join(" "));
    (input, extra)
}

/// Form state for a session being entered
///
/// Owned by the caller and passed around explicitly; nothing here is global.
#[derive(Clone, Debug, Default)]
pub struct SessionDraft {
    pub workout_type: WorkoutType,
    pub exercise: String,
    pub target_reps: u32,
    pub sets: Vec<SetInput>,
}

impl SessionDraft {
    pub fn new(workout_type: WorkoutType, exercise: impl Into<String>, target_reps: u32) -> Self {
        Self {
            workout_type,
            exercise: exercise.into(),
            target_reps,
            sets: Vec::new(),
        }
    }

    /// Add a set from raw field text
    pub fn push_set(&mut self, weight: impl Into<String>, reps: impl Into<String>) {
        self.sets.push(SetInput::new(weight, reps));
    }

    /// Sanitized sets plus a warning for every field that fell back to 0
    pub fn sets(&self) -> (Vec<SetEntry>, Vec<InputWarning>) {
        let (sets, warnings) = self.sanitize();
        for warning in &warnings {
            tracing::debug!("{}", warning);
        }
        (sets, warnings)
    }

    fn sanitize(&self) -> (Vec<SetEntry>, Vec<InputWarning>) {
        let mut warnings = Vec::new();
        let sets = self
            .sets
            .iter()
            .enumerate()
            .map(|(idx, input)| {
                let weight = parse_weight(&input.weight).unwrap_or_else(|| {
                    warnings.push(InputWarning {
                        set_index: idx + 1,
                        field: InputField::Weight,
                        text: input.weight.clone(),
                    });
                    0.0
                });
                let reps = input
                    .reps
                    .as_deref()
                    .and_then(parse_reps)
                    .unwrap_or_else(|| {
                        warnings.push(InputWarning {
                            set_index: idx + 1,
                            field: InputField::Reps,
                            text: input.reps.clone().unwrap_or_default(),
                        });
                        0
                    });
                SetEntry::new(weight, reps)
            })
            .collect();
        (sets, warnings)
    }

    /// Live recommendation for the sets entered so far
    pub fn preview(&self) -> f64 {
        let (sets, _) = self.sanitize();
        recommend_for_sets(&sets, self.target_reps)
    }

    /// Check everything that would block saving
    pub fn validate(&self) -> Result<()> {
        if self.exercise.trim().is_empty() {
            return Err(Error::Validation("Please enter an exercise name.".into()));
        }
        if !TARGET_REPS_RANGE.contains(&self.target_reps) {
            return Err(Error::Validation(format!(
                "Target reps must be between {} and {}, got {}",
                TARGET_REPS_RANGE.start(),
                TARGET_REPS_RANGE.end(),
                self.target_reps
            )));
        }
        if !SET_COUNT_RANGE.contains(&self.sets.len()) {
            return Err(Error::Validation(format!(
                "A session needs between {} and {} sets, got {}",
                SET_COUNT_RANGE.start(),
                SET_COUNT_RANGE.end(),
                self.sets.len()
            )));
        }
        let (sets, _) = self.sanitize();
        if let Some((idx, set)) = sets.iter().enumerate().find(|(_, s)| s.reps > MAX_REPS) {
            return Err(Error::Validation(format!(
                "Set {} has {} reps, the maximum is {}",
                idx + 1,
                set.reps,
                MAX_REPS
            )));
        }
        Ok(())
    }

    /// Validate and build the session to be stored
    pub fn into_session(self, date: NaiveDateTime) -> Result<Session> {
        self.validate()?;
        let (sets, _) = self.sanitize();

        Ok(Session {
            id: Uuid::new_v4(),
            date,
            workout_type: self.workout_type.label().to_string(),
            exercise: self.exercise.trim().to_string(),
            target_reps: self.target_reps,
            sets,
        })
    }
}
