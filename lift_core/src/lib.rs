#![forbid(unsafe_code)]

//! Core domain model and business logic for the liftlog workout tracker.
//!
//! This crate provides:
//! - Domain types (sets, sessions, history rows, recommendations)
//! - Progressive overload recommendation
//! - History aggregation
//! - Session entry sanitizing and validation
//! - Persistence (JSON session store, CSV export)
//! - Rest timer

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod progression;
pub mod history;
pub mod input;
pub mod store;
pub mod export;
pub mod timer;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use progression::{recommend, recommend_for_sets};
pub use history::{flatten, latest_per_exercise, sort_for_display};
pub use input::{InputWarning, SessionDraft};
pub use store::{JsonFileStore, SessionStore};
pub use export::export_rows_csv;
pub use timer::{RestTimer, RestTimerHandle, TimerOutcome};
