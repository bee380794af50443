//! Score and handicap conversion.
//!
//! The forward direction (handicap to expected score) is closed form; the
//! inverse is a bounded search over whole handicaps, so both directions
//! always agree.

pub mod engine;
pub mod formula;
pub mod system;
pub mod table;

pub use engine::{adjusted_score, combine_predictions, Handicapper, ALLOWANCE_BASE};
pub use formula::{expected_arrow_score, raw_round_score};
pub use system::{average_handicap, round_handicap, RatingSystem};
pub use table::{DistanceTerm, HandicapTable, CURRENT, LEGACY};
