//! Archery score keeping engine.
//!
//! Turns arrows into score pads and totals, converts between scores and
//! handicaps under the legacy and current rating systems, and looks up
//! classifications.

pub mod assess;
pub mod classification;
pub mod config;
pub mod error;
pub mod handicap;
pub mod output;
pub mod round;
pub mod scoring;
pub mod tables;
pub mod tally;

pub use error::{Error, Result};
