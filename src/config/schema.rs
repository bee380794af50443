use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::handicap::RatingSystem;
use crate::scoring::{GoldsMode, DEFAULT_END_SIZE};

fn default_end_size() -> usize {
    DEFAULT_END_SIZE
}

/// Application configuration, read from `~/.config/quiver/config.yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Handicap scheme used for every calculation.
    #[serde(default)]
    pub system: RatingSystem,
    /// Overrides the per-round golds default when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub golds: Option<GoldsMode>,
    #[serde(default = "default_end_size")]
    pub end_size: usize,
    /// Row size on the score pad; falls back to `end_size`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pad_end_size: Option<usize>,
    /// Compound scoring: only the inner ten counts as ten.
    #[serde(default)]
    pub inner_ten: bool,
    /// Extra rounds merged over the built-in catalogue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounds_file: Option<PathBuf>,
    /// Classification tables merged over the built-in ones.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifications_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            system: RatingSystem::default(),
            golds: None,
            end_size: DEFAULT_END_SIZE,
            pad_end_size: None,
            inner_ten: false,
            rounds_file: None,
            classifications_file: None,
        }
    }
}

impl Config {
    pub fn pad_end_size(&self) -> usize {
        self.pad_end_size.unwrap_or(self.end_size)
    }
}
