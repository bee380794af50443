use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::arrow::Arrow;
use super::face::FaceScoring;

/// Faces at or below this diameter (cm) count as small indoor faces.
pub const SMALL_FACE_CM: f64 = 40.0;

/// Which arrows count as "golds".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GoldsMode {
    /// Arrows scoring 9 (imperial gold).
    Nines,
    /// Arrows scoring 10, including `X`.
    Tens,
    /// Only `X`.
    Xs,
    /// Arrows in the face's two highest rings.
    TenPlus,
}

impl GoldsMode {
    /// Default mode for a round type.
    pub fn default_for(metric: bool, indoor: bool, face_cm: f64) -> Self {
        match (metric, indoor) {
            (false, false) => GoldsMode::Nines,
            (true, false) => GoldsMode::Tens,
            (_, true) if face_cm <= SMALL_FACE_CM => GoldsMode::Xs,
            (_, true) => GoldsMode::TenPlus,
        }
    }

    pub fn is_gold(self, arrow: Arrow, face: FaceScoring) -> bool {
        match self {
            GoldsMode::Nines => arrow.value() == 9,
            GoldsMode::Tens => arrow.value() == 10,
            GoldsMode::Xs => arrow.is_max(),
            GoldsMode::TenPlus => arrow.is_hit() && arrow.value() >= face.top_two_threshold(),
        }
    }

    pub fn count(self, arrows: &[Arrow], face: FaceScoring) -> u32 {
        arrows.iter().filter(|&&a| self.is_gold(a, face)).count() as u32
    }

    pub fn label(self) -> &'static str {
        match self {
            GoldsMode::Nines => "9s",
            GoldsMode::Tens => "10s",
            GoldsMode::Xs => "Xs",
            GoldsMode::TenPlus => "10+",
        }
    }
}

impl fmt::Display for GoldsMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for GoldsMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "nines" | "9s" => Ok(GoldsMode::Nines),
            "tens" | "10s" => Ok(GoldsMode::Tens),
            "xs" => Ok(GoldsMode::Xs),
            "ten_plus" | "tenplus" | "10+" => Ok(GoldsMode::TenPlus),
            other => Err(format!("unknown golds mode '{}'", other)),
        }
    }
}
