use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::arrow::Arrow;

/// Ring layout of a target face.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaceScoring {
    /// Ten rings scoring 10 down to 1.
    #[default]
    TenZone,
    /// Reduced face (triple spot and similar) showing only rings 10 to 6.
    TenZoneSixRing,
    /// Imperial five-colour face scoring 9, 7, 5, 3, 1.
    FiveZone,
    /// Five rings scoring 5 down to 1.
    Worcester,
}

impl FaceScoring {
    /// Whether an arrow token can be produced by this face.
    pub fn accepts(self, arrow: Arrow) -> bool {
        match (self, arrow) {
            (_, Arrow::Miss) => true,
            (FaceScoring::TenZone, _) => true,
            (FaceScoring::TenZoneSixRing, Arrow::X) => true,
            (FaceScoring::TenZoneSixRing, Arrow::Ring(n)) => n >= 6,
            (FaceScoring::FiveZone, Arrow::Ring(n)) => n % 2 == 1,
            (FaceScoring::Worcester, Arrow::Ring(n)) => n <= 5,
            (FaceScoring::FiveZone | FaceScoring::Worcester, Arrow::X) => false,
        }
    }

    /// Highest ring value on the face.
    pub fn max_value(self) -> u32 {
        match self {
            FaceScoring::TenZone | FaceScoring::TenZoneSixRing => 10,
            FaceScoring::FiveZone => 9,
            FaceScoring::Worcester => 5,
        }
    }

    /// Lowest value that still falls in the face's two highest rings.
    pub fn top_two_threshold(self) -> u32 {
        match self {
            FaceScoring::TenZone | FaceScoring::TenZoneSixRing => 9,
            FaceScoring::FiveZone => 7,
            FaceScoring::Worcester => 4,
        }
    }
}

impl FromStr for FaceScoring {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "ten_zone" | "full" => Ok(FaceScoring::TenZone),
            "ten_zone_six_ring" | "six_ring" | "triple" => Ok(FaceScoring::TenZoneSixRing),
            "five_zone" | "imperial" => Ok(FaceScoring::FiveZone),
            "worcester" => Ok(FaceScoring::Worcester),
            other => Err(format!("unknown face '{}'", other)),
        }
    }
}
