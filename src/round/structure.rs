use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};
use crate::scoring::FaceScoring;

pub const METRES_PER_YARD: f64 = 0.9144;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    #[serde(alias = "m", alias = "meters")]
    Metres,
    #[serde(alias = "yd")]
    Yards,
}

impl Unit {
    pub fn to_metres(self, distance: f64) -> f64 {
        match self {
            Unit::Metres => distance,
            Unit::Yards => distance * METRES_PER_YARD,
        }
    }

    pub fn suffix(self) -> &'static str {
        match self {
            Unit::Metres => "m",
            Unit::Yards => "yd",
        }
    }
}

/// One leg of a round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distance {
    /// 1-based position within the round.
    pub ordinal: usize,
    pub distance: f64,
    pub unit: Unit,
    pub arrows: usize,
    /// Face diameter in centimetres.
    pub face_cm: f64,
}

impl Distance {
    pub fn metres(&self) -> f64 {
        self.unit.to_metres(self.distance)
    }

    /// Short label such as `50m` or `100yd`.
    pub fn label(&self) -> String {
        format!("{}{}", format_number(self.distance), self.unit.suffix())
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} arrows at {} ({}cm face)",
            self.arrows,
            self.label(),
            format_number(self.face_cm)
        )
    }
}

/// Immutable description of a round (or one sub-type of it).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundStructure {
    name: String,
    distances: Vec<Distance>,
    indoor: bool,
    face: FaceScoring,
    face_variants: Vec<FaceScoring>,
}

impl RoundStructure {
    /// Validate and build a round.
    ///
    /// Distances must be non-empty, every leg must have at least one arrow
    /// and a positive face, and target distances must never increase from
    /// one leg to the next.
    pub fn new(
        name: impl Into<String>,
        distances: Vec<Distance>,
        indoor: bool,
        face: FaceScoring,
    ) -> Result<Self> {
        let name = name.into();
        let malformed = |reason: String| Error::MalformedRound {
            round: name.clone(),
            reason,
        };

        if distances.is_empty() {
            return Err(malformed("no distances".to_string()));
        }
        for (i, d) in distances.iter().enumerate() {
            if d.arrows == 0 {
                return Err(malformed(format!("distance {} has no arrows", i + 1)));
            }
            if d.distance.is_nan() || d.distance <= 0.0 {
                return Err(malformed(format!("distance {} has non-positive range", i + 1)));
            }
            if d.face_cm.is_nan() || d.face_cm <= 0.0 {
                return Err(malformed(format!("distance {} has non-positive face size", i + 1)));
            }
        }
        for pair in distances.windows(2) {
            if pair[1].metres() > pair[0].metres() {
                return Err(malformed(format!(
                    "distances not in descending order ({} before {})",
                    pair[0].label(),
                    pair[1].label()
                )));
            }
        }

        let distances = distances
            .into_iter()
            .enumerate()
            .map(|(i, d)| Distance { ordinal: i + 1, ..d })
            .collect();

        Ok(Self {
            name,
            distances,
            indoor,
            face,
            face_variants: vec![face],
        })
    }

    /// Allow additional faces the round may be shot on.
    pub fn with_face_variants(mut self, variants: &[FaceScoring]) -> Self {
        for &v in variants {
            if !self.face_variants.contains(&v) {
                self.face_variants.push(v);
            }
        }
        self
    }

    /// The same round scored on one of its permitted face variants.
    pub fn on_face(&self, face: FaceScoring) -> Result<Self> {
        if !self.face_variants.contains(&face) {
            return Err(Error::MalformedRound {
                round: self.name.clone(),
                reason: format!("face {:?} is not permitted", face),
            });
        }
        Ok(Self {
            face,
            ..self.clone()
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn distances(&self) -> &[Distance] {
        &self.distances
    }

    pub fn is_indoor(&self) -> bool {
        self.indoor
    }

    /// True when every leg is measured in metres.
    pub fn is_metric(&self) -> bool {
        self.distances.iter().all(|d| d.unit == Unit::Metres)
    }

    pub fn face(&self) -> FaceScoring {
        self.face
    }

    pub fn face_variants(&self) -> &[FaceScoring] {
        &self.face_variants
    }

    /// Smallest face used anywhere in the round.
    pub fn smallest_face_cm(&self) -> f64 {
        self.distances.iter().map(|d| d.face_cm).fold(f64::INFINITY, f64::min)
    }

    pub fn total_arrows(&self) -> usize {
        self.distances.iter().map(|d| d.arrows).sum()
    }

    /// Upper bound on any score: ten points per arrow.
    pub fn total_score_capacity(&self) -> u32 {
        self.total_arrows() as u32 * 10
    }

    /// Highest score reachable on the selected face.
    pub fn max_score(&self) -> u32 {
        self.total_arrows() as u32 * self.face.max_value()
    }

    /// Cumulative arrow counts at the end of each distance.
    pub fn boundaries(&self) -> Vec<usize> {
        self.distances
            .iter()
            .scan(0, |acc, d| {
                *acc += d.arrows;
                Some(*acc)
            })
            .collect()
    }

    /// Distance the arrow at `index` (0-based) is shot at, if within the round.
    pub fn distance_at(&self, index: usize) -> Option<&Distance> {
        let mut end = 0;
        for d in &self.distances {
            end += d.arrows;
            if index < end {
                return Some(d);
            }
        }
        None
    }

    /// The round cut down to its first `arrows` arrows. `None` for zero.
    pub fn shot_portion(&self, arrows: usize) -> Option<Self> {
        let mut left = arrows;
        let mut distances = Vec::new();
        for d in &self.distances {
            if left == 0 {
                break;
            }
            let take = d.arrows.min(left);
            left -= take;
            distances.push(Distance {
                arrows: take,
                ..d.clone()
            });
        }
        if distances.is_empty() {
            return None;
        }
        Some(Self {
            distances,
            ..self.clone()
        })
    }

    /// A single-distance round made of one leg of this round.
    pub fn single_distance(&self, ordinal: usize, arrows: usize) -> Option<Self> {
        let d = self.distances.iter().find(|d| d.ordinal == ordinal)?;
        if arrows == 0 {
            return None;
        }
        Some(Self {
            distances: vec![Distance {
                ordinal: 1,
                arrows,
                ..d.clone()
            }],
            ..self.clone()
        })
    }
}

/// Format a float without a trailing `.0`.
pub(crate) fn format_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
pub(crate) fn leg(distance: f64, unit: Unit, arrows: usize, face_cm: f64) -> Distance {
    Distance {
        ordinal: 0,
        distance,
        unit,
        arrows,
        face_cm,
    }
}
