use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::structure::{Distance, RoundStructure, Unit};
use crate::error::{Error, Result};
use crate::scoring::FaceScoring;

/// A round as written in the reference tables.
///
/// Legs carry arrow counts and faces shared by every sub-type; distances
/// come either from the top-level `distances` list or from a sub-type.
///
/// Example YAML:
/// ```yaml
/// - id: wa1440
///   name: WA 1440
///   legs:
///     - { arrows: 36, face_cm: 122 }
///     - { arrows: 36, face_cm: 122 }
///     - { arrows: 36, face_cm: 80 }
///     - { arrows: 36, face_cm: 80 }
///   subtypes:
///     - { id: "90", distances: [90, 70, 50, 30] }
///     - { id: "70", distances: [70, 60, 50, 30] }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoundDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub indoor: bool,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub face: FaceScoring,
    /// Other faces the round may be shot on.
    #[serde(default)]
    pub face_variants: Vec<FaceScoring>,
    pub legs: Vec<LegDefinition>,
    #[serde(default)]
    pub distances: Option<Vec<f64>>,
    #[serde(default)]
    pub subtypes: Vec<SubtypeDefinition>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LegDefinition {
    pub arrows: usize,
    pub face_cm: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SubtypeDefinition {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub distances: Vec<f64>,
}

impl RoundDefinition {
    /// Build the structure for a sub-type, or the default layout when `None`.
    ///
    /// The default is the top-level distance list if present, otherwise the
    /// first sub-type.
    pub fn structure(&self, subtype: Option<&str>) -> Result<RoundStructure> {
        let (name, distances) = match subtype {
            Some(id) => {
                let sub = self
                    .subtypes
                    .iter()
                    .find(|s| s.id.eq_ignore_ascii_case(id))
                    .ok_or_else(|| Error::UnknownSubtype {
                        round: self.id.clone(),
                        subtype: id.to_string(),
                    })?;
                (self.subtype_name(sub), &sub.distances)
            }
            None => match (&self.distances, self.subtypes.first()) {
                (Some(distances), _) => (self.name.clone(), distances),
                (None, Some(sub)) => (self.subtype_name(sub), &sub.distances),
                (None, None) => {
                    return Err(Error::MalformedRound {
                        round: self.id.clone(),
                        reason: "no distances and no sub-types".to_string(),
                    })
                }
            },
        };

        if distances.len() != self.legs.len() {
            return Err(Error::MalformedRound {
                round: name,
                reason: format!("{} distances for {} legs", distances.len(), self.legs.len()),
            });
        }

        let legs = self
            .legs
            .iter()
            .zip(distances)
            .enumerate()
            .map(|(i, (leg, &distance))| Distance {
                ordinal: i + 1,
                distance,
                unit: self.unit,
                arrows: leg.arrows,
                face_cm: leg.face_cm,
            })
            .collect();

        let round = RoundStructure::new(name, legs, self.indoor, self.face)?;
        Ok(round.with_face_variants(&self.face_variants))
    }

    /// Sub-type shot when none is named: `None` when the round has its own
    /// distance list, otherwise the first sub-type.
    pub fn default_subtype(&self) -> Option<&str> {
        match self.distances {
            Some(_) => None,
            None => self.subtypes.first().map(|s| s.id.as_str()),
        }
    }

    /// Canonical id of the sub-type `structure(subtype)` would build.
    pub fn resolve_subtype(&self, subtype: Option<&str>) -> Result<Option<&str>> {
        match subtype {
            Some(id) => self
                .subtypes
                .iter()
                .find(|s| s.id.eq_ignore_ascii_case(id))
                .map(|s| Some(s.id.as_str()))
                .ok_or_else(|| Error::UnknownSubtype {
                    round: self.id.clone(),
                    subtype: id.to_string(),
                }),
            None => Ok(self.default_subtype()),
        }
    }

    pub fn subtype_ids(&self) -> Vec<&str> {
        self.subtypes.iter().map(|s| s.id.as_str()).collect()
    }

    fn subtype_name(&self, sub: &SubtypeDefinition) -> String {
        sub.name
            .clone()
            .unwrap_or_else(|| format!("{} ({})", self.name, sub.id))
    }
}

/// All rounds known to the engine.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RoundCatalogue {
    pub rounds: Vec<RoundDefinition>,
}

impl RoundCatalogue {
    pub fn get(&self, id: &str) -> Result<&RoundDefinition> {
        self.rounds
            .iter()
            .find(|r| r.id.eq_ignore_ascii_case(id))
            .ok_or_else(|| Error::UnknownRound(id.to_string()))
    }

    /// Resolve a round and optional sub-type straight to its structure.
    pub fn structure(&self, id: &str, subtype: Option<&str>) -> Result<RoundStructure> {
        self.get(id)?.structure(subtype)
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// Merge another catalogue in; rounds with the same id are replaced.
    pub fn merge(&mut self, other: RoundCatalogue) {
        for round in other.rounds {
            match self.rounds.iter_mut().find(|r| r.id.eq_ignore_ascii_case(&round.id)) {
                Some(existing) => *existing = round,
                None => self.rounds.push(round),
            }
        }
    }
}

/// Validate a catalogue.
/// Returns all validation errors at once (not just the first).
pub fn validate_catalogue(catalogue: &RoundCatalogue) -> std::result::Result<(), Vec<String>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (i, round) in catalogue.rounds.iter().enumerate() {
        if !seen.insert(round.id.to_lowercase()) {
            errors.push(format!("rounds[{}].id: duplicate id '{}'", i, round.id));
        }

        if round.distances.is_some() || round.subtypes.is_empty() {
            if let Err(e) = round.structure(None) {
                errors.push(format!("rounds[{}] ({}): {}", i, round.id, e));
            }
        }

        let mut sub_seen = HashSet::new();
        for (j, sub) in round.subtypes.iter().enumerate() {
            if !sub_seen.insert(sub.id.to_lowercase()) {
                errors.push(format!(
                    "rounds[{}].subtypes[{}].id: duplicate id '{}'",
                    i, j, sub.id
                ));
                continue;
            }
            if let Err(e) = round.structure(Some(&sub.id)) {
                errors.push(format!("rounds[{}].subtypes[{}] ({}): {}", i, j, sub.id, e));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
