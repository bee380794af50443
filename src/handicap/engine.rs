use tracing::debug;

use super::formula::raw_round_score;
use super::system::RatingSystem;
use super::table::HandicapTable;
use crate::error::{Error, Result};
use crate::round::RoundStructure;
use crate::scoring::Arrow;
use crate::tally::{segments, SegmentKind};

/// Allowances are expressed against a 1440-point round.
pub const ALLOWANCE_BASE: f64 = 1440.0;

/// Arrows per dozen; partial predictions only use whole dozens.
const DOZEN: usize = 12;

const BISECTION_STEPS: usize = 64;

/// Score and handicap conversions against one handicap table.
#[derive(Debug, Clone, Copy)]
pub struct Handicapper<'t> {
    table: &'t HandicapTable,
    inner_ten: bool,
}

impl<'t> Handicapper<'t> {
    pub fn new(table: &'t HandicapTable) -> Self {
        Self {
            table,
            inner_ten: false,
        }
    }

    /// Handicapper using the built-in constants of `system`.
    pub fn for_system(system: RatingSystem) -> Handicapper<'static> {
        Handicapper::new(HandicapTable::for_system(system))
    }

    /// Count only the inner ten ring as ten.
    pub fn inner_ten(mut self, inner_ten: bool) -> Self {
        self.inner_ten = inner_ten;
        self
    }

    pub fn system(&self) -> RatingSystem {
        self.table.system
    }

    pub fn table(&self) -> &HandicapTable {
        self.table
    }

    /// Unrounded expected score.
    pub fn raw_score(&self, round: &RoundStructure, handicap: f64) -> f64 {
        raw_round_score(self.table, round, handicap, self.inner_ten)
    }

    /// Expected score on `round` for an archer of `handicap`, rounded the
    /// way the selected system rounds.
    pub fn score_for_handicap(&self, round: &RoundStructure, handicap: i32) -> u32 {
        let score = self.system().round_score(self.raw_score(round, handicap as f64));
        score.min(round.max_score())
    }

    /// Expected score over only the first `arrows_shot` arrows of the round.
    pub fn score_for_handicap_partial(
        &self,
        round: &RoundStructure,
        handicap: i32,
        arrows_shot: usize,
    ) -> Option<u32> {
        round
            .shot_portion(arrows_shot)
            .map(|part| self.score_for_handicap(&part, handicap))
    }

    /// Handicap for a score: the worst whole handicap whose expected score
    /// is still at least `score`.
    ///
    /// Fails when the score is above the round's capacity or better than
    /// the best handicap in the table predicts.
    pub fn handicap_for_score(&self, round: &RoundStructure, score: u32) -> Result<i32> {
        let capacity = round.total_score_capacity();
        if score > capacity {
            return Err(Error::ScoreExceedsCapacity { score, capacity });
        }

        let (mut lo, mut hi) = (self.table.min_handicap, self.table.max_handicap);
        if self.score_for_handicap(round, lo) < score {
            return Err(Error::HandicapOutOfRange {
                score,
                min: lo,
                max: hi,
            });
        }
        if self.score_for_handicap(round, hi) >= score {
            return Ok(hi);
        }

        // score(lo) >= score > score(hi)
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if self.score_for_handicap(round, mid) >= score {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        debug!(
            round = round.name(),
            score,
            handicap = lo,
            system = %self.system(),
            "handicap search"
        );
        Ok(lo)
    }

    /// Like [`handicap_for_score`](Self::handicap_for_score) but scores
    /// better than the table's best clamp to the best handicap.
    ///
    /// Only used where a score has already been shot: partial-round
    /// predictions and assessments. A direct score lookup still reports
    /// `HandicapOutOfRange` for the same score.
    pub fn handicap_for_score_clamped(&self, round: &RoundStructure, score: u32) -> Result<i32> {
        match self.handicap_for_score(round, score) {
            Err(Error::HandicapOutOfRange { min, .. }) => Ok(min),
            other => other,
        }
    }

    /// Continuous handicap at which the unrounded expected score equals `score`.
    pub fn fractional_handicap(&self, round: &RoundStructure, score: u32) -> Result<f64> {
        let capacity = round.total_score_capacity();
        if score > capacity {
            return Err(Error::ScoreExceedsCapacity { score, capacity });
        }
        let target = score as f64;
        let (mut lo, mut hi) = (self.table.min_handicap as f64, self.table.max_handicap as f64);
        if self.raw_score(round, lo) < target {
            return Err(Error::HandicapOutOfRange {
                score,
                min: self.table.min_handicap,
                max: self.table.max_handicap,
            });
        }
        if self.raw_score(round, hi) >= target {
            return Ok(hi);
        }
        for _ in 0..BISECTION_STEPS {
            let mid = (lo + hi) / 2.0;
            if self.raw_score(round, mid) >= target {
                lo = mid;
            } else {
                hi = mid;
            }
        }
        Ok((lo + hi) / 2.0)
    }

    /// Handicap earned by the arrows shot so far on `round`.
    ///
    /// Evaluated against only the part of the round actually shot. `None`
    /// with no arrows.
    pub fn handicap_for_arrows(
        &self,
        round: &RoundStructure,
        arrows: &[Arrow],
    ) -> Result<Option<i32>> {
        let shot = arrows.len().min(round.total_arrows());
        let Some(part) = round.shot_portion(shot) else {
            return Ok(None);
        };
        let score = arrows[..shot].iter().map(|a| a.value()).sum();
        self.handicap_for_score(&part, score).map(Some)
    }

    /// Predicted full-round score from a partly shot round.
    ///
    /// Every distance with at least one whole dozen shot (or its full
    /// allotment when that is under a dozen) gives a handicap from the score
    /// over those dozens; each handicap predicts a full-round score and the
    /// predictions are averaged. `None` when no distance qualifies.
    pub fn predict_full_score(
        &self,
        round: &RoundStructure,
        arrows: &[Arrow],
    ) -> Result<Option<u32>> {
        let mut predictions = Vec::new();
        for segment in segments(arrows.len(), Some(round)) {
            let SegmentKind::Distance { distance, .. } = segment.kind else {
                continue;
            };
            let shot = segment.range.len();
            let counted = if distance.arrows < DOZEN {
                if shot == distance.arrows {
                    shot
                } else {
                    0
                }
            } else {
                shot / DOZEN * DOZEN
            };
            let Some(leg) = round.single_distance(distance.ordinal, counted) else {
                continue;
            };
            let start = segment.range.start;
            let score = arrows[start..start + counted].iter().map(|a| a.value()).sum();
            let handicap = self.handicap_for_score_clamped(&leg, score)?;
            let predicted = self.score_for_handicap(round, handicap);
            debug!(
                distance = %distance.label(),
                counted,
                score,
                handicap,
                predicted,
                "distance prediction"
            );
            predictions.push(predicted);
        }
        Ok(combine_predictions(self.system(), &predictions))
    }

    /// Allowance for an archer of `handicap` on `round`, against 1440.
    pub fn allowance(&self, round: &RoundStructure, handicap: i32) -> u32 {
        let expected = self.score_for_handicap(round, handicap) as f64;
        let scaled = expected * ALLOWANCE_BASE / round.total_score_capacity() as f64;
        (ALLOWANCE_BASE - scaled).round().max(0.0) as u32
    }
}

/// Combine per-distance predictions: arithmetic mean rounded per system.
pub fn combine_predictions(system: RatingSystem, predictions: &[u32]) -> Option<u32> {
    if predictions.is_empty() {
        return None;
    }
    let mean = predictions.iter().map(|&p| p as f64).sum::<f64>() / predictions.len() as f64;
    Some(system.round_score(mean))
}

/// Score plus allowance.
pub fn adjusted_score(score: u32, allowance: u32) -> u32 {
    score + allowance
}
