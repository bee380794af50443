//! One-call evaluation of a shot record: tally, handicap, prediction,
//! allowance and classification together.

use serde::Serialize;
use tracing::debug;

use crate::classification::{
    Basis, CategoryKey, ClassificationResult, ClassificationTables, NextTier,
};
use crate::error::{Error, Result};
use crate::handicap::{adjusted_score, Handicapper, RatingSystem};
use crate::tally::{aggregate, ShotRecord, Tally, TallyOptions};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assessment {
    pub round: Option<String>,
    pub system: RatingSystem,
    pub tally: Tally,
    /// Score over the arrows that fall within the round.
    pub round_score: u32,
    /// Handicap earned by the arrows shot so far.
    pub handicap: Option<i32>,
    /// Set when the score beat the best handicap the table predicts and
    /// `handicap` was clamped to it. `Handicapper::handicap_for_score`
    /// reports the same score as an error.
    pub handicap_clamped: bool,
    /// Full-round prediction; only for incomplete rounds.
    pub predicted_score: Option<u32>,
    /// Allowance for the declared handicap.
    pub allowance: Option<u32>,
    /// Allowance added to the round score when complete, otherwise to the
    /// predicted score.
    pub adjusted_score: Option<AdjustedScore>,
    pub classification: Option<ClassificationResult>,
    pub next_tier: Option<NextTier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdjustedScore {
    pub score: u32,
    pub basis: Basis,
}

/// Classification lookup for [`assess`].
#[derive(Debug, Clone, Copy)]
pub struct ClassifyWith<'a> {
    pub tables: &'a ClassificationTables,
    pub category: &'a CategoryKey,
}

pub fn assess(
    record: &ShotRecord<'_>,
    handicapper: &Handicapper<'_>,
    options: &TallyOptions,
    classify: Option<ClassifyWith<'_>>,
) -> Result<Assessment> {
    let tally = aggregate(record, options)?;

    let Some(round) = record.round else {
        return Ok(Assessment {
            round: None,
            system: handicapper.system(),
            round_score: tally.totals.score,
            tally,
            handicap: None,
            handicap_clamped: false,
            predicted_score: None,
            allowance: None,
            adjusted_score: None,
            classification: None,
            next_tier: None,
        });
    };

    let within = &record.arrows[..record.arrows.len().min(round.total_arrows())];
    let round_score: u32 = within.iter().map(|a| a.value()).sum();

    let (handicap, handicap_clamped) = match round.shot_portion(within.len()) {
        Some(part) => match handicapper.handicap_for_score(&part, round_score) {
            Ok(h) => (Some(h), false),
            Err(Error::HandicapOutOfRange { min, .. }) => (Some(min), true),
            Err(e) => return Err(e),
        },
        None => (None, false),
    };

    let predicted_score = if tally.complete {
        None
    } else {
        handicapper.predict_full_score(round, &record.arrows)?
    };

    let allowance = record.declared_handicap.map(|h| handicapper.allowance(round, h));
    let basis_score = match (tally.complete, predicted_score) {
        (true, _) => Some((round_score, Basis::Official)),
        (false, Some(p)) => Some((p, Basis::Predicted)),
        (false, None) => None,
    };
    let adjusted = allowance
        .zip(basis_score)
        .map(|(a, (score, basis))| AdjustedScore {
            score: adjusted_score(score, a),
            basis,
        });

    let (classification, next_tier) = match classify {
        Some(c) => {
            let result = c.tables.classify_record(record, c.category, handicapper)?;
            let next = match &result {
                Some(r) => c.tables.next_tier(r.score, c.category)?,
                None => None,
            };
            (result, next)
        }
        None => (None, None),
    };

    debug!(round = round.name(), round_score, ?handicap, ?predicted_score, "assessed");
    Ok(Assessment {
        round: Some(round.name().to_string()),
        system: handicapper.system(),
        tally,
        round_score,
        handicap,
        handicap_clamped,
        predicted_score,
        allowance,
        adjusted_score: adjusted,
        classification,
        next_tier,
    })
}
