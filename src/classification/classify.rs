use serde::Serialize;
use tracing::debug;

use super::table::{CategoryKey, ClassificationTable, ClassificationTables, Tier};
use crate::error::Result;
use crate::handicap::Handicapper;
use crate::tally::ShotRecord;

/// Whether a classification comes from a finished round or a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    Official,
    Predicted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassificationResult {
    /// `None` when the score is below the lowest tier.
    pub tier: Option<Tier>,
    pub basis: Basis,
    /// The score the tier was looked up with.
    pub score: u32,
}

/// The next tier up and the points still needed for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextTier {
    pub tier: Tier,
    pub points_needed: u32,
}

impl ClassificationTable {
    /// Highest tier whose minimum the score meets.
    pub fn classify(&self, score: u32) -> Option<&Tier> {
        self.tiers().iter().rev().find(|t| score >= t.min_score)
    }

    pub fn next_tier(&self, score: u32) -> Option<NextTier> {
        self.tiers().iter().find(|t| t.min_score > score).map(|t| NextTier {
            tier: t.clone(),
            points_needed: t.min_score - score,
        })
    }
}

impl ClassificationTables {
    pub fn classify(&self, score: u32, category: &CategoryKey) -> Result<Option<Tier>> {
        Ok(self.get(category)?.classify(score).cloned())
    }

    pub fn next_tier(&self, score: u32, category: &CategoryKey) -> Result<Option<NextTier>> {
        Ok(self.get(category)?.next_tier(score))
    }

    /// Classify an attempt.
    ///
    /// A complete record is classified on the score within the round.
    /// An incomplete one is classified on its predicted full-round score,
    /// or not at all (`Ok(None)`) when no whole dozen has been shot yet.
    pub fn classify_record(
        &self,
        record: &ShotRecord<'_>,
        category: &CategoryKey,
        handicapper: &Handicapper<'_>,
    ) -> Result<Option<ClassificationResult>> {
        let table = self.get(category)?;
        let Some(round) = record.round else {
            return Ok(None);
        };

        let (score, basis) = if record.is_complete() {
            let within = &record.arrows[..round.total_arrows()];
            (within.iter().map(|a| a.value()).sum(), Basis::Official)
        } else {
            match handicapper.predict_full_score(round, &record.arrows)? {
                Some(predicted) => (predicted, Basis::Predicted),
                None => return Ok(None),
            }
        };

        let tier = table.classify(score).cloned();
        debug!(
            category = %category,
            score,
            ?basis,
            tier = ?tier.as_ref().map(|t| &t.name),
            "classified"
        );
        Ok(Some(ClassificationResult { tier, basis, score }))
    }
}
