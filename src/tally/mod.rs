//! Score aggregation: folds a flat arrow sequence and an optional round into
//! totals, score-pad rows, remaining arrows and completion state.
//!
//! Nothing here is cached. Every call rebuilds its output from the arrows,
//! so running it twice on the same input gives the same result.

pub mod edit;
pub mod pad;
pub mod remaining;
pub mod segment;
pub mod totals;

pub use edit::{delete_end, ends, insert_end, replace_end};
pub use pad::{score_pad, PadRow, RowKind};
pub use remaining::{is_complete, left_at_current_distance, next_end_size, remaining, Remaining};
pub use segment::{end_spans, segments, Segment, SegmentKind};
pub use totals::Totals;

use serde::Serialize;
use tracing::warn;

use crate::error::Result;
use crate::round::RoundStructure;
use crate::scoring::{validate_end_size, Arrow, FaceScoring, GoldsMode, DEFAULT_END_SIZE};

/// The arrows shot so far for one attempt.
#[derive(Debug, Clone, Default)]
pub struct ShotRecord<'a> {
    /// Arrows in shot order.
    pub arrows: Vec<Arrow>,
    pub round: Option<&'a RoundStructure>,
    /// The archer's own handicap before this attempt.
    pub declared_handicap: Option<i32>,
}

impl<'a> ShotRecord<'a> {
    pub fn new(arrows: Vec<Arrow>, round: Option<&'a RoundStructure>) -> Self {
        Self {
            arrows,
            round,
            declared_handicap: None,
        }
    }

    pub fn with_declared_handicap(mut self, handicap: Option<i32>) -> Self {
        self.declared_handicap = handicap;
        self
    }

    pub fn is_complete(&self) -> bool {
        is_complete(self.arrows.len(), self.round)
    }

    /// Face the arrows were shot on, ten-zone when no round is attached.
    pub fn face(&self) -> FaceScoring {
        self.round.map(|r| r.face()).unwrap_or_default()
    }

    /// Golds mode for this record: the override if given, else the round default.
    pub fn golds_mode(&self, overridden: Option<GoldsMode>) -> GoldsMode {
        overridden.unwrap_or_else(|| match self.round {
            Some(r) => GoldsMode::default_for(r.is_metric(), r.is_indoor(), r.smallest_face_cm()),
            None => GoldsMode::Tens,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TallyOptions {
    /// Size of ends while shooting.
    pub end_size: usize,
    /// Size of ends on the score pad; defaults to `end_size`.
    pub pad_end_size: Option<usize>,
    pub golds: Option<GoldsMode>,
}

impl Default for TallyOptions {
    fn default() -> Self {
        Self {
            end_size: DEFAULT_END_SIZE,
            pad_end_size: None,
            golds: None,
        }
    }
}

/// Totals for one distance that has at least one arrow.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceTotals {
    pub ordinal: usize,
    pub label: String,
    pub allotted: usize,
    pub totals: Totals,
}

/// Everything the aggregator derives from one shot record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tally {
    pub golds_mode: GoldsMode,
    pub totals: Totals,
    pub rows: Vec<PadRow>,
    pub remaining: Remaining,
    pub complete: bool,
    pub next_end_size: usize,
    pub distances: Vec<DistanceTotals>,
}

/// Aggregate a shot record.
///
/// Fails only on invalid end sizes. Over-shooting the round is logged and
/// reported through a surplus row.
pub fn aggregate(record: &ShotRecord<'_>, options: &TallyOptions) -> Result<Tally> {
    let end_size = validate_end_size(options.end_size)?;
    let pad_end_size = validate_end_size(options.pad_end_size.unwrap_or(end_size))?;
    let golds_mode = record.golds_mode(options.golds);
    let face = record.face();
    let shot = record.arrows.len();

    if let Some(round) = record.round {
        if shot > round.total_arrows() {
            warn!(
                round = round.name(),
                shot,
                total = round.total_arrows(),
                "more arrows shot than the round allows"
            );
        }
    }

    let distances = segments(shot, record.round)
        .into_iter()
        .filter_map(|seg| match seg.kind {
            SegmentKind::Distance { distance, .. } => Some(DistanceTotals {
                ordinal: distance.ordinal,
                label: distance.label(),
                allotted: distance.arrows,
                totals: Totals::from_arrows(&record.arrows[seg.range], golds_mode, face),
            }),
            _ => None,
        })
        .collect();

    Ok(Tally {
        golds_mode,
        totals: Totals::from_arrows(&record.arrows, golds_mode, face),
        rows: score_pad(&record.arrows, record.round, pad_end_size, golds_mode, face),
        remaining: remaining(shot, record.round),
        complete: is_complete(shot, record.round),
        next_end_size: next_end_size(shot, record.round, end_size),
        distances,
    })
}
