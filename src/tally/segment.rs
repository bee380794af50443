use std::ops::Range;

use crate::round::{Distance, RoundStructure};

/// Where a run of arrows sits relative to the round.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentKind<'a> {
    /// No round attached.
    Unbounded,
    /// Arrows shot at one distance; `complete` once its allotment is shot.
    Distance { distance: &'a Distance, complete: bool },
    /// Arrows beyond the round's total.
    Surplus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment<'a> {
    pub kind: SegmentKind<'a>,
    pub range: Range<usize>,
}

/// Split `shot` arrows into per-distance runs (plus surplus).
///
/// Distances with no arrows yet are left out.
pub fn segments(shot: usize, round: Option<&RoundStructure>) -> Vec<Segment<'_>> {
    let Some(round) = round else {
        if shot == 0 {
            return Vec::new();
        }
        return vec![Segment {
            kind: SegmentKind::Unbounded,
            range: 0..shot,
        }];
    };

    let mut out = Vec::new();
    let mut start = 0;
    for distance in round.distances() {
        let end = start + distance.arrows;
        if shot <= start {
            break;
        }
        out.push(Segment {
            kind: SegmentKind::Distance {
                distance,
                complete: shot >= end,
            },
            range: start..shot.min(end),
        });
        start = end;
    }
    if shot > start && start == round.total_arrows() {
        out.push(Segment {
            kind: SegmentKind::Surplus,
            range: start..shot,
        });
    }
    out
}

/// End boundaries used for both the score pad and end edits.
///
/// Each segment is chunked on its own, so an end never straddles a
/// distance boundary; the last end of a segment may be short.
pub fn end_spans(
    shot: usize,
    round: Option<&RoundStructure>,
    end_size: usize,
) -> Vec<Range<usize>> {
    let end_size = end_size.max(1);
    segments(shot, round)
        .into_iter()
        .flat_map(|seg| {
            let Range { start, end } = seg.range;
            (start..end)
                .step_by(end_size)
                .map(move |s| s..(s + end_size).min(end))
        })
        .collect()
}
