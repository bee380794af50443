use serde::Serialize;

use super::segment::{segments, SegmentKind};
use super::totals::Totals;
use crate::round::RoundStructure;
use crate::scoring::{format_canonical, Arrow, FaceScoring, GoldsMode};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowKind {
    /// A regrouped end; `number` is 1-based across the whole pad.
    End { number: usize },
    /// Subtotal for one finished distance.
    DistanceSubtotal { ordinal: usize },
    /// Subtotal for arrows shot beyond the round.
    Surplus,
    GrandTotal,
}

/// One line of the score pad.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PadRow {
    #[serde(flatten)]
    pub kind: RowKind,
    pub label: String,
    /// Arrows in display order; empty for subtotal rows.
    pub arrows: String,
    pub hits: u32,
    pub score: u32,
    pub golds: u32,
    pub running_total: u32,
}

impl PadRow {
    fn summary(kind: RowKind, label: String, totals: Totals, running_total: u32) -> Self {
        Self {
            kind,
            label,
            arrows: String::new(),
            hits: totals.hits,
            score: totals.score,
            golds: totals.golds,
            running_total,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self.kind, RowKind::End { .. })
    }
}

/// Regroup a flat arrow sequence into score-pad rows.
///
/// Ends of `end_size` arrows are cut from each distance separately. A
/// subtotal follows each finished distance, surplus arrows get their own
/// subtotal, and a grand total closes any non-empty pad.
pub fn score_pad(
    arrows: &[Arrow],
    round: Option<&RoundStructure>,
    end_size: usize,
    golds: GoldsMode,
    face: FaceScoring,
) -> Vec<PadRow> {
    let end_size = end_size.max(1);
    let mut rows = Vec::new();
    let mut running = 0;
    let mut grand = Totals::default();
    let mut end_number = 0;

    for segment in segments(arrows.len(), round) {
        let shot = &arrows[segment.range.clone()];
        let mut segment_totals = Totals::default();

        for chunk in shot.chunks(end_size) {
            let totals = Totals::from_arrows(chunk, golds, face);
            running += totals.score;
            segment_totals += totals;
            end_number += 1;
            rows.push(PadRow {
                kind: RowKind::End { number: end_number },
                label: end_number.to_string(),
                arrows: format_canonical(chunk),
                hits: totals.hits,
                score: totals.score,
                golds: totals.golds,
                running_total: running,
            });
        }
        grand += segment_totals;

        match segment.kind {
            SegmentKind::Distance {
                distance,
                complete: true,
            } => rows.push(PadRow::summary(
                RowKind::DistanceSubtotal {
                    ordinal: distance.ordinal,
                },
                format!("Total at {}", distance.label()),
                segment_totals,
                running,
            )),
            SegmentKind::Surplus => rows.push(PadRow::summary(
                RowKind::Surplus,
                "Surplus".to_string(),
                segment_totals,
                running,
            )),
            _ => {}
        }
    }

    if !rows.is_empty() {
        rows.push(PadRow::summary(RowKind::GrandTotal, "Total".to_string(), grand, running));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::round::structure::leg;
    use crate::round::Unit;
    use crate::scoring::parse_arrows;

    fn round() -> RoundStructure {
        RoundStructure::new(
            "Mini",
            vec![leg(50.0, Unit::Metres, 6, 122.0), leg(30.0, Unit::Metres, 3, 80.0)],
            false,
            FaceScoring::TenZone,
        )
        .unwrap()
    }

    #[test]
    fn test_empty_pad() {
        let rows = score_pad(&[], Some(&round()), 6, GoldsMode::Tens, FaceScoring::TenZone);
        assert!(rows.is_empty());
    }

    #[test]
    fn test_rechunk_without_round() {
        let arrows = parse_arrows("10 9 8 7 6 5 4").unwrap();
        let rows = score_pad(&arrows, None, 3, GoldsMode::Tens, FaceScoring::TenZone);
        // three ends + grand total
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].arrows, "8 9 10");
        assert_eq!(rows[0].score, 27);
        assert_eq!(rows[1].running_total, 45);
        assert_eq!(rows[2].arrows, "4");
        assert_eq!(rows[3].kind, RowKind::GrandTotal);
        assert_eq!(rows[3].score, 49);
        assert_eq!(rows[3].running_total, 49);
        assert_eq!(rows[3].golds, 1);
    }

    #[test]
    fn test_distance_subtotals() {
        let arrows = parse_arrows("X 10 9 9 8 m 7 7 6").unwrap();
        let rows = score_pad(&arrows, Some(&round()), 6, GoldsMode::Tens, FaceScoring::TenZone);
        let kinds: Vec<_> = rows.iter().map(|r| r.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                RowKind::End { number: 1 },
                RowKind::DistanceSubtotal { ordinal: 1 },
                RowKind::End { number: 2 },
                RowKind::DistanceSubtotal { ordinal: 2 },
                RowKind::GrandTotal,
            ]
        );
        assert_eq!(rows[0].arrows, "m 8 9 9 10 X");
        assert_eq!(rows[1].label, "Total at 50m");
        assert_eq!(rows[1].score, 46);
        assert_eq!(rows[1].hits, 5);
        assert_eq!(rows[1].golds, 2);
        assert_eq!(rows[3].score, 20);
        assert_eq!(rows[3].running_total, 66);
        assert_eq!(rows[4].score, 66);
        assert_eq!(rows[4].hits, 8);
    }

    #[test]
    fn test_no_subtotal_for_unfinished_distance() {
        let arrows = parse_arrows("X 10 9 9 8 m 7").unwrap();
        let rows = score_pad(&arrows, Some(&round()), 6, GoldsMode::Tens, FaceScoring::TenZone);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[2].kind, RowKind::End { number: 2 });
        assert_eq!(rows[3].kind, RowKind::GrandTotal);
    }

    #[test]
    fn test_surplus_row() {
        let arrows = parse_arrows("9 9 9 9 9 9 9 9 9 5 5").unwrap();
        let rows = score_pad(&arrows, Some(&round()), 6, GoldsMode::Tens, FaceScoring::TenZone);
        let surplus = rows.iter().find(|r| r.kind == RowKind::Surplus).unwrap();
        assert_eq!(surplus.score, 10);
        assert_eq!(surplus.running_total, 91);
        assert_eq!(rows.last().unwrap().kind, RowKind::GrandTotal);
        assert_eq!(rows.last().unwrap().score, 91);
    }

    #[test]
    fn test_pad_is_idempotent() {
        let arrows = parse_arrows("X 10 9 9 8 m 7 7 6 5").unwrap();
        let r = round();
        let first = score_pad(&arrows, Some(&r), 4, GoldsMode::TenPlus, FaceScoring::TenZone);
        let second = score_pad(&arrows, Some(&r), 4, GoldsMode::TenPlus, FaceScoring::TenZone);
        assert_eq!(first, second);
    }
}
