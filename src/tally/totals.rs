use serde::Serialize;
use std::ops::{Add, AddAssign};

use crate::scoring::{Arrow, FaceScoring, GoldsMode};

/// Hits, score and golds over a run of arrows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub arrows: usize,
    pub hits: u32,
    pub score: u32,
    pub golds: u32,
    pub xs: u32,
    pub misses: u32,
}

impl Totals {
    pub fn from_arrows(arrows: &[Arrow], golds: GoldsMode, face: FaceScoring) -> Self {
        arrows.iter().fold(Totals::default(), |mut acc, &arrow| {
            acc.arrows += 1;
            acc.score += arrow.value();
            if arrow.is_hit() {
                acc.hits += 1;
            } else {
                acc.misses += 1;
            }
            if arrow.is_max() {
                acc.xs += 1;
            }
            if golds.is_gold(arrow, face) {
                acc.golds += 1;
            }
            acc
        })
    }

    /// Mean score per arrow, `None` with no arrows.
    pub fn average(&self) -> Option<f64> {
        (self.arrows > 0).then(|| self.score as f64 / self.arrows as f64)
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Totals) -> Totals {
        Totals {
            arrows: self.arrows + rhs.arrows,
            hits: self.hits + rhs.hits,
            score: self.score + rhs.score,
            golds: self.golds + rhs.golds,
            xs: self.xs + rhs.xs,
            misses: self.misses + rhs.misses,
        }
    }
}

impl AddAssign for Totals {
    fn add_assign(&mut self, rhs: Totals) {
        *self = *self + rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::parse_arrows;

    #[test]
    fn test_totals_basic() {
        let arrows = parse_arrows("X 10 9 8 m 7").unwrap();
        let t = Totals::from_arrows(&arrows, GoldsMode::Tens, FaceScoring::TenZone);
        assert_eq!(t.arrows, 6);
        assert_eq!(t.hits, 5);
        assert_eq!(t.misses, 1);
        assert_eq!(t.score, 44);
        assert_eq!(t.golds, 2);
        assert_eq!(t.xs, 1);
    }

    #[test]
    fn test_empty_totals() {
        let t = Totals::from_arrows(&[], GoldsMode::Tens, FaceScoring::TenZone);
        assert_eq!(t, Totals::default());
        assert!(t.average().is_none());
    }

    #[test]
    fn test_add_totals() {
        let a = parse_arrows("10 9").unwrap();
        let b = parse_arrows("m X").unwrap();
        let mut t = Totals::from_arrows(&a, GoldsMode::Tens, FaceScoring::TenZone);
        t += Totals::from_arrows(&b, GoldsMode::Tens, FaceScoring::TenZone);
        let all = parse_arrows("10 9 m X").unwrap();
        assert_eq!(t, Totals::from_arrows(&all, GoldsMode::Tens, FaceScoring::TenZone));
        assert_eq!(t.average(), Some(29.0 / 4.0));
    }
}
