use super::table::HandicapTable;
use crate::round::{Distance, RoundStructure};
use crate::scoring::FaceScoring;

/// Expected score of one arrow on a face.
///
/// Shots are modelled as a 2D normal spread of radial deviation `sigma_r`
/// (metres). The chance an arrow lands outside ring radius `r` is
/// `exp(-((r + arrow_radius) / sigma_r)^2)`; the arrow radius accounts for
/// line cutters. `face_cm` is the full face diameter. With `inner_ten` only
/// the inner half of the ten ring scores ten.
pub fn expected_arrow_score(
    face: FaceScoring,
    face_cm: f64,
    sigma_r: f64,
    arrow_radius: f64,
    inner_ten: bool,
) -> f64 {
    let d = face_cm / 100.0;
    let outside = |r: f64| (-((r + arrow_radius) / sigma_r).powi(2)).exp();
    let ten_ring = |rings: u32| -> f64 {
        let first = if inner_ten { outside(d / 40.0) } else { outside(d / 20.0) };
        first + (2..=rings).map(|n| outside(n as f64 * d / 20.0)).sum::<f64>()
    };

    match face {
        FaceScoring::TenZone => 10.0 - ten_ring(10),
        FaceScoring::TenZoneSixRing => 10.0 - ten_ring(5) - 5.0 * outside(6.0 * d / 20.0),
        FaceScoring::FiveZone => {
            let inner: f64 = (1..=4).map(|n| outside(n as f64 * d / 10.0)).sum();
            9.0 - 2.0 * inner - outside(5.0 * d / 10.0)
        }
        FaceScoring::Worcester => 5.0 - (1..=5).map(|n| outside(n as f64 * d / 10.0)).sum::<f64>(),
    }
}

/// Unrounded expected score for all arrows at one distance.
pub fn distance_score(
    table: &HandicapTable,
    round: &RoundStructure,
    distance: &Distance,
    handicap: f64,
    inner_ten: bool,
) -> f64 {
    let metres = distance.metres();
    let sigma_r = table.sigma_r(handicap, metres);
    let per_arrow = expected_arrow_score(
        round.face(),
        distance.face_cm,
        sigma_r,
        table.arrow_radius(round.is_indoor()),
        inner_ten,
    );
    distance.arrows as f64 * per_arrow
}

/// Unrounded expected score for the whole round.
pub fn raw_round_score(
    table: &HandicapTable,
    round: &RoundStructure,
    handicap: f64,
    inner_ten: bool,
) -> f64 {
    round
        .distances()
        .iter()
        .map(|d| distance_score(table, round, d, handicap, inner_ten))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiny_spread_scores_maximum() {
        let s = expected_arrow_score(FaceScoring::TenZone, 122.0, 1e-5, 0.0, false);
        assert!((s - 10.0).abs() < 1e-9);
        let s = expected_arrow_score(FaceScoring::FiveZone, 122.0, 1e-5, 0.0, false);
        assert!((s - 9.0).abs() < 1e-9);
        let s = expected_arrow_score(FaceScoring::Worcester, 40.0, 1e-5, 0.0, false);
        assert!((s - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_huge_spread_scores_nothing() {
        let faces = [
            FaceScoring::TenZone,
            FaceScoring::TenZoneSixRing,
            FaceScoring::FiveZone,
            FaceScoring::Worcester,
        ];
        for face in faces {
            let s = expected_arrow_score(face, 40.0, 1e3, 0.0, false);
            assert!(s.abs() < 1e-3, "{:?} scored {}", face, s);
        }
    }

    #[test]
    fn test_inner_ten_lowers_expected_score() {
        let sigma = 0.05;
        let full = expected_arrow_score(FaceScoring::TenZone, 80.0, sigma, 0.00275, false);
        let inner = expected_arrow_score(FaceScoring::TenZone, 80.0, sigma, 0.00275, true);
        assert!(inner < full);
        // only the ten ring changes, so the difference is under one point
        assert!(full - inner < 1.0);
    }

    #[test]
    fn test_six_ring_face_never_beats_full_face_when_spread_is_wide() {
        let sigma = 0.2;
        let full = expected_arrow_score(FaceScoring::TenZone, 40.0, sigma, 0.0, false);
        let reduced = expected_arrow_score(FaceScoring::TenZoneSixRing, 40.0, sigma, 0.0, false);
        assert!(reduced < full);
    }
}
