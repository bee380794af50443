use serde::Serialize;

use crate::round::RoundStructure;

/// Arrows still to shoot, as display strings.
///
/// `current` covers the first unfinished distance, `later` lists the full
/// allotment of every distance after it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Remaining {
    pub current: String,
    pub later: String,
}

impl Remaining {
    pub fn is_empty(&self) -> bool {
        self.current.is_empty() && self.later.is_empty()
    }
}

pub fn remaining(shot: usize, round: Option<&RoundStructure>) -> Remaining {
    let Some(round) = round else {
        return Remaining::default();
    };

    let mut start = 0;
    let mut current = None;
    let mut later = Vec::new();
    for d in round.distances() {
        let end = start + d.arrows;
        if shot < end {
            let left = end - shot.max(start);
            let text = format!("{} at {}", left, d.label());
            if current.is_none() {
                current = Some(text);
            } else {
                later.push(text);
            }
        }
        start = end;
    }

    Remaining {
        current: current.unwrap_or_default(),
        later: later.join(", "),
    }
}

/// Arrows left at the distance currently being shot, `None` once past the round.
pub fn left_at_current_distance(shot: usize, round: &RoundStructure) -> Option<usize> {
    round.boundaries().into_iter().find(|&end| shot < end).map(|end| end - shot)
}

pub fn is_complete(shot: usize, round: Option<&RoundStructure>) -> bool {
    round.is_some_and(|r| shot >= r.total_arrows())
}

/// Suggested size of the next end: never runs past a distance boundary.
pub fn next_end_size(shot: usize, round: Option<&RoundStructure>, end_size: usize) -> usize {
    match round.and_then(|r| left_at_current_distance(shot, r)) {
        Some(left) => end_size.min(left),
        None => end_size,
    }
}
