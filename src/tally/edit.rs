//! End edits expressed as pure transforms of the flat arrow sequence.
//!
//! Ends are located with the same distance-aware chunking the score pad
//! uses, so "end N" means the same thing everywhere.

use std::ops::Range;

use super::segment::end_spans;
use crate::error::{Error, Result};
use crate::round::RoundStructure;
use crate::scoring::{validate_end_size, Arrow, End};

/// Where each end currently sits in the flat sequence.
pub fn ends(
    arrows: &[Arrow],
    round: Option<&RoundStructure>,
    end_size: usize,
) -> Result<Vec<Range<usize>>> {
    let end_size = validate_end_size(end_size)?;
    Ok(end_spans(arrows.len(), round, end_size))
}

fn check_new_end(end: &[Arrow], end_size: usize) -> Result<()> {
    if end.is_empty() {
        return Err(Error::InvalidEndSize(0));
    }
    End::from_arrows(end_size, end).map(|_| ())
}

/// Insert a new end before end `position`; `position == ends` appends.
pub fn insert_end(
    arrows: &[Arrow],
    round: Option<&RoundStructure>,
    end_size: usize,
    position: usize,
    end: &[Arrow],
) -> Result<Vec<Arrow>> {
    let spans = ends(arrows, round, end_size)?;
    check_new_end(end, end_size)?;
    let at = match position {
        p if p < spans.len() => spans[p].start,
        p if p == spans.len() => arrows.len(),
        p => {
            return Err(Error::EndIndexOutOfRange {
                index: p,
                len: spans.len(),
            })
        }
    };

    let mut out = Vec::with_capacity(arrows.len() + end.len());
    out.extend_from_slice(&arrows[..at]);
    out.extend_from_slice(end);
    out.extend_from_slice(&arrows[at..]);
    Ok(out)
}

/// Replace the arrows of end `position`.
pub fn replace_end(
    arrows: &[Arrow],
    round: Option<&RoundStructure>,
    end_size: usize,
    position: usize,
    end: &[Arrow],
) -> Result<Vec<Arrow>> {
    let spans = ends(arrows, round, end_size)?;
    check_new_end(end, end_size)?;
    let span = spans.get(position).ok_or(Error::EndIndexOutOfRange {
        index: position,
        len: spans.len(),
    })?;

    let mut out = arrows.to_vec();
    out.splice(span.clone(), end.iter().copied());
    Ok(out)
}

/// Remove end `position`.
pub fn delete_end(
    arrows: &[Arrow],
    round: Option<&RoundStructure>,
    end_size: usize,
    position: usize,
) -> Result<Vec<Arrow>> {
    let spans = ends(arrows, round, end_size)?;
    let span = spans.get(position).ok_or(Error::EndIndexOutOfRange {
        index: position,
        len: spans.len(),
    })?;

    let mut out = arrows.to_vec();
    out.drain(span.clone());
    Ok(out)
}
