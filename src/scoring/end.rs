use super::arrow::Arrow;
use crate::error::{Error, Result};

pub const DEFAULT_END_SIZE: usize = 6;
pub const MAX_END_SIZE: usize = 12;

/// Check an end size is within 1..=12.
pub fn validate_end_size(size: usize) -> Result<usize> {
    if (1..=MAX_END_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(Error::InvalidEndSize(size))
    }
}

/// Arrows shot together, kept in shot order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct End {
    size: usize,
    arrows: Vec<Arrow>,
}

impl Default for End {
    fn default() -> Self {
        Self {
            size: DEFAULT_END_SIZE,
            arrows: Vec::with_capacity(DEFAULT_END_SIZE),
        }
    }
}

impl End {
    pub fn new(size: usize) -> Result<Self> {
        let size = validate_end_size(size)?;
        Ok(Self {
            size,
            arrows: Vec::with_capacity(size),
        })
    }

    /// Build an end from already-shot arrows.
    pub fn from_arrows(size: usize, arrows: &[Arrow]) -> Result<Self> {
        let mut end = Self::new(size)?;
        for &arrow in arrows {
            end.add(arrow)?;
        }
        Ok(end)
    }

    pub fn add(&mut self, arrow: Arrow) -> Result<()> {
        if self.is_full() {
            return Err(Error::EndFull(self.size));
        }
        self.arrows.push(arrow);
        Ok(())
    }

    pub fn remove_last(&mut self) -> Result<Arrow> {
        self.arrows.pop().ok_or(Error::EndEmpty)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn len(&self) -> usize {
        self.arrows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrows.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.arrows.len() >= self.size
    }

    /// Arrows in the order they were shot.
    pub fn arrows(&self) -> &[Arrow] {
        &self.arrows
    }

    pub fn score(&self) -> u32 {
        self.arrows.iter().map(|a| a.value()).sum()
    }

    /// Display order: ascending value, misses first, `10` before `X`, then
    /// empty slots up to the nominal size.
    pub fn canonical_order(&self) -> Vec<Option<Arrow>> {
        let mut sorted: Vec<Option<Arrow>> =
            canonical_sort(&self.arrows).into_iter().map(Some).collect();
        sorted.resize(self.size, None);
        sorted
    }
}

/// Sort a slice of arrows into display order without touching the input.
pub fn canonical_sort(arrows: &[Arrow]) -> Vec<Arrow> {
    let mut sorted = arrows.to_vec();
    sorted.sort();
    sorted
}

/// Render arrows in display order, space separated.
pub fn format_canonical(arrows: &[Arrow]) -> String {
    canonical_sort(arrows)
        .iter()
        .map(|a| a.token())
        .collect::<Vec<_>>()
        .join(" ")
}
