use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::face::FaceScoring;
use crate::error::{Error, Result};

/// One shot's scoring token.
///
/// Variant order gives the canonical display order: misses first, then rings
/// by value, and `X` after a plain `10` of equal value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arrow {
    Miss,
    Ring(u8),
    X,
}

impl Arrow {
    /// Parse a single token: `m` (or `0`), `1`..`10`, `X`. Case-insensitive.
    pub fn parse(token: &str) -> Result<Self> {
        let t = token.trim();
        if t.eq_ignore_ascii_case("m") {
            return Ok(Arrow::Miss);
        }
        if t.eq_ignore_ascii_case("x") {
            return Ok(Arrow::X);
        }
        // Reject signs explicitly; "+5" would otherwise parse as a u8.
        if t.is_empty() || !t.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidArrowValue(token.to_string()));
        }
        match t.parse::<u8>() {
            Ok(0) => Ok(Arrow::Miss),
            Ok(n @ 1..=10) => Ok(Arrow::Ring(n)),
            _ => Err(Error::InvalidArrowValue(token.to_string())),
        }
    }

    /// Parse a token and check the face can actually produce it.
    pub fn parse_for_face(token: &str, face: FaceScoring) -> Result<Self> {
        let arrow = Self::parse(token)?;
        if face.accepts(arrow) {
            Ok(arrow)
        } else {
            Err(Error::InvalidArrowValue(token.to_string()))
        }
    }

    /// Numeric value, 0 for a miss and 10 for `X`.
    pub fn value(self) -> u32 {
        match self {
            Arrow::Miss => 0,
            Arrow::Ring(n) => n as u32,
            Arrow::X => 10,
        }
    }

    pub fn is_max(self) -> bool {
        matches!(self, Arrow::X)
    }

    pub fn is_hit(self) -> bool {
        !matches!(self, Arrow::Miss)
    }

    pub fn token(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Arrow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arrow::Miss => f.write_str("m"),
            Arrow::Ring(n) => write!(f, "{}", n),
            Arrow::X => f.write_str("X"),
        }
    }
}

impl FromStr for Arrow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Arrow::parse(s)
    }
}

impl Serialize for Arrow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parse a list of tokens separated by whitespace and/or commas.
pub fn parse_arrows(text: &str) -> Result<Vec<Arrow>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(Arrow::parse)
        .collect()
}
