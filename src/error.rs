use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised by the scoring, handicap and classification engine.
///
/// Every variant is scoped to the single computation that produced it.
/// Degenerate inputs (no arrows, no round, score below every tier) are not
/// errors and come back as `None` or empty values instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("invalid arrow value '{0}'")]
    InvalidArrowValue(String),
    #[error("end is full ({0} arrows)")]
    EndFull(usize),
    #[error("end is empty")]
    EndEmpty,
    #[error("invalid end size {0}: must be between 1 and 12")]
    InvalidEndSize(usize),
    #[error("end index {index} out of range ({len} ends)")]
    EndIndexOutOfRange { index: usize, len: usize },
    #[error("malformed round '{round}': {reason}")]
    MalformedRound { round: String, reason: String },
    #[error("unknown round '{0}'")]
    UnknownRound(String),
    #[error("round '{round}' has no sub-type '{subtype}'")]
    UnknownSubtype { round: String, subtype: String },
    #[error("score {score} exceeds round capacity {capacity}")]
    ScoreExceedsCapacity { score: u32, capacity: u32 },
    #[error("score {score} is out of the handicap range {min}..={max}")]
    HandicapOutOfRange { score: u32, min: i32, max: i32 },
    #[error("no classification table for {0}")]
    UnknownCategory(String),
    #[error("malformed classification table {key}: {reason}")]
    MalformedTable { key: String, reason: String },
}
