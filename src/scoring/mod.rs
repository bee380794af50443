pub mod arrow;
pub mod end;
pub mod face;
pub mod golds;

pub use arrow::{parse_arrows, Arrow};
pub use end::{
    canonical_sort, format_canonical, validate_end_size, End, DEFAULT_END_SIZE, MAX_END_SIZE,
};
pub use face::FaceScoring;
pub use golds::GoldsMode;
