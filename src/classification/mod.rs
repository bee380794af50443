//! Tier lookup by archer category.

pub mod classify;
pub mod table;

pub use classify::{Basis, ClassificationResult, NextTier};
pub use table::{
    CategoryKey, ClassificationFile, ClassificationTable, ClassificationTables, TableDefinition,
    Tier, TierDefinition,
};
