pub mod catalogue;
pub mod structure;

pub use catalogue::{
    validate_catalogue, LegDefinition, RoundCatalogue, RoundDefinition, SubtypeDefinition,
};
pub use structure::{Distance, RoundStructure, Unit, METRES_PER_YARD};
