//! Traits describing read-only world data.
//!
//! The engine reaches content only through these seams: the map catalog
//! produces fresh maps by id and the RNG oracle drives enemy decisions.
mod catalog;
mod error;
mod rng;

pub use catalog::{FixedCatalog, MapCatalog};
pub use error::CatalogError;
pub use rng::{PcgRng, RngOracle, RollContext, compute_seed};
