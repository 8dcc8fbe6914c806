//! Translation file formats

pub mod po;

// Re-export main catalog types
pub use po::{Catalog, Metadata, PoReader};
