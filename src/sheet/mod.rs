pub mod columns;
pub mod normalize;
pub mod types;

pub use normalize::{cell, header_index, normalize, CanonicalTable, Row};
pub use types::{FallbackSnapshot, MajorDimension, RawPayload};
