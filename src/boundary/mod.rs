pub mod parser;

pub use parser::{BoundaryError, RawFeatureCollection, load_regions, parse_regions};
