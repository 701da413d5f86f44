pub mod abs;

pub use abs::{BoundarySource, boundary_url, cache_path, fetch_boundaries};
