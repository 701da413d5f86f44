pub mod projection;
pub mod rings;
pub mod simplify;

pub use projection::{GeoBounds, Projection, ProjectionError, Projector, Viewport};
pub use rings::select_ring;
pub use simplify::{DEFAULT_TOLERANCE, SimplifyError, simplify_geometry, simplify_ring};
