pub mod feature;
pub mod level;
pub mod region;

pub use feature::{Feature, FeatureCollection, FeatureMetadata};
pub use level::Level;
pub use region::GeoRegion;
