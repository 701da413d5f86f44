//! asgs-extract - Simplify and project ASGS boundaries into a render-ready viewport

pub mod api;
pub mod boundary;
pub mod config;
pub mod domain;
pub mod features;
pub mod geometry;
pub mod output;
pub mod series;

pub use domain::{Feature, FeatureMetadata, GeoRegion, Level};
pub use features::{BuildReport, FeatureBuilder};
pub use geometry::{Projection, Projector};
