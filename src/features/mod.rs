pub mod attributes;
pub mod builder;

pub use attributes::{AttributeChain, AttributeSchema, Attributes, Fallback};
pub use builder::{BuildReport, FeatureBuilder, SkipReason};
