pub mod writer;

pub use writer::{OutputPaths, write_json, write_outputs};
