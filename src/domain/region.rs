use geo::{Geometry, HasDimensions};
use serde_json::{Map, Value};

/// A boundary record as read from the source dataset, in lon/lat degrees
#[derive(Debug, Clone)]
pub struct GeoRegion {
    /// Position in the input sequence
    pub index: usize,
    pub geometry: Option<Geometry<f64>>,
    pub properties: Map<String, Value>,
}

impl GeoRegion {
    pub fn new(index: usize, geometry: Option<Geometry<f64>>, properties: Map<String, Value>) -> Self {
        Self {
            index,
            geometry,
            properties,
        }
    }

    /// Attribute value as a trimmed string; null and blank count as missing
    pub fn attribute(&self, key: &str) -> Option<String> {
        let text = match self.properties.get(key)? {
            Value::Null => return None,
            Value::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        if text.is_empty() { None } else { Some(text) }
    }

    /// Geometry if present and non-empty
    pub fn usable_geometry(&self) -> Option<&Geometry<f64>> {
        self.geometry.as_ref().filter(|g| !g.is_empty())
    }
}
