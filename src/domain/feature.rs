use serde::Serialize;

/// A render-ready region: one projected exterior ring plus its identity
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feature {
    pub code: String,
    pub name: String,
    pub state: String,
    /// Enclosing SA4 code, SA3 features only
    pub parent_code: Option<String>,
    /// Viewport [x, y] pairs, at least 3
    pub polygon: Vec<[f64; 2]>,
}

impl Feature {
    pub fn metadata(&self) -> FeatureMetadata {
        FeatureMetadata {
            code: self.code.clone(),
            name: self.name.clone(),
            state: self.state.clone(),
            parent_code: self.parent_code.clone(),
        }
    }
}

/// Identity columns of a [`Feature`] without geometry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureMetadata {
    pub code: String,
    pub name: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_code: Option<String>,
}

/// Geometry output document: `{"features": [...]}`
#[derive(Debug, Serialize)]
pub struct FeatureCollection<'a> {
    pub features: &'a [Feature],
}
