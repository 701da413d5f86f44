use geo::{Coord, Geometry, LineString, MultiPolygon, Point, Polygon};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

use crate::domain::GeoRegion;

#[derive(Debug, Error)]
pub enum BoundaryError {
    #[error("failed to read boundary file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feature {index}: malformed {kind} coordinates: {source}")]
    Coordinates {
        index: usize,
        kind: String,
        #[source]
        source: serde_json::Error,
    },
}

/// GeoJSON FeatureCollection as published by the ABS
#[derive(Debug, Deserialize)]
pub struct RawFeatureCollection {
    pub features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
pub struct RawFeature {
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<RawGeometry>,
}

#[derive(Debug, Deserialize)]
pub struct RawGeometry {
    #[serde(rename = "type")]
    pub type_: String,
    #[serde(default)]
    pub coordinates: Value,
}

type Position = Vec<f64>;

/// Read and parse a boundary GeoJSON file
pub fn load_regions(path: &Path) -> Result<Vec<GeoRegion>, BoundaryError> {
    let contents = std::fs::read_to_string(path).map_err(|source| BoundaryError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_regions(&contents)
}

/// Parse a GeoJSON FeatureCollection into regions, keeping feature order
///
/// Polygon, MultiPolygon and Point geometries are converted; any other
/// geometry type is kept as `None` so the region is counted and skipped
/// downstream rather than failing the batch.
pub fn parse_regions(json: &str) -> Result<Vec<GeoRegion>, BoundaryError> {
    let collection: RawFeatureCollection = serde_json::from_str(json)?;

    collection
        .features
        .into_iter()
        .enumerate()
        .map(|(index, feature)| {
            let geometry = match feature.geometry {
                Some(raw) => convert_geometry(index, raw)?,
                None => None,
            };
            Ok(GeoRegion::new(
                index,
                geometry,
                feature.properties.unwrap_or_default(),
            ))
        })
        .collect()
}

fn convert_geometry(index: usize, raw: RawGeometry) -> Result<Option<Geometry<f64>>, BoundaryError> {
    let malformed = |source: serde_json::Error| BoundaryError::Coordinates {
        index,
        kind: raw.type_.clone(),
        source,
    };

    let geometry = match raw.type_.as_str() {
        "Polygon" => {
            let rings: Vec<Vec<Position>> =
                serde_json::from_value(raw.coordinates.clone()).map_err(malformed)?;
            Some(Geometry::Polygon(to_polygon(rings)))
        }
        "MultiPolygon" => {
            let polygons: Vec<Vec<Vec<Position>>> =
                serde_json::from_value(raw.coordinates.clone()).map_err(malformed)?;
            Some(Geometry::MultiPolygon(MultiPolygon::new(
                polygons.into_iter().map(to_polygon).collect(),
            )))
        }
        "Point" => {
            let position: Position = serde_json::from_value(raw.coordinates.clone()).map_err(malformed)?;
            to_coord(&position).map(|c| Geometry::Point(Point::from(c)))
        }
        _ => None,
    };

    Ok(geometry)
}

fn to_polygon(rings: Vec<Vec<Position>>) -> Polygon<f64> {
    let mut rings = rings.into_iter().map(to_ring);
    let exterior = rings.next().unwrap_or_else(|| LineString::new(vec![]));
    Polygon::new(exterior, rings.collect())
}

fn to_ring(positions: Vec<Position>) -> LineString<f64> {
    positions.iter().filter_map(|p| to_coord(p)).collect()
}

/// lon/lat from a GeoJSON position; altitude is ignored
fn to_coord(position: &[f64]) -> Option<Coord<f64>> {
    match position {
        [x, y, ..] => Some(Coord { x: *x, y: *y }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::HasDimensions;
    use std::fs;
    use tempfile::tempdir;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"SA3_CODE_2021": "10102", "SA3_NAME_2021": "Queanbeyan", "STE_CODE_2021": "1"},
                "geometry": {"type": "Polygon", "coordinates": [[[149.2, -35.3], [149.3, -35.3], [149.3, -35.4], [149.2, -35.3]]]}
            },
            {
                "type": "Feature",
                "properties": {"SA3_CODE_2021": "60403"},
                "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[147.0, -43.0, 0.0], [147.5, -43.0, 0.0], [147.5, -42.5, 0.0], [147.0, -43.0, 0.0]]],
                    [[[148.0, -40.0], [148.1, -40.0], [148.1, -39.9], [148.0, -40.0]]]
                ]}
            },
            {
                "type": "Feature",
                "properties": {"SA3_CODE_2021": "99797"},
                "geometry": null
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": {"type": "LineString", "coordinates": [[0.0, 0.0], [1.0, 1.0]]}
            }
        ]
    }"#;

    #[test]
    fn test_parse_regions() {
        let regions = parse_regions(SAMPLE).unwrap();
        assert_eq!(regions.len(), 4);

        assert_eq!(regions[0].index, 0);
        assert_eq!(regions[0].attribute("SA3_NAME_2021").as_deref(), Some("Queanbeyan"));
        match regions[0].geometry.as_ref().unwrap() {
            Geometry::Polygon(p) => assert_eq!(p.exterior().0.len(), 4),
            other => panic!("expected Polygon, got {other:?}"),
        }

        match regions[1].geometry.as_ref().unwrap() {
            Geometry::MultiPolygon(mp) => {
                assert_eq!(mp.0.len(), 2);
                assert_eq!(mp.0[0].exterior().0[1], Coord { x: 147.5, y: -43.0 });
            }
            other => panic!("expected MultiPolygon, got {other:?}"),
        }

        assert!(regions[2].geometry.is_none());
        assert!(regions[3].geometry.is_none());
        assert!(regions[3].properties.is_empty());
    }

    #[test]
    fn test_parse_empty_polygon() {
        let json = r#"{"features": [{"properties": {}, "geometry": {"type": "Polygon", "coordinates": []}}]}"#;
        let regions = parse_regions(json).unwrap();
        assert!(regions[0].geometry.as_ref().unwrap().is_empty());
    }

    #[test]
    fn test_parse_malformed_coordinates() {
        let json = r#"{"features": [{"geometry": {"type": "Polygon", "coordinates": "nope"}}]}"#;
        let err = parse_regions(json).unwrap_err();
        assert!(matches!(err, BoundaryError::Coordinates { index: 0, .. }));
    }

    #[test]
    fn test_parse_not_a_collection() {
        assert!(matches!(parse_regions("[]"), Err(BoundaryError::Json(_))));
    }

    #[test]
    fn test_load_regions_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("SA3_2021_AUST_GDA2020.geojson");
        fs::write(&path, SAMPLE).unwrap();

        let regions = load_regions(&path).unwrap();
        assert_eq!(regions.len(), 4);
    }

    #[test]
    fn test_load_regions_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_regions(&dir.path().join("missing.geojson")).unwrap_err();
        assert!(matches!(err, BoundaryError::Io { .. }));
    }
}
