use geo::LineString;
use log::{debug, info};

use crate::domain::{Feature, GeoRegion, Level};
use crate::features::attributes::AttributeSchema;
use crate::geometry::{Projector, select_ring, simplify_geometry};

/// Why a region produced no feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Geometry missing or empty
    EmptyGeometry,
    /// Selected ring has fewer than 3 distinct vertices
    DegenerateRing(usize),
    /// A required attribute chain produced no value
    MissingAttributes,
}

/// Outcome of a batch build
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Built features in input order
    pub features: Vec<Feature>,
    pub skipped_empty: usize,
    pub skipped_degenerate: usize,
    pub skipped_unidentified: usize,
}

impl BuildReport {
    pub fn skipped(&self) -> usize {
        self.skipped_empty + self.skipped_degenerate + self.skipped_unidentified
    }
}

/// Turns boundary records into projected, simplified features.
///
/// Per region: simplify every part, keep the largest exterior ring,
/// drop it if fewer than 3 vertices remain, project each vertex in order
/// and attach the resolved attributes.
#[derive(Debug, Clone)]
pub struct FeatureBuilder {
    schema: AttributeSchema,
    tolerance: f64,
    projector: Projector,
}

impl FeatureBuilder {
    pub fn new(level: Level, tolerance: f64, projector: Projector) -> Self {
        Self {
            schema: AttributeSchema::for_level(level),
            tolerance,
            projector,
        }
    }

    /// Replace the attribute lookup chains
    pub fn with_schema(mut self, schema: AttributeSchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn build(&self, region: &GeoRegion) -> Option<Feature> {
        self.try_build(region).ok()
    }

    pub fn try_build(&self, region: &GeoRegion) -> Result<Feature, SkipReason> {
        let geometry = region.usable_geometry().ok_or(SkipReason::EmptyGeometry)?;

        let simplified = simplify_geometry(geometry, self.tolerance);
        let ring = select_ring(&simplified);

        let vertices = distinct_vertices(&ring);
        if vertices < 3 {
            return Err(SkipReason::DegenerateRing(vertices));
        }

        let points: Vec<(f64, f64)> = ring.coords().map(|c| (c.x, c.y)).collect();
        let polygon = self.projector.project_points(&points);

        let attrs = self
            .schema
            .extract(region)
            .ok_or(SkipReason::MissingAttributes)?;
        Ok(Feature {
            code: attrs.code,
            name: attrs.name,
            state: attrs.state,
            parent_code: attrs.parent_code,
            polygon,
        })
    }

    /// Build every region independently, keeping input order
    pub fn build_all(&self, regions: &[GeoRegion]) -> BuildReport {
        let mut report = BuildReport::default();

        for region in regions {
            match self.try_build(region) {
                Ok(feature) => report.features.push(feature),
                Err(SkipReason::EmptyGeometry) => {
                    debug!("region {} skipped: empty geometry", region.index);
                    report.skipped_empty += 1;
                }
                Err(SkipReason::DegenerateRing(n)) => {
                    debug!("region {} skipped: ring has {} distinct vertices", region.index, n);
                    report.skipped_degenerate += 1;
                }
                Err(SkipReason::MissingAttributes) => {
                    debug!("region {} skipped: no code, name or state", region.index);
                    report.skipped_unidentified += 1;
                }
            }

            if (region.index + 1) % 50 == 0 {
                debug!("processed {}/{} regions", region.index + 1, regions.len());
            }
        }

        info!(
            "built {} features from {} regions ({} empty, {} degenerate, {} unidentified)",
            report.features.len(),
            regions.len(),
            report.skipped_empty,
            report.skipped_degenerate,
            report.skipped_unidentified
        );
        report
    }
}

/// Number of distinct coordinates in a ring, closing point included once
fn distinct_vertices(ring: &LineString<f64>) -> usize {
    let mut keys: Vec<(u64, u64)> = ring
        .coords()
        .map(|c| (c.x.to_bits(), c.y.to_bits()))
        .collect();
    keys.sort_unstable();
    keys.dedup();
    keys.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::attributes::{AttributeChain, Fallback};
    use crate::geometry::{DEFAULT_TOLERANCE, Projection};
    use geo::{Geometry, MultiPolygon, Point, Polygon, line_string, polygon};
    use serde_json::{Map, Value, json};

    fn builder(level: Level) -> FeatureBuilder {
        let projector = Projector::new(Projection::default()).unwrap();
        FeatureBuilder::new(level, DEFAULT_TOLERANCE, projector)
    }

    fn props(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    /// One-degree square with its south-west corner at (lon, lat)
    fn square(lon: f64, lat: f64, size: f64) -> Polygon<f64> {
        polygon![
            (x: lon, y: lat),
            (x: lon + size, y: lat),
            (x: lon + size, y: lat + size),
            (x: lon, y: lat + size),
            (x: lon, y: lat)
        ]
    }

    #[test]
    fn test_build_polygon() {
        let region = GeoRegion::new(
            0,
            Some(Geometry::Polygon(square(133.0, -28.0, 1.0))),
            props(json!({
                "SA3_CODE_2021": "70101",
                "SA3_NAME_2021": "Alice Springs",
                "STE_CODE_2021": "7",
                "SA4_CODE_2021": "701"
            })),
        );

        let feature = builder(Level::Sa3).build(&region).unwrap();
        assert_eq!(feature.code, "70101");
        assert_eq!(feature.name, "Alice Springs");
        assert_eq!(feature.state, "7");
        assert_eq!(feature.parent_code.as_deref(), Some("701"));
        assert_eq!(feature.polygon.len(), 5);

        let projector = Projector::new(Projection::default()).unwrap();
        let (x, y) = projector.project(133.0, -28.0);
        assert_eq!(feature.polygon[0], [x, y]);
        assert_eq!(feature.polygon[0], feature.polygon[4]);
    }

    #[test]
    fn test_build_sa4_has_no_parent() {
        let region = GeoRegion::new(
            0,
            Some(Geometry::Polygon(square(150.0, -34.0, 0.5))),
            props(json!({"SA4_CODE_2021": "102", "SA4_NAME_2021": "Central Coast", "STE_CODE_2021": "1"})),
        );
        let feature = builder(Level::Sa4).build(&region).unwrap();
        assert_eq!(feature.code, "102");
        assert_eq!(feature.parent_code, None);
    }

    #[test]
    fn test_build_multipolygon_missing_columns_gets_placeholder() {
        let mp = MultiPolygon::new(vec![square(140.0, -30.0, 0.2), square(141.0, -30.0, 1.0)]);
        let region = GeoRegion::new(7, Some(Geometry::MultiPolygon(mp)), props(json!({"OTHER": 1})));

        let feature = builder(Level::Sa4).build(&region).unwrap();
        assert_eq!(feature.code, "UNKNOWN_7");
        assert_eq!(feature.name, "UNKNOWN_7");
        assert_eq!(feature.state, "UNKNOWN");
        assert!(!feature.polygon.is_empty());
    }

    #[test]
    fn test_build_multipolygon_uses_largest_part() {
        let small = square(140.0, -30.0, 0.2);
        let large = square(145.0, -30.0, 1.0);
        let mp = MultiPolygon::new(vec![small, large]);
        let region = GeoRegion::new(0, Some(Geometry::MultiPolygon(mp)), Map::new());

        let feature = builder(Level::Sa4).build(&region).unwrap();
        let projector = Projector::new(Projection::default()).unwrap();
        let (x, _) = projector.project(145.0, -30.0);
        assert_eq!(feature.polygon[0][0], x);
    }

    #[test]
    fn test_build_two_vertex_polygon_is_dropped() {
        let degenerate = Polygon::new(
            line_string![(x: 133.0, y: -27.0), (x: 134.0, y: -26.0), (x: 133.0, y: -27.0)],
            vec![],
        );
        let region = GeoRegion::new(0, Some(Geometry::Polygon(degenerate)), Map::new());

        assert_eq!(builder(Level::Sa3).build(&region), None);
        assert_eq!(
            builder(Level::Sa3).try_build(&region),
            Err(SkipReason::DegenerateRing(2))
        );
    }

    #[test]
    fn test_build_empty_and_missing_geometry() {
        let b = builder(Level::Sa3);
        let missing = GeoRegion::new(0, None, Map::new());
        assert_eq!(b.try_build(&missing), Err(SkipReason::EmptyGeometry));

        let empty = GeoRegion::new(1, Some(Geometry::MultiPolygon(MultiPolygon::new(vec![]))), Map::new());
        assert_eq!(b.try_build(&empty), Err(SkipReason::EmptyGeometry));
    }

    #[test]
    fn test_build_unsupported_geometry_is_dropped() {
        let region = GeoRegion::new(0, Some(Geometry::Point(Point::new(133.0, -27.0))), Map::new());
        assert_eq!(
            builder(Level::Sa3).try_build(&region),
            Err(SkipReason::DegenerateRing(0))
        );
    }

    #[test]
    fn test_built_features_satisfy_output_invariants() {
        let regions: Vec<GeoRegion> = (0..6)
            .map(|i| {
                let lon = 115.0 + i as f64 * 6.0;
                GeoRegion::new(i, Some(Geometry::Polygon(square(lon, -35.0, 2.0))), Map::new())
            })
            .collect();

        let report = builder(Level::Sa3).build_all(&regions);
        assert_eq!(report.features.len(), 6);
        for feature in &report.features {
            assert!(feature.polygon.len() >= 3);
            assert!(!feature.code.is_empty());
            assert!(!feature.name.is_empty());
            assert!(!feature.state.is_empty());
            for [x, y] in &feature.polygon {
                assert!((0.0..=1000.0).contains(x));
                assert!((0.0..=760.0).contains(y));
            }
        }
    }

    #[test]
    fn test_build_all_preserves_order_and_counts_skips() {
        let regions = vec![
            GeoRegion::new(0, Some(Geometry::Polygon(square(120.0, -30.0, 1.0))), props(json!({"code": "a"}))),
            GeoRegion::new(1, None, props(json!({"code": "b"}))),
            GeoRegion::new(
                2,
                Some(Geometry::Polygon(Polygon::new(
                    line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)],
                    vec![],
                ))),
                props(json!({"code": "c"})),
            ),
            GeoRegion::new(3, Some(Geometry::Polygon(square(125.0, -30.0, 1.0))), props(json!({"code": "d"}))),
        ];

        let report = builder(Level::Sa4).build_all(&regions);
        let codes: Vec<&str> = report.features.iter().map(|f| f.code.as_str()).collect();
        assert_eq!(codes, vec!["a", "d"]);
        assert_eq!(report.skipped_empty, 1);
        assert_eq!(report.skipped_degenerate, 1);
        assert_eq!(report.skipped(), 2);
    }

    #[test]
    fn test_distinct_vertices_counts_closing_point_once() {
        let ring = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 0.0), (x: 1.0, y: 1.0), (x: 0.0, y: 0.0)];
        assert_eq!(distinct_vertices(&ring), 3);
        assert_eq!(distinct_vertices(&LineString::new(vec![])), 0);
    }

    #[test]
    fn test_build_with_custom_schema() {
        let schema = AttributeSchema {
            code: AttributeChain::new(["LGA_CODE"], Fallback::Placeholder("LGA_")),
            name: AttributeChain::new(["LGA_NAME"], Fallback::Code),
            state: AttributeChain::new(["STATE"], Fallback::Absent),
            parent: Some(AttributeChain::new(["REGION"], Fallback::Literal("NONE"))),
        };
        let b = builder(Level::Sa4).with_schema(schema);

        let region = GeoRegion::new(
            3,
            Some(Geometry::Polygon(square(146.0, -38.0, 1.0))),
            props(json!({"STATE": "2", "SA4_CODE_2021": "206"})),
        );
        let feature = b.build(&region).unwrap();
        assert_eq!(feature.code, "LGA_3");
        assert_eq!(feature.name, "LGA_3");
        assert_eq!(feature.state, "2");
        assert_eq!(feature.parent_code.as_deref(), Some("NONE"));

        let stateless = GeoRegion::new(
            4,
            Some(Geometry::Polygon(square(146.0, -38.0, 1.0))),
            props(json!({"LGA_CODE": "20110"})),
        );
        assert_eq!(b.try_build(&stateless), Err(SkipReason::MissingAttributes));

        let report = b.build_all(&[region, stateless]);
        assert_eq!(report.features.len(), 1);
        assert_eq!(report.skipped_unidentified, 1);
        assert_eq!(report.skipped(), 1);
    }
}
