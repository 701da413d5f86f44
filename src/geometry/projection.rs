use serde::Deserialize;
use thiserror::Error;

/// Geographic extent (degrees) mapped onto the viewport
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GeoBounds {
    pub min_lon: f64,
    pub max_lon: f64,
    pub min_lat: f64,
    pub max_lat: f64,
}

impl GeoBounds {
    /// Mainland Australia plus Tasmania
    pub const AUSTRALIA: GeoBounds = GeoBounds {
        min_lon: 113.0,
        max_lon: 154.0,
        min_lat: -44.0,
        max_lat: -10.0,
    };

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }
}

/// Output viewport size in display units
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const DEFAULT: Viewport = Viewport {
        width: 1000.0,
        height: 760.0,
    };
}

/// Bounds and viewport travel together so every feature of a run
/// shares one coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Projection {
    pub bounds: GeoBounds,
    pub viewport: Viewport,
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            bounds: GeoBounds::AUSTRALIA,
            viewport: Viewport::DEFAULT,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ProjectionError {
    #[error("projection bounds must have max > min on both axes, got {0:?}")]
    EmptyBounds(GeoBounds),
    #[error("viewport must be positive and finite, got {width} x {height}")]
    InvalidViewport { width: f64, height: f64 },
}

/// Linear bounding-box fit from lon/lat to viewport coordinates
///
/// - x = (lon - min_lon) / (max_lon - min_lon) * width
/// - y = (1 - (lat - min_lat) / (max_lat - min_lat)) * height
///
/// Y is flipped because viewport rows grow downward. Not a conformal or
/// equal-area projection; points outside the bounds land outside the
/// viewport, nothing is clamped.
#[derive(Debug, Clone)]
pub struct Projector {
    bounds: GeoBounds,
    viewport: Viewport,
}

/// Decimal places kept in projected output
const PRECISION: f64 = 100.0;

impl Projector {
    pub fn new(projection: Projection) -> Result<Self, ProjectionError> {
        let Projection { bounds, viewport } = projection;

        let finite = [bounds.min_lon, bounds.max_lon, bounds.min_lat, bounds.max_lat]
            .iter()
            .all(|v| v.is_finite());
        if !finite || bounds.width() <= 0.0 || bounds.height() <= 0.0 {
            return Err(ProjectionError::EmptyBounds(bounds));
        }
        if !(viewport.width.is_finite() && viewport.height.is_finite())
            || viewport.width <= 0.0
            || viewport.height <= 0.0
        {
            return Err(ProjectionError::InvalidViewport {
                width: viewport.width,
                height: viewport.height,
            });
        }

        Ok(Self { bounds, viewport })
    }

    /// Project a lon/lat point to viewport (x, y), rounded to 2 decimals
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        let b = &self.bounds;
        let x = (lon - b.min_lon) / b.width() * self.viewport.width;
        let y = (1.0 - (lat - b.min_lat) / b.height()) * self.viewport.height;

        (round(x), round(y))
    }

    /// Project a ring of lon/lat points, preserving order
    pub fn project_points(&self, points: &[(f64, f64)]) -> Vec<[f64; 2]> {
        points
            .iter()
            .map(|&(lon, lat)| {
                let (x, y) = self.project(lon, lat);
                [x, y]
            })
            .collect()
    }

    pub fn bounds(&self) -> &GeoBounds {
        &self.bounds
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }
}

/// Halves go to the even neighbour, matching Python's `round(x, 2)`
fn round(v: f64) -> f64 {
    (v * PRECISION).round_ties_even() / PRECISION
}
