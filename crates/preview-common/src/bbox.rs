//! Bounding box types and operations.

use serde::{Deserialize, Serialize};

/// A geographic bounding box in degrees (EPSG:4326).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoundsSpec", into = "[f64; 4]")]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

/// The two shapes a host may use for `map.bounds`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum BoundsSpec {
    /// `[west, south, east, north]`
    Flat([f64; 4]),
    /// `[[west, south], [east, north]]`
    Corners([[f64; 2]; 2]),
}

impl TryFrom<BoundsSpec> for BoundingBox {
    type Error = BboxParseError;

    fn try_from(spec: BoundsSpec) -> Result<Self, Self::Error> {
        let bbox = match spec {
            BoundsSpec::Flat([w, s, e, n]) => BoundingBox::new(w, s, e, n),
            BoundsSpec::Corners([[w, s], [e, n]]) => BoundingBox::new(w, s, e, n),
        };
        bbox.validate()?;
        Ok(bbox)
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(bbox: BoundingBox) -> Self {
        [bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y]
    }
}

impl BoundingBox {
    /// Create a new bounding box from corner coordinates.
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self {
            min_x,
            min_y,
            max_x,
            max_y,
        }
    }

    /// Check that the box is finite, non-empty and within latitude limits.
    pub fn validate(&self) -> Result<(), BboxParseError> {
        let coords = [self.min_x, self.min_y, self.max_x, self.max_y];
        if coords.iter().any(|c| !c.is_finite()) {
            return Err(BboxParseError::NonFinite);
        }
        if self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(BboxParseError::Inverted(*self));
        }
        if self.min_y < -90.0 || self.max_y > 90.0 {
            return Err(BboxParseError::LatitudeOutOfRange(self.min_y, self.max_y));
        }
        Ok(())
    }

    /// Corner pairs `[[west, south], [east, north]]` as the rendering engine expects them.
    pub fn to_corners(&self) -> [[f64; 2]; 2] {
        [[self.min_x, self.min_y], [self.max_x, self.max_y]]
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BboxParseError {
    #[error("Bounds contain a non-finite coordinate")]
    NonFinite,

    #[error("Bounds are empty or inverted: {0:?}")]
    Inverted(BoundingBox),

    #[error("Latitude range {0}..{1} is outside -90..90")]
    LatitudeOutOfRange(f64, f64),
}
