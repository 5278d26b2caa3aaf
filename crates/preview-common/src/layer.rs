//! Layer descriptors and precomputed pixel statistics.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{PreviewError, PreviewResult};

/// Percentiles precomputed for every raster layer in the catalog.
pub const STAT_PERCENTILES: [f64; 6] = [2.0, 20.0, 40.0, 60.0, 80.0, 98.0];

/// Kind of a catalog layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Gridded numeric image rendered through the tile service
    Raster,
    /// Geometry + attribute dataset rendered as shapes
    Vector,
    /// Anything else the host sent; skipped with a warning
    Unsupported(String),
}

impl From<String> for LayerKind {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "raster" => LayerKind::Raster,
            "vector" => LayerKind::Vector,
            _ => LayerKind::Unsupported(s),
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerKind::Raster => write!(f, "raster"),
            LayerKind::Vector => write!(f, "vector"),
            LayerKind::Unsupported(kind) => write!(f, "{}", kind),
        }
    }
}

/// The data-value window mapped onto the visual intensity scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RescaleRange {
    pub low: f64,
    pub high: f64,
}

impl RescaleRange {
    /// Query-string form: `"{low},{high}"`.
    pub fn to_param(&self) -> String {
        format!("{},{}", self.low, self.high)
    }
}

/// Precomputed pixel statistics for a raster layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelStats {
    pub min: f64,
    pub max: f64,
    pub p2: f64,
    pub p20: f64,
    pub p40: f64,
    pub p60: f64,
    pub p80: f64,
    pub p98: f64,
}

impl PixelStats {
    /// Control points `(percentile, value)` from 0 to 100.
    fn knots(&self) -> [(f64, f64); 8] {
        [
            (0.0, self.min),
            (2.0, self.p2),
            (20.0, self.p20),
            (40.0, self.p40),
            (60.0, self.p60),
            (80.0, self.p80),
            (98.0, self.p98),
            (100.0, self.max),
        ]
    }

    /// Data value at percentile `p` (0 = min, 100 = max).
    ///
    /// Percentiles between the stored ones are linearly interpolated; values
    /// outside 0..=100 are clamped.
    pub fn percentile(&self, p: f64) -> f64 {
        let p = p.clamp(0.0, 100.0);
        let knots = self.knots();
        for pair in knots.windows(2) {
            let (p_lo, v_lo) = pair[0];
            let (p_hi, v_hi) = pair[1];
            if p == p_lo {
                return v_lo;
            }
            if p <= p_hi {
                let t = (p - p_lo) / (p_hi - p_lo);
                return v_lo + (v_hi - v_lo) * t;
            }
        }
        self.max
    }

    /// Whether `min <= p2 <= ... <= p98 <= max` holds.
    pub fn is_ordered(&self) -> bool {
        self.knots().windows(2).all(|w| w[0].1 <= w[1].1)
    }

    /// Rescale window for the tile service, always the 2nd/98th percentiles.
    pub fn rescale_range(&self) -> RescaleRange {
        RescaleRange {
            low: self.p2,
            high: self.p98,
        }
    }
}

/// Host serialization of a layer entry.
#[derive(Debug, Clone, Deserialize)]
struct RawLayer {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    pixel_min_value: Option<f64>,
    #[serde(default)]
    pixel_max_value: Option<f64>,
    #[serde(default)]
    pixel_percentile_2: Option<f64>,
    #[serde(default)]
    pixel_percentile_20: Option<f64>,
    #[serde(default)]
    pixel_percentile_40: Option<f64>,
    #[serde(default)]
    pixel_percentile_60: Option<f64>,
    #[serde(default)]
    pixel_percentile_80: Option<f64>,
    #[serde(default)]
    pixel_percentile_98: Option<f64>,
}

impl From<RawLayer> for LayerDescriptor {
    fn from(raw: RawLayer) -> Self {
        let pixel_stats = (|| {
            Some(PixelStats {
                min: raw.pixel_min_value?,
                max: raw.pixel_max_value?,
                p2: raw.pixel_percentile_2?,
                p20: raw.pixel_percentile_20?,
                p40: raw.pixel_percentile_40?,
                p60: raw.pixel_percentile_60?,
                p80: raw.pixel_percentile_80?,
                p98: raw.pixel_percentile_98?,
            })
        })();

        LayerDescriptor {
            name: raw.name,
            kind: LayerKind::from(raw.kind),
            source_url: raw.url.filter(|u| !u.trim().is_empty()),
            pixel_stats,
        }
    }
}

/// One entry of the catalog's layer list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawLayer")]
pub struct LayerDescriptor {
    /// Unique identifier within a scene
    pub name: String,

    /// Raster, vector, or something unsupported
    pub kind: LayerKind,

    /// Location of the raw data or tile source
    pub source_url: Option<String>,

    /// Precomputed statistics (raster layers only)
    pub pixel_stats: Option<PixelStats>,
}

impl LayerDescriptor {
    pub fn raster(
        name: impl Into<String>,
        source_url: impl Into<String>,
        stats: PixelStats,
    ) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Raster,
            source_url: Some(source_url.into()),
            pixel_stats: Some(stats),
        }
    }

    pub fn vector(name: impl Into<String>, source_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: LayerKind::Vector,
            source_url: Some(source_url.into()),
            pixel_stats: None,
        }
    }

    pub fn is_raster(&self) -> bool {
        self.kind == LayerKind::Raster
    }

    pub fn is_vector(&self) -> bool {
        self.kind == LayerKind::Vector
    }

    /// The source URL, or `InvalidLayerConfig` if the host left it out.
    pub fn require_source_url(&self) -> PreviewResult<&str> {
        self.source_url
            .as_deref()
            .ok_or_else(|| PreviewError::invalid_layer(&self.name, "missing source url"))
    }

    /// The pixel statistics, or `InvalidLayerConfig` if any value is missing.
    pub fn require_stats(&self) -> PreviewResult<&PixelStats> {
        self.pixel_stats
            .as_ref()
            .ok_or_else(|| PreviewError::invalid_layer(&self.name, "missing pixel statistics"))
    }
}
