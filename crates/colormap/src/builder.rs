//! Colormap construction from pixel statistics.
//!
//! Two strategies are supported:
//!
//! - **Discrete**: each ramp anchor is projected onto the 0..=255 bin scale
//!   through the layer's min/max, giving a sparse table with one entry per
//!   anchor. The tile service interpolates between entries
//!   (`colormap_type=linear`).
//! - **Continuous**: the ramp colors are interpolated in CIELAB into 256
//!   evenly spaced steps, with the lowest bins made mostly transparent to
//!   hide near-zero noise.
//!
//! Both return the layer's rescale window, which is always the 2nd/98th
//! percentile pair regardless of strategy.

use std::collections::BTreeMap;

use preview_common::{PixelStats, PreviewError, PreviewResult, RescaleRange};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::scale::{linear_scale, MAX_BIN};
use crate::{ColorRamp, Rgba};

/// Bins at or below this get `LOW_BIN_ALPHA` in continuous colormaps.
pub const LOW_BIN_CUTOFF: u8 = 6;

/// Alpha for the lowest continuous bins.
pub const LOW_BIN_ALPHA: u8 = 50;

/// Lookup table from intensity bin to color. Always contains bins 0 and 255.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<u8, Rgba>", into = "BTreeMap<u8, Rgba>")]
pub struct Colormap {
    entries: BTreeMap<u8, Rgba>,
}

impl TryFrom<BTreeMap<u8, Rgba>> for Colormap {
    type Error = PreviewError;

    fn try_from(entries: BTreeMap<u8, Rgba>) -> Result<Self, Self::Error> {
        Colormap::new(entries)
    }
}

impl From<Colormap> for BTreeMap<u8, Rgba> {
    fn from(cm: Colormap) -> Self {
        cm.entries
    }
}

impl Colormap {
    pub fn new(entries: BTreeMap<u8, Rgba>) -> PreviewResult<Self> {
        if !entries.contains_key(&0) || !entries.contains_key(&MAX_BIN) {
            return Err(PreviewError::InvalidColorRamp(
                "colormap must contain bins 0 and 255".to_string(),
            ));
        }
        Ok(Self { entries })
    }

    pub fn get(&self, bin: u8) -> Option<&Rgba> {
        self.entries.get(&bin)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: bins 0 and 255 are present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in ascending bin order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, Rgba)> + '_ {
        self.entries.iter().map(|(&bin, &color)| (bin, color))
    }

    /// JSON form the tile service accepts: `{"0": [r, g, b, a], ...}`.
    pub fn to_json(&self) -> String {
        // A map of u8 keys to fixed arrays cannot fail to serialize.
        serde_json::to_string(&self.entries).unwrap_or_default()
    }

    /// Fill in every bin by linear RGBA interpolation between keyed bins,
    /// matching the tile service's `colormap_type=linear` expansion. Fractional
    /// channels truncate, as the service's 8-bit cast does.
    pub fn expand_linear(&self) -> Colormap {
        let keys: Vec<(u8, Rgba)> = self.iter().collect();
        let mut entries = BTreeMap::new();

        for pair in keys.windows(2) {
            let (lo_bin, lo) = pair[0];
            let (hi_bin, hi) = pair[1];
            let span = (hi_bin - lo_bin) as u32;
            for bin in lo_bin..=hi_bin {
                entries.insert(bin, lo.blend(&hi, (bin - lo_bin) as u32, span));
            }
        }

        Colormap { entries }
    }
}

/// Which colormap construction to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuildStrategy {
    /// One control point per ramp anchor
    #[default]
    Discrete,
    /// 256 CIELAB-interpolated steps
    Continuous,
}

/// The derived visual encoding for one raster layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RasterStyle {
    pub colormap: Colormap,
    pub rescale: RescaleRange,
}

/// Builds colormaps for raster layers from one color ramp.
#[derive(Debug, Clone, Default)]
pub struct ColormapBuilder {
    ramp: ColorRamp,
}

impl ColormapBuilder {
    pub fn new(ramp: ColorRamp) -> Self {
        Self { ramp }
    }

    pub fn ramp(&self) -> &ColorRamp {
        &self.ramp
    }

    pub fn build(&self, strategy: BuildStrategy, stats: &PixelStats) -> RasterStyle {
        match strategy {
            BuildStrategy::Discrete => self.discrete(stats),
            BuildStrategy::Continuous => self.continuous(stats),
        }
    }

    /// Bin each anchor would land on before endpoint pinning.
    pub fn anchor_bins(&self, stats: &PixelStats) -> Vec<u8> {
        self.ramp
            .stops()
            .iter()
            .map(|stop| linear_scale(stats.min, stats.max, stats.percentile(stop.percentile)))
            .collect()
    }

    /// Sparse colormap with one control point per anchor.
    ///
    /// The first anchor is pinned to bin 0 and the last to bin 255. When two
    /// interior anchors land on the same bin the later one wins; pinned
    /// endpoints always win over interior anchors.
    pub fn discrete(&self, stats: &PixelStats) -> RasterStyle {
        if !stats.is_ordered() {
            warn!(?stats, "Pixel statistics are not monotonic");
        }

        let stops = self.ramp.stops();
        let last = stops.len() - 1;
        let mut bins = self.anchor_bins(stats);
        bins[0] = 0;
        bins[last] = MAX_BIN;

        for (i, pair) in bins.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                warn!(
                    anchor = i + 1,
                    bin = pair[1],
                    previous = pair[0],
                    "Anchor bin does not increase; later anchor overwrites on collision"
                );
            }
        }

        let mut entries = BTreeMap::new();
        for i in 1..last {
            entries.insert(bins[i], stops[i].color);
        }
        entries.insert(0, stops[0].color);
        entries.insert(MAX_BIN, stops[last].color);

        debug!(?bins, entries = entries.len(), "Built discrete colormap");

        RasterStyle {
            colormap: Colormap { entries },
            rescale: stats.rescale_range(),
        }
    }

    /// 256-step colormap interpolated in CIELAB between consecutive ramp colors.
    pub fn continuous(&self, stats: &PixelStats) -> RasterStyle {
        let stops = self.ramp.stops();
        let segments = (stops.len() - 1) as f64;
        let mut entries = BTreeMap::new();

        for bin in 0..=MAX_BIN {
            let pos = bin as f64 / MAX_BIN as f64 * segments;
            let seg = (pos.floor() as usize).min(stops.len() - 2);
            let t = pos - seg as f64;
            let color = stops[seg].color.lerp_lab(&stops[seg + 1].color, t);
            let alpha = if bin <= LOW_BIN_CUTOFF { LOW_BIN_ALPHA } else { 255 };
            entries.insert(bin, color.with_alpha(alpha));
        }

        RasterStyle {
            colormap: Colormap { entries },
            rescale: stats.rescale_range(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats() -> PixelStats {
        PixelStats {
            min: 0.0,
            max: 1000.0,
            p2: 50.0,
            p20: 200.0,
            p40: 400.0,
            p60: 600.0,
            p80: 800.0,
            p98: 950.0,
        }
    }

    #[test]
    fn test_colormap_requires_endpoints() {
        let mut entries = BTreeMap::new();
        entries.insert(0, Rgba::opaque(0, 0, 0));
        assert!(Colormap::new(entries.clone()).is_err());
        entries.insert(255, Rgba::opaque(255, 255, 255));
        assert!(Colormap::new(entries).is_ok());
    }

    #[test]
    fn test_colormap_json() {
        let mut entries = BTreeMap::new();
        entries.insert(0, Rgba::new(0, 0, 0, 255));
        entries.insert(51, Rgba::new(1, 2, 3, 255));
        entries.insert(255, Rgba::new(255, 255, 255, 255));
        let cm = Colormap::new(entries).unwrap();
        assert_eq!(
            cm.to_json(),
            r#"{"0":[0,0,0,255],"51":[1,2,3,255],"255":[255,255,255,255]}"#
        );
        let back: Colormap = serde_json::from_str(&cm.to_json()).unwrap();
        assert_eq!(back, cm);
    }

    #[test]
    fn test_anchor_bins() {
        let builder = ColormapBuilder::new(ColorRamp::named("blues").unwrap());
        assert_eq!(builder.anchor_bins(&stats()), vec![13, 51, 102, 153, 204, 242]);
    }

    #[test]
    fn test_expand_linear_grey() {
        let mut entries = BTreeMap::new();
        entries.insert(0, Rgba::new(0, 0, 0, 255));
        entries.insert(255, Rgba::new(255, 255, 255, 255));
        let full = Colormap::new(entries).unwrap().expand_linear();
        assert_eq!(full.len(), 256);
        assert_eq!(full.get(128), Some(&Rgba::new(128, 128, 128, 255)));
        assert_eq!(full.get(0), Some(&Rgba::new(0, 0, 0, 255)));
        assert_eq!(full.get(255), Some(&Rgba::new(255, 255, 255, 255)));
    }

    #[test]
    fn test_expand_linear_truncates_half_steps() {
        let mut entries = BTreeMap::new();
        entries.insert(0, Rgba::new(0, 0, 0, 0));
        entries.insert(2, Rgba::new(1, 3, 5, 255));
        entries.insert(255, Rgba::new(255, 255, 255, 255));
        let full = Colormap::new(entries).unwrap().expand_linear();
        assert_eq!(full.get(1), Some(&Rgba::new(0, 1, 2, 127)));
    }
}
