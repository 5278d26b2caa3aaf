//! Color ramps anchored at statistical percentiles.

use preview_common::{PreviewError, PreviewResult, STAT_PERCENTILES};
use serde::{Deserialize, Serialize};

use crate::Rgba;

/// One anchor of a ramp: a percentile of the layer's pixel distribution and its color.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RampStop {
    /// Percentile in 0..=100
    pub percentile: f64,
    pub color: Rgba,
}

/// Ordered anchor colors with strictly increasing percentiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RampStop>", into = "Vec<RampStop>")]
pub struct ColorRamp {
    stops: Vec<RampStop>,
}

impl TryFrom<Vec<RampStop>> for ColorRamp {
    type Error = PreviewError;

    fn try_from(stops: Vec<RampStop>) -> Result<Self, Self::Error> {
        ColorRamp::new(stops)
    }
}

impl From<ColorRamp> for Vec<RampStop> {
    fn from(ramp: ColorRamp) -> Self {
        ramp.stops
    }
}

/// Built-in ramps as six hex colors, one per precomputed percentile.
const NAMED_RAMPS: &[(&str, [&str; 6])] = &[
    (
        "blues",
        ["#eff3ff", "#c6dbef", "#9ecae1", "#6baed6", "#3182bd", "#08519c"],
    ),
    (
        "greens",
        ["#edf8e9", "#c7e9c0", "#a1d99b", "#74c476", "#31a354", "#006d2c"],
    ),
    (
        "reds",
        ["#fee5d9", "#fcbba1", "#fc9272", "#fb6a4a", "#de2d26", "#a50f15"],
    ),
    (
        "viridis",
        ["#440154", "#414487", "#2a788e", "#22a884", "#7ad151", "#fde725"],
    ),
];

/// Ramp used when the host does not name one.
pub const DEFAULT_RAMP: &str = "blues";

impl ColorRamp {
    /// Build a ramp, checking it has at least two stops with strictly
    /// increasing percentiles inside 0..=100.
    pub fn new(stops: Vec<RampStop>) -> PreviewResult<Self> {
        if stops.len() < 2 {
            return Err(PreviewError::InvalidColorRamp(format!(
                "need at least 2 stops, got {}",
                stops.len()
            )));
        }

        for stop in &stops {
            if !(0.0..=100.0).contains(&stop.percentile) {
                return Err(PreviewError::InvalidColorRamp(format!(
                    "percentile {} outside 0..100",
                    stop.percentile
                )));
            }
        }

        for pair in stops.windows(2) {
            if pair[1].percentile <= pair[0].percentile {
                return Err(PreviewError::InvalidColorRamp(format!(
                    "percentiles must be strictly increasing ({} then {})",
                    pair[0].percentile, pair[1].percentile
                )));
            }
        }

        Ok(Self { stops })
    }

    /// Anchor `colors` at the precomputed percentiles (for six colors) or at
    /// evenly spaced percentiles between 2 and 98 otherwise.
    pub fn evenly_spaced(colors: &[Rgba]) -> PreviewResult<Self> {
        let k = colors.len();
        let stops = colors
            .iter()
            .enumerate()
            .map(|(i, &color)| {
                let percentile = if k == STAT_PERCENTILES.len() {
                    STAT_PERCENTILES[i]
                } else if k > 1 {
                    2.0 + 96.0 * i as f64 / (k - 1) as f64
                } else {
                    2.0
                };
                RampStop { percentile, color }
            })
            .collect();
        Self::new(stops)
    }

    /// Look up one of the built-in ramps by name (case-insensitive).
    pub fn named(name: &str) -> PreviewResult<Self> {
        let (_, hexes) = NAMED_RAMPS
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .ok_or_else(|| PreviewError::InvalidColorRamp(format!("unknown ramp '{}'", name)))?;

        let colors = hexes
            .iter()
            .map(|h| {
                Rgba::from_hex(h)
                    .ok_or_else(|| PreviewError::InvalidColorRamp(format!("bad color '{}'", h)))
            })
            .collect::<PreviewResult<Vec<_>>>()?;

        Self::evenly_spaced(&colors)
    }

    /// Names of the built-in ramps.
    pub fn names() -> impl Iterator<Item = &'static str> {
        NAMED_RAMPS.iter().map(|(n, _)| *n)
    }

    pub fn stops(&self) -> &[RampStop] {
        &self.stops
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Always false: a ramp has at least two stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn first_color(&self) -> Rgba {
        self.stops[0].color
    }

    pub fn last_color(&self) -> Rgba {
        self.stops[self.stops.len() - 1].color
    }
}

impl Default for ColorRamp {
    fn default() -> Self {
        let black = Rgba::opaque(0, 0, 0);
        let white = Rgba::opaque(255, 255, 255);
        Self::named(DEFAULT_RAMP).unwrap_or(Self {
            stops: vec![
                RampStop {
                    percentile: 2.0,
                    color: black,
                },
                RampStop {
                    percentile: 98.0,
                    color: white,
                },
            ],
        })
    }
}
