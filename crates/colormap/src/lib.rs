//! Color encoding for raster layers.
//!
//! Turns a layer's precomputed pixel statistics into the visual encoding the
//! tile service applies:
//! - Linear value-to-bin scaling
//! - Color ramps with percentile anchors
//! - Sparse (discrete) and 256-step (continuous) colormaps

pub mod builder;
pub mod color;
pub mod ramp;
pub mod scale;

pub use builder::{BuildStrategy, Colormap, ColormapBuilder, RasterStyle};
pub use color::Rgba;
pub use ramp::{ColorRamp, RampStop};
pub use scale::linear_scale;
