//! Tests for colormap construction from pixel statistics.

use colormap::{BuildStrategy, ColorRamp, ColormapBuilder, RampStop, Rgba};
use preview_common::PixelStats;
use test_utils::{assert_approx_eq, degenerate_stats, dem_stats, zero_heavy_stats};

fn blues() -> ColorRamp {
    ColorRamp::named("blues").unwrap()
}

fn distinct_ramp() -> ColorRamp {
    ColorRamp::evenly_spaced(&[
        Rgba::opaque(10, 0, 0),
        Rgba::opaque(20, 0, 0),
        Rgba::opaque(30, 0, 0),
        Rgba::opaque(40, 0, 0),
        Rgba::opaque(50, 0, 0),
        Rgba::opaque(60, 0, 0),
    ])
    .unwrap()
}

// ============================================================================
// Discrete strategy
// ============================================================================

#[test]
fn test_dem_end_to_end() {
    let ramp = blues();
    let style = ColormapBuilder::new(ramp.clone()).discrete(&dem_stats());

    assert_eq!(style.rescale.to_param(), "50,950");
    assert_eq!(style.colormap.len(), 6);
    assert_eq!(style.colormap.get(0), Some(&ramp.first_color()));
    assert_eq!(style.colormap.get(255), Some(&ramp.last_color()));

    let bins: Vec<u8> = style.colormap.iter().map(|(bin, _)| bin).collect();
    assert_eq!(bins, vec![0, 51, 102, 153, 204, 255]);
}

#[test]
fn test_endpoints_present_for_any_stats() {
    let builder = ColormapBuilder::new(distinct_ramp());
    let cases = [
        dem_stats(),
        degenerate_stats(0.0),
        degenerate_stats(-42.0),
        zero_heavy_stats(),
        PixelStats {
            min: 10.0,
            max: -10.0,
            p2: 5.0,
            p20: 3.0,
            p40: 1.0,
            p60: -1.0,
            p80: -3.0,
            p98: -5.0,
        },
    ];

    for stats in cases {
        let style = builder.discrete(&stats);
        assert!(style.colormap.get(0).is_some(), "missing bin 0 for {:?}", stats);
        assert!(style.colormap.get(255).is_some(), "missing bin 255 for {:?}", stats);
    }
}

#[test]
fn test_endpoints_for_two_stop_ramp() {
    let ramp = ColorRamp::new(vec![
        RampStop {
            percentile: 20.0,
            color: Rgba::opaque(1, 1, 1),
        },
        RampStop {
            percentile: 80.0,
            color: Rgba::opaque(2, 2, 2),
        },
    ])
    .unwrap();
    let style = ColormapBuilder::new(ramp).discrete(&dem_stats());
    assert_eq!(style.colormap.len(), 2);
    assert_eq!(style.colormap.get(0), Some(&Rgba::opaque(1, 1, 1)));
    assert_eq!(style.colormap.get(255), Some(&Rgba::opaque(2, 2, 2)));
}

#[test]
fn test_degenerate_stats_keep_only_endpoints() {
    let ramp = distinct_ramp();
    let style = ColormapBuilder::new(ramp.clone()).discrete(&degenerate_stats(7.0));

    assert_eq!(style.colormap.len(), 2);
    assert_eq!(style.colormap.get(0), Some(&ramp.first_color()));
    assert_eq!(style.colormap.get(255), Some(&ramp.last_color()));
    assert_eq!(style.rescale.to_param(), "7,7");
}

// ============================================================================
// Collision policy
// ============================================================================

#[test]
fn test_interior_collision_keeps_last_anchor() {
    let mut stats = dem_stats();
    stats.p40 = 500.0;
    stats.p60 = 500.0;

    let ramp = distinct_ramp();
    let style = ColormapBuilder::new(ramp.clone()).discrete(&stats);

    // p40 and p60 both land on bin 128; the p60 anchor (index 3) wins.
    assert_eq!(style.colormap.get(128), Some(&ramp.stops()[3].color));
    assert_eq!(style.colormap.len(), 5);
}

#[test]
fn test_pinned_endpoints_win_over_interior() {
    let ramp = distinct_ramp();
    let style = ColormapBuilder::new(ramp.clone()).discrete(&zero_heavy_stats());

    // p20 and p40 project onto bin 0 but the first anchor keeps it.
    assert_eq!(style.colormap.get(0), Some(&ramp.first_color()));
    let bins: Vec<u8> = style.colormap.iter().map(|(bin, _)| bin).collect();
    assert_eq!(bins, vec![0, 3, 26, 255]);
    assert_eq!(style.colormap.get(3), Some(&ramp.stops()[3].color));
}

#[test]
fn test_descending_bins_are_still_placed() {
    let mut stats = dem_stats();
    stats.p40 = 100.0;

    let ramp = distinct_ramp();
    let style = ColormapBuilder::new(ramp.clone()).discrete(&stats);

    // p40 lands below p20 but is still present.
    assert_eq!(style.colormap.get(26), Some(&ramp.stops()[2].color));
    assert_eq!(style.colormap.get(51), Some(&ramp.stops()[1].color));
    assert_eq!(style.colormap.len(), 6);
}

// ============================================================================
// Continuous strategy
// ============================================================================

#[test]
fn test_continuous_has_256_steps() {
    let style = ColormapBuilder::new(blues()).continuous(&dem_stats());
    assert_eq!(style.colormap.len(), 256);
    assert_eq!(style.rescale.to_param(), "50,950");
}

#[test]
fn test_continuous_low_bins_translucent() {
    let style = ColormapBuilder::new(blues()).continuous(&dem_stats());
    for (bin, color) in style.colormap.iter() {
        let expected = if bin <= 6 { 50 } else { 255 };
        assert_eq!(color.a, expected, "alpha at bin {}", bin);
    }
}

#[test]
fn test_continuous_endpoints_match_ramp() {
    let ramp = blues();
    let style = ColormapBuilder::new(ramp.clone()).continuous(&dem_stats());
    assert_eq!(style.colormap.get(0), Some(&ramp.first_color().with_alpha(50)));
    assert_eq!(style.colormap.get(255), Some(&ramp.last_color()));
}

#[test]
fn test_continuous_darkens_monotonically_for_blues() {
    // Blues runs from near-white to dark blue, so Lab lightness falls
    // steadily across all 256 steps.
    let style = ColormapBuilder::new(blues()).continuous(&dem_stats());
    let luma: Vec<f64> = style
        .colormap
        .iter()
        .map(|(_, c)| 0.2126 * c.r as f64 + 0.7152 * c.g as f64 + 0.0722 * c.b as f64)
        .collect();
    for pair in luma.windows(2) {
        assert!(pair[1] <= pair[0] + 2.0, "lightness rose: {:?}", pair);
    }
}

#[test]
fn test_build_dispatch() {
    let builder = ColormapBuilder::new(blues());
    assert_eq!(
        builder.build(BuildStrategy::Discrete, &dem_stats()),
        builder.discrete(&dem_stats())
    );
    assert_eq!(
        builder.build(BuildStrategy::Continuous, &dem_stats()).colormap.len(),
        256
    );
}

// ============================================================================
// Linear expansion
// ============================================================================

#[test]
fn test_expand_linear_matches_keys() {
    let style = ColormapBuilder::new(blues()).discrete(&dem_stats());
    let full = style.colormap.expand_linear();
    assert_eq!(full.len(), 256);
    for (bin, color) in style.colormap.iter() {
        assert_eq!(full.get(bin), Some(&color));
    }

    // Halfway between bin 0 and bin 51
    let lo = style.colormap.get(0).unwrap();
    let hi = style.colormap.get(51).unwrap();
    let mid = full.get(25).unwrap();
    assert_approx_eq!(mid.r, (lo.r as f64 * 26.0 + hi.r as f64 * 25.0) / 51.0, 1.0);
}
