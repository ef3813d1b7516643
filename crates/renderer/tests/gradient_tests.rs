//! Tests for gradients, presets and gradient configuration.

use renderer::style::{rgb_to_hex, ColorSpace};
use renderer::{
    default_gradient, Gradient, GradientConfig, GradientError, GradientLibrary, GradientStop, Rgb,
    DEFAULT_GRADIENT,
};
use test_utils::{assert_approx_eq, temp_test_dir, write_test_file};

const CONFIG: &str = r##"{
    "version": "1.0",
    "gradients": {
        "heat": {
            "description": "Black to yellow",
            "stops": [
                { "position": 0.0, "color": "#000000" },
                { "position": 0.5, "color": "#FF0000" },
                { "position": 1.0, "color": "#FFFF00" }
            ]
        },
        "viridis": {
            "color_space": "linear",
            "stops": [
                { "position": 0.0, "color": "#000000" },
                { "position": 1.0, "color": "#FFFFFF" }
            ]
        }
    }
}"##;

// ============================================================================
// Gradient lookups
// ============================================================================

#[test]
fn test_stop_colors_are_exact() {
    let library = GradientLibrary::builtin();
    let jet = library.get("jet").unwrap();
    assert_eq!(rgb_to_hex(jet.color_at(0.0).to_u8()), "#00007F");
    assert_eq!(rgb_to_hex(jet.color_at(0.5).to_u8()), "#7FFF7F");
    assert_eq!(rgb_to_hex(jet.color_at(1.0).to_u8()), "#7F0000");
}

#[test]
fn test_out_of_range_positions_clamp() {
    let gradient = default_gradient();
    assert_eq!(gradient.color_at(-3.0), gradient.color_at(0.0));
    assert_eq!(gradient.color_at(7.5), gradient.color_at(1.0));
}

#[test]
fn test_blend_happens_in_linear_light() {
    let gradient = Gradient::grayscale();
    let mid = gradient.color_at(0.5);
    // Linear 0.5 encodes to about 0.735, not 0.5
    assert_approx_eq!(mid.r, 0.7354, 1e-3);
    assert_eq!(mid.r, mid.g);
    assert_eq!(mid.g, mid.b);
}

#[test]
fn test_every_output_is_gamma_encoded() {
    let gradient = Gradient::new(
        "dim",
        vec![
            GradientStop::new(0.0, Rgb::new(0.2, 0.2, 0.2)),
            GradientStop::new(1.0, Rgb::new(0.2, 0.2, 0.2)),
        ],
    )
    .unwrap();
    for t in [0.0, 0.3, 1.0] {
        assert_eq!(gradient.color_at(t), Rgb::new(0.2, 0.2, 0.2).to_srgb());
    }
}

fn three_stop() -> Gradient {
    Gradient::new(
        "three",
        vec![
            GradientStop::new(0.0, Rgb::new(0.0, 0.0, 1.0)),
            GradientStop::new(0.4, Rgb::new(0.2, 0.9, 0.1)),
            GradientStop::new(1.0, Rgb::new(1.0, 0.3, 0.0)),
        ],
    )
    .unwrap()
}

fn max_diff(a: Rgb, b: Rgb) -> f32 {
    (a.r - b.r).abs().max((a.g - b.g).abs()).max((a.b - b.b).abs())
}

#[test]
fn test_continuous_across_interior_stop() {
    let gradient = three_stop();
    let stop = gradient.stops()[1];
    let at_stop = stop.color.to_srgb();
    assert!(max_diff(gradient.color_at(stop.position), at_stop) < 1e-6);

    let mut previous = f32::INFINITY;
    for eps in [1e-2f32, 1e-3, 1e-5] {
        let below = max_diff(gradient.color_at(stop.position - eps), at_stop);
        let above = max_diff(gradient.color_at(stop.position + eps), at_stop);
        let err = below.max(above);
        assert!(err < 10.0 * eps, "eps {}: off by {}", eps, err);
        assert!(err < previous);
        previous = err;
    }
}

#[test]
fn test_blend_uses_bracketing_stops() {
    let gradient = three_stop();
    let stops = gradient.stops();

    // (t, lower stop, local position within the segment)
    for (t, lo, local) in [(0.1f32, 0usize, 0.25f32), (0.85, 1, 0.75)] {
        let expected = stops[lo].color.lerp(stops[lo + 1].color, local).to_srgb();
        let actual = gradient.color_at(t);
        assert_approx_eq!(actual.r, expected.r, 1e-5);
        assert_approx_eq!(actual.g, expected.g, 1e-5);
        assert_approx_eq!(actual.b, expected.b, 1e-5);
    }
}

#[test]
fn test_srgb_round_trip() {
    for v in [0.0f32, 0.01, 0.2, 0.5, 0.9, 1.0] {
        let c = Rgb::new(v, v, v);
        assert_approx_eq!(c.to_srgb().to_linear().r, v, 1e-5);
    }
}

// ============================================================================
// Library and configuration
// ============================================================================

#[test]
fn test_builtin_names_sorted() {
    let library = GradientLibrary::default();
    let names: Vec<&str> = library.names().collect();
    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
    assert!(names.contains(&DEFAULT_GRADIENT));
    assert!(names.contains(&"gray"));
}

#[test]
fn test_config_adds_and_replaces() {
    let config = GradientConfig::from_json(CONFIG).unwrap();
    let builtin = GradientLibrary::builtin();
    let library = GradientLibrary::with_config(&config).unwrap();

    assert_eq!(library.len(), builtin.len() + 1);
    let heat = library.require("heat").unwrap();
    assert_eq!(heat.stops().len(), 3);
    assert_eq!(heat.color_at(0.5).to_u8(), [255, 0, 0]);

    let viridis = library.require("viridis").unwrap();
    assert_eq!(viridis.stops().len(), 2);
    assert_eq!(config.get("viridis").unwrap().color_space, ColorSpace::Linear);
}

#[test]
fn test_config_from_file() {
    let dir = temp_test_dir();
    let path = write_test_file(&dir, "gradients.json", CONFIG.as_bytes());
    let config = GradientConfig::from_file(&path).unwrap();
    assert_eq!(config.version, "1.0");
    assert_eq!(config.gradients.len(), 2);
}

#[test]
fn test_config_missing_file() {
    let dir = temp_test_dir();
    let result = GradientConfig::from_file(dir.path().join("nope.json"));
    assert!(matches!(result, Err(GradientError::Io { .. })));
}

#[test]
fn test_config_rejects_bad_definitions() {
    let bad_color = r##"{ "gradients": { "x": { "stops": [
        { "position": 0.0, "color": "#000000" },
        { "position": 1.0, "color": "red" }
    ] } } }"##;
    let config = GradientConfig::from_json(bad_color).unwrap();
    assert!(matches!(
        GradientLibrary::with_config(&config),
        Err(GradientError::InvalidColor { .. })
    ));

    let bad_stops = r##"{ "gradients": { "x": { "stops": [
        { "position": 0.0, "color": "#000000" },
        { "position": 0.8, "color": "#FFFFFF" }
    ] } } }"##;
    let config = GradientConfig::from_json(bad_stops).unwrap();
    assert!(matches!(config.build_all(), Err(GradientError::BadEndpoints { .. })));

    assert!(matches!(GradientConfig::from_json("{"), Err(GradientError::Parse(_))));
}

#[test]
fn test_config_json_round_trip() {
    let config = GradientConfig::from_json(CONFIG).unwrap();
    let again = GradientConfig::from_json(&config.to_json().unwrap()).unwrap();
    assert_eq!(again.gradients.len(), config.gradients.len());
    assert_eq!(again.get("heat").unwrap().stops.len(), 3);
}
