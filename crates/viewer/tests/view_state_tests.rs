//! Tests for the viewer session: loading, selection, incremental refresh
//! and export.

use grib_reader::{InMemorySource, ReadError, SortKey, SortOrder};
use renderer::{RangePolicy, Rgb};
use test_utils::{
    create_ramp_grid, field_from_values, init_test_logging, named_metadata, temp_test_dir,
    write_test_file, Grib2Builder,
};
use viewer::{ViewState, ViewerConfig, ViewerError};

fn new_state() -> ViewState {
    init_test_logging();
    ViewState::new(ViewerConfig::default()).expect("default config is valid")
}

fn two_message_file() -> Vec<u8> {
    let mut bytes = Grib2Builder::new().build();
    bytes.extend(
        Grib2Builder::new()
            .with_parameter(3, 5)
            .with_level(100, 50000)
            .with_grid(6, 5)
            .build(),
    );
    bytes
}

fn memory_state(fields: Vec<grib_common::Field>) -> ViewState {
    let mut state = new_state();
    state.load_source(Box::new(InMemorySource::new(fields)), "memory");
    state
}

// ============================================================================
// Opening files
// ============================================================================

#[test]
fn test_open_selects_first_message() {
    let dir = temp_test_dir();
    let path = write_test_file(&dir, "two.grib2", &two_message_file());
    let mut state = new_state();

    state.open_file(&path).unwrap();
    assert_eq!(state.message_count(), 2);
    assert_eq!(state.current_message(), Some(0));
    assert!(state.last_error().is_none());

    let redrawn = state.refresh().unwrap();
    assert!(redrawn.raster && redrawn.colorbar && redrawn.display_size);

    let raster = state.raster().unwrap();
    assert_eq!((raster.width(), raster.height()), (4, 3));
    let bar = state.colorbar().unwrap();
    assert_eq!((bar.width(), bar.height()), (500, 20));
}

#[test]
fn test_failed_open_keeps_previous_file() {
    let dir = temp_test_dir();
    let path = write_test_file(&dir, "two.grib2", &two_message_file());
    let mut state = new_state();
    state.open_file(&path).unwrap();
    state.select_message(1).unwrap();

    let result = state.open_file(dir.path().join("missing.grib2"));
    assert!(matches!(result, Err(ViewerError::Read(ReadError::Open { .. }))));
    assert!(state.last_error().unwrap().contains("missing.grib2"));

    assert_eq!(state.message_count(), 2);
    assert_eq!(state.current_message(), Some(1));
    assert_eq!(state.field().unwrap().width(), 6);
}

#[test]
fn test_undecodable_first_message_is_reported() {
    let mut bytes = b"GRIB".to_vec();
    bytes.extend_from_slice(&[0, 0, 16, 1]);
    bytes.extend_from_slice(&[0u8; 4]);
    bytes.extend_from_slice(b"7777");
    bytes.extend(Grib2Builder::new().build());

    let dir = temp_test_dir();
    let path = write_test_file(&dir, "mixed.grib", &bytes);
    let mut state = new_state();

    state.open_file(&path).unwrap();
    assert_eq!(state.message_count(), 2);
    assert!(state.current_message().is_none());
    assert!(state.last_error().unwrap().contains("edition 1"));

    state.select_message(1).unwrap();
    assert_eq!(state.current_message(), Some(1));
}

// ============================================================================
// Selection
// ============================================================================

#[test]
fn test_bad_selection_keeps_field() {
    let mut state = memory_state(vec![field_from_values(2, 1, vec![1.0, 2.0])]);
    state.select_message(0).unwrap();
    state.refresh().unwrap();

    let result = state.select_message(5);
    assert!(matches!(
        result,
        Err(ViewerError::Read(ReadError::IndexOutOfRange { index: 5, count: 1 }))
    ));
    assert_eq!(state.current_message(), Some(0));
    assert!(state.raster().is_some());
    assert!(!state.needs_refresh());
}

#[test]
fn test_selecting_marks_raster_dirty() {
    let mut state = memory_state(vec![
        field_from_values(2, 1, vec![1.0, 2.0]),
        field_from_values(3, 2, create_ramp_grid(3, 2, 0.0, 1.0)),
    ]);
    state.select_message(0).unwrap();
    state.refresh().unwrap();

    state.select_message(1).unwrap();
    let redrawn = state.refresh().unwrap();
    assert!(redrawn.raster);
    assert!(!redrawn.colorbar);
    assert_eq!(state.raster().unwrap().width(), 3);
}

#[test]
fn test_field_summary() {
    let mut state = memory_state(vec![field_from_values(2, 2, vec![250.0, 260.0, 270.0, 280.0])]);
    assert!(state.field_summary().is_none());

    state.select_message(0).unwrap();
    let summary = state.field_summary().unwrap();
    assert_eq!(summary.index, 0);
    assert!(summary.to_string().contains("Value range: 250.000000 to 280.000000"));
}

#[test]
fn test_all_missing_field_is_selectable() {
    let mut state = memory_state(vec![field_from_values(3, 2, vec![f32::NAN; 6])]);
    state.set_settings(state.settings().clone().with_no_data_color(Rgb::WHITE));

    state.select_message(0).unwrap();
    state.refresh().unwrap();

    assert!(state.last_error().is_none());
    let summary = state.field_summary().unwrap().to_string();
    assert!(summary.contains("Missing points: 6"));
    assert!(state.raster().unwrap().pixels().iter().all(|&p| p == Rgb::WHITE));
    assert_eq!(state.default_colorbar_ticks().len(), 5);
}

// ============================================================================
// Incremental refresh
// ============================================================================

#[test]
fn test_zoom_only_changes_display_size() {
    let mut state = memory_state(vec![field_from_values(3, 2, create_ramp_grid(3, 2, 0.0, 6.0))]);
    state.select_message(0).unwrap();
    state.refresh().unwrap();
    assert_eq!(state.display_size(), Some((3, 2)));

    let change = state.set_settings(state.settings().clone().with_zoom(4));
    assert!(change.display_size && !change.raster && !change.colorbar);

    let redrawn = state.refresh().unwrap();
    assert!(redrawn.display_size);
    assert!(!redrawn.raster && !redrawn.colorbar);
    assert_eq!(state.display_size(), Some((12, 8)));
}

#[test]
fn test_range_and_no_data_redraw_raster_only() {
    let mut state = memory_state(vec![field_from_values(2, 2, vec![-1.0, 0.0, 1.0, 4.0])]);
    state.select_message(0).unwrap();
    state.refresh().unwrap();

    state.set_settings(state.settings().clone().with_range(RangePolicy::SymmetricAroundZero));
    let redrawn = state.refresh().unwrap();
    assert!(redrawn.raster && !redrawn.colorbar);

    state.set_settings(state.settings().clone().with_no_data_color(Rgb::WHITE));
    let redrawn = state.refresh().unwrap();
    assert!(redrawn.raster && !redrawn.colorbar);
}

#[test]
fn test_gradient_redraws_both() {
    let mut state = memory_state(vec![field_from_values(2, 1, vec![0.0, 1.0])]);
    state.select_message(0).unwrap();
    state.refresh().unwrap();
    let before = state.colorbar().unwrap().clone();

    state.set_gradient("magma").unwrap();
    let redrawn = state.refresh().unwrap();
    assert!(redrawn.raster && redrawn.colorbar);
    assert_ne!(state.colorbar().unwrap(), &before);
    assert_eq!(state.settings().gradient.name(), "magma");
}

#[test]
fn test_unchanged_settings_redraw_nothing() {
    let mut state = memory_state(vec![field_from_values(2, 1, vec![0.0, 1.0])]);
    state.select_message(0).unwrap();
    state.refresh().unwrap();

    let change = state.set_settings(state.settings().clone());
    assert!(change.is_empty());
    assert!(state.refresh().unwrap().is_empty());
}

#[test]
fn test_unknown_gradient_keeps_settings() {
    let mut state = new_state();
    let before = state.settings().clone();

    let result = state.set_gradient("rainbow");
    assert!(matches!(result, Err(ViewerError::Gradient(_))));
    assert_eq!(state.settings(), &before);
    assert!(state.last_error().unwrap().contains("rainbow"));
}

#[test]
fn test_quantized_raster_colors() {
    let mut state = memory_state(vec![field_from_values(50, 1, create_ramp_grid(50, 1, 0.0, 1.0))]);
    state.select_message(0).unwrap();
    state.set_settings(state.settings().clone().with_quantization(Some(3)));
    state.refresh().unwrap();

    let colors: std::collections::HashSet<[u8; 3]> =
        state.raster().unwrap().pixels().iter().map(|p| p.to_u8()).collect();
    assert_eq!(colors.len(), 3);
}

// ============================================================================
// Message list
// ============================================================================

#[test]
fn test_message_labels() {
    let dir = temp_test_dir();
    let path = write_test_file(&dir, "two.grib2", &two_message_file());
    let mut state = new_state();
    state.open_file(&path).unwrap();

    let labels: Vec<String> = state.message_labels().into_iter().map(|l| l.text).collect();
    assert_eq!(
        labels,
        vec![
            "[1] TMP | heightAboveGround | 2 K",
            "[2] HGT | isobaricInhPa | 500 gpm",
        ]
    );
}

#[test]
fn test_sort_reorders_labels_only() {
    let fields = ["TMP", "HGT", "UGRD"]
        .iter()
        .map(|name| grib_common::Field::new(named_metadata(name, "x", 1, 1), vec![0.0]).unwrap())
        .collect();
    let mut state = memory_state(fields);

    let order = state.sort_messages(&[(SortKey::ShortName, SortOrder::Ascending)]).to_vec();
    assert_eq!(order, vec![1, 0, 2]);

    let labels = state.message_labels();
    assert_eq!(labels[0].index, 1);
    assert!(labels[0].text.starts_with("[2] HGT"));

    // Selection still uses source indices
    state.select_message(2).unwrap();
    assert_eq!(state.field().unwrap().metadata().short_name.as_deref(), Some("UGRD"));
}

#[test]
fn test_missing_metadata_labels() {
    let field = grib_common::Field::new(
        grib_common::FieldMetadata {
            width: 1,
            height: 1,
            ..Default::default()
        },
        vec![1.0],
    )
    .unwrap();
    let state = memory_state(vec![field]);
    assert_eq!(state.message_labels()[0].text, "[1] - | - | - -");
}

// ============================================================================
// Colorbar ticks and export
// ============================================================================

#[test]
fn test_colorbar_ticks_follow_range_policy() {
    let mut state = memory_state(vec![field_from_values(2, 1, vec![-2.0, 8.0])]);
    assert!(state.colorbar_ticks(5).is_empty());

    state.select_message(0).unwrap();
    let labels: Vec<String> = state.default_colorbar_ticks().into_iter().map(|t| t.label).collect();
    assert_eq!(labels, vec!["-2.0", "0.5", "3.0", "5.5", "8.0"]);

    state.set_settings(state.settings().clone().with_range(RangePolicy::SymmetricAroundZero));
    let ticks = state.colorbar_ticks(3);
    assert_eq!(ticks.first().unwrap().label, "-8.0");
    assert_eq!(ticks.last().unwrap().label, "8.0");
    assert_eq!(ticks.last().unwrap().x, 499);
}

#[test]
fn test_export_png() {
    let dir = temp_test_dir();
    let out = dir.path().join("field.png");
    let mut state = memory_state(vec![field_from_values(3, 3, create_ramp_grid(3, 3, 0.0, 9.0))]);

    assert!(matches!(state.export_png(&out), Err(ViewerError::NoField)));

    state.select_message(0).unwrap();
    state.refresh().unwrap();
    state.export_png(&out).unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(&bytes[1..4], b"PNG");
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_config_with_custom_gradients() {
    init_test_logging();
    let dir = temp_test_dir();
    let gradients = write_test_file(
        &dir,
        "gradients.json",
        br##"{ "gradients": { "heat": { "stops": [
            { "position": 0.0, "color": "#000000" },
            { "position": 1.0, "color": "#FFFF00" }
        ] } } }"##,
    );
    let config_json = format!(
        r#"{{ "default_gradient": "heat", "colorbar_width": 64, "colorbar_height": 4, "gradient_config": {:?} }}"#,
        gradients.display().to_string()
    );
    let config_path = write_test_file(&dir, "viewer.json", config_json.as_bytes());

    let config = ViewerConfig::from_file(&config_path).unwrap();
    let mut state = ViewState::new(config).unwrap();
    assert_eq!(state.settings().gradient.name(), "heat");
    assert!(state.gradients().get("viridis").is_some());

    state.refresh().unwrap();
    let bar = state.colorbar().unwrap();
    assert_eq!((bar.width(), bar.height()), (64, 4));
    assert_eq!(bar.pixel(63, 0).unwrap().to_u8(), [255, 255, 0]);
}

#[test]
fn test_missing_gradient_config() {
    let config = ViewerConfig {
        gradient_config: Some("/nonexistent/gradients.json".into()),
        ..ViewerConfig::default()
    };
    assert!(matches!(ViewState::new(config), Err(ViewerError::Gradient(_))));
}
