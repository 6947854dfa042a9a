//! Integration tests for the SketchBuilder API
//!
//! These tests drive the public API end to end, from element creation to the
//! saved document.

use std::fs;

use float_cmp::assert_approx_eq;
use serde_json::Value;

use exsketch::{
    DEFAULT_PADDING, SketchBuilder, SketchError,
    config::SketchConfig,
    element::{LineVariant, Primitive, ShapeKind},
    geometry::{Point, Size},
    style::{STROKE_COLOR, Style, StyleError},
};

fn seeded(seed: u64) -> SketchBuilder {
    SketchBuilder::new(SketchConfig::default().with_seed(seed)).expect("Failed to create builder")
}

fn parse(json: &str) -> Value {
    serde_json::from_str(json).expect("Export should be valid JSON")
}

#[test]
fn test_builder_api_exists() {
    let builder = SketchBuilder::default();
    assert!(builder.is_empty());
}

#[test]
fn test_two_rectangles_bound_by_arrow() {
    let mut builder = seeded(1);
    let first = builder
        .rectangle(Point::new(100.0, 100.0), Size::new(50.0, 50.0), &Style::new())
        .unwrap();
    let second = builder
        .rectangle(Point::new(300.0, 100.0), Size::new(50.0, 50.0), &Style::new())
        .unwrap();
    builder
        .create_binding_arrows(&first, &second, LineVariant::Arrow, DEFAULT_PADDING, &Style::new())
        .unwrap();

    let document = parse(&builder.to_json().unwrap());
    let arrow = &document["elements"][2];

    assert_eq!(arrow["type"], "arrow");
    assert_approx_eq!(f64, arrow["x"].as_f64().unwrap(), 135.0, epsilon = 1e-3);
    assert_approx_eq!(f64, arrow["y"].as_f64().unwrap(), 100.0, epsilon = 1e-3);
    let end_x = arrow["x"].as_f64().unwrap() + arrow["points"][1][0].as_f64().unwrap();
    assert_approx_eq!(f64, end_x, 265.0, epsilon = 1e-3);
    assert_eq!(arrow["startArrowhead"], Value::Null);
    assert_eq!(arrow["endArrowhead"], "arrow");
    assert_eq!(arrow["startBinding"]["elementId"], first.as_str());
    assert_eq!(arrow["endBinding"]["elementId"], second.as_str());
    assert_eq!(arrow["endBinding"]["gap"], 10.0);
}

#[test]
fn test_binding_endpoints_touch_padded_outlines() {
    let mut builder = seeded(2);
    let shapes = [
        builder
            .rectangle(Point::new(0.0, 0.0), Size::new(120.0, 60.0), &Style::new())
            .unwrap(),
        builder
            .diamond(Point::new(260.0, 180.0), Size::new(80.0, 80.0), &Style::new())
            .unwrap(),
        builder
            .ellipse(Point::new(-200.0, 240.0), Size::new(100.0, 40.0), &Style::new())
            .unwrap(),
    ];

    for (start, end) in [(0, 1), (1, 2), (2, 0)] {
        let id = builder
            .create_binding_arrows(&shapes[start], &shapes[end], LineVariant::Arrow, 5.0, &Style::new())
            .unwrap();
        let line = builder.get(&id).unwrap().as_line().unwrap();
        let start_element = builder.get(&shapes[start]).unwrap();
        let end_element = builder.get(&shapes[end]).unwrap();

        let direction = end_element.center().sub_point(start_element.center()).angle();
        let expected_start = start_element.edge_midpoint(direction, 5.0);
        assert_approx_eq!(f32, line.start().x(), expected_start.x(), epsilon = 1e-3);
        assert_approx_eq!(f32, line.start().y(), expected_start.y(), epsilon = 1e-3);

        // Both endpoints lie on the line between the two centers
        let start_dir = line.start().sub_point(start_element.center()).angle();
        let end_dir = line.end().sub_point(end_element.center()).angle();
        assert_approx_eq!(f32, start_dir, direction, epsilon = 1e-3);
        assert_approx_eq!(
            f32,
            exsketch::geometry::normalize_angle(end_dir - direction - std::f32::consts::PI),
            0.0,
            epsilon = 1e-3
        );
    }
}

#[test]
fn test_text_box_scenario() {
    let mut builder = seeded(3);
    let rect = builder
        .create_text_box("Hello", Point::new(0.0, 0.0), &Style::new(), &Style::new())
        .unwrap();

    let document = parse(&builder.to_json().unwrap());
    let elements = document["elements"].as_array().unwrap();
    assert_eq!(elements.len(), 2);

    let text = &elements[0];
    let rectangle = &elements[1];
    assert_eq!(text["type"], "text");
    assert_eq!(text["text"], "Hello");
    assert_eq!(rectangle["type"], "rectangle");
    assert_eq!(rectangle["id"], rect.as_str());
    assert_eq!(text["groupIds"], rectangle["groupIds"]);
    assert_eq!(text["groupIds"].as_array().unwrap().len(), 1);
    assert!(rectangle["width"].as_f64() > text["width"].as_f64());
    assert!(rectangle["height"].as_f64() > text["height"].as_f64());
}

#[test]
fn test_bounding_element_scenario() {
    let mut builder = seeded(4);
    let target = builder
        .rectangle(Point::new(10.0, 10.0), Size::new(64.0, 32.0), &Style::new())
        .unwrap();
    let bound = builder
        .create_bounding_element(&target, ShapeKind::Rectangle, 12.0, &Style::new())
        .unwrap();

    let outer = builder.get(&bound).unwrap();
    assert_eq!(outer.size(), Size::new(88.0, 56.0));
    assert_eq!(outer.center(), builder.get(&target).unwrap().center());

    let shared: Vec<_> = outer
        .group_ids()
        .iter()
        .filter(|g| builder.get(&target).unwrap().group_ids().contains(*g))
        .collect();
    assert_eq!(shared.len(), 1);
}

#[test]
fn test_export_is_idempotent() {
    let mut builder = seeded(5);
    let a = builder
        .ellipse(Point::new(0.0, 0.0), Size::new(40.0, 30.0), &Style::new())
        .unwrap();
    let b = builder.text("b", Point::new(200.0, 50.0), &Style::new()).unwrap();
    builder.arrow_between(&a, &b, &Style::new()).unwrap();

    let first = builder.to_json().unwrap();
    let second = builder.to_json().unwrap();

    assert_eq!(first, second);
    assert_eq!(parse(&first)["elements"].as_array().unwrap().len(), 3);
}

#[test]
fn test_same_seed_same_document() {
    let build = || {
        let mut builder = seeded(42);
        let a = builder
            .rectangle(Point::new(0.0, 0.0), Size::new(10.0, 10.0), &Style::new())
            .unwrap();
        let b = builder
            .diamond(Point::new(50.0, 50.0), Size::new(10.0, 10.0), &Style::new())
            .unwrap();
        builder.arrow_between(&a, &b, &Style::new()).unwrap();
        builder.to_json().unwrap()
    };

    assert_eq!(build(), build());
}

#[test]
fn test_element_fields_present() {
    let mut builder = seeded(6);
    builder
        .rectangle(Point::new(0.0, 0.0), Size::new(10.0, 10.0), &Style::new())
        .unwrap();

    let document = parse(&builder.to_json().unwrap());
    let element = document["elements"][0].as_object().unwrap();

    for key in [
        "id",
        "type",
        "x",
        "y",
        "width",
        "height",
        "strokeColor",
        "backgroundColor",
        "fillStyle",
        "strokeWidth",
        "roughness",
        "opacity",
        "groupIds",
        "seed",
        "versionNonce",
    ] {
        assert!(element.contains_key(key), "Missing key {key}");
    }
}

#[test]
fn test_unknown_default_fails_fast() {
    let config = SketchConfig::default().with_defaults(Style::new().with("shadow", true));
    let result = SketchBuilder::new(config);

    assert!(matches!(
        result,
        Err(SketchError::Configuration(StyleError::UnusedDefault { key })) if key == "shadow"
    ));
}

#[test]
fn test_invalid_override_value_is_rejected() {
    let mut builder = seeded(7);
    let result = builder.rectangle(
        Point::new(0.0, 0.0),
        Size::new(10.0, 10.0),
        &Style::new().with(STROKE_COLOR, "definitely not a color"),
    );

    assert!(matches!(
        result,
        Err(SketchError::Configuration(StyleError::InvalidValue { .. }))
    ));
    assert!(builder.is_empty());
}

#[test]
fn test_save_appends_extension() {
    let dir = tempfile::tempdir().unwrap();
    let mut builder = seeded(8);
    builder.text("saved", Point::new(0.0, 0.0), &Style::new()).unwrap();

    let path = builder.save(dir.path().join("diagram")).unwrap();

    assert_eq!(path, dir.path().join("diagram.excalidraw"));
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(written, builder.to_json().unwrap());
}

#[test]
fn test_save_keeps_existing_extension() {
    let dir = tempfile::tempdir().unwrap();
    let builder = seeded(9);

    let path = builder.save(dir.path().join("diagram.excalidraw")).unwrap();

    assert_eq!(path, dir.path().join("diagram.excalidraw"));
    assert!(path.exists());
}
