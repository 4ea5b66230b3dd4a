//! End-to-end drawing through a recording sink

use std::f32::consts::PI;

use quill_canvas::{Canvas, CanvasConfig, CanvasError, Color, ImageFlags, LineCap, Vertex, Winding};
use quill_path::Command;
use quill_recorder::{DrawCommand, RecordedFrame, RecordingSink};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("quill=debug")
        .with_test_writer()
        .try_init();
}

fn canvas() -> Canvas<RecordingSink> {
    init_tracing();
    let mut canvas = Canvas::new(RecordingSink::new());
    canvas.begin_frame(400.0, 400.0, 1.0);
    canvas
}

fn finish(mut canvas: Canvas<RecordingSink>) -> RecordedFrame {
    canvas.end_frame();
    let mut sink = canvas.into_sink();
    sink.take_frames().pop().unwrap()
}

fn signed_area(rows: &[[f32; 4]]) -> f32 {
    let n = rows.len();
    (0..n)
        .map(|i| {
            let a = rows[i];
            let b = rows[(i + 1) % n];
            a[0] * b[1] - b[0] * a[1]
        })
        .sum::<f32>()
        * 0.5
}

fn round_cap_stroke(width: f32) -> usize {
    let mut canvas = canvas();
    canvas.stroke_width(width);
    canvas.line_cap(LineCap::Round);
    canvas.begin_path();
    canvas.move_to(0.0, 0.0);
    canvas.line_to(100.0, 0.0);
    canvas.stroke();
    let frame = finish(canvas);
    frame.calls[0].paths()[0].stroke.len()
}

#[test]
fn test_rect_fill_is_single_convex_subpath() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 10.0, 10.0);
    canvas.fill();

    assert_eq!(canvas.path_cache().points().len(), 4);
    let stats = canvas.frame_stats();
    assert_eq!(stats.draw_calls, 2);

    let frame = finish(canvas);
    assert_eq!(frame.calls.len(), 1);
    let DrawCommand::Fill { bounds, paths, .. } = &frame.calls[0] else {
        panic!("expected a fill");
    };
    assert_eq!(paths.len(), 1);
    assert!(paths[0].convex);
    assert!(paths[0].closed);
    assert!(!paths[0].hole);
    assert_eq!(paths[0].fill.len(), 4);
    assert!(!paths[0].stroke.is_empty());
    assert_eq!(bounds.to_array(), [0.0, 0.0, 10.0, 10.0]);
}

#[test]
fn test_nested_rect_hole_has_opposite_winding() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 100.0, 100.0);
    canvas.rect(25.0, 25.0, 50.0, 50.0);
    canvas.path_winding(Winding::HOLE);
    canvas.fill();

    let frame = finish(canvas);
    let DrawCommand::Fill { bounds, paths, .. } = &frame.calls[0] else {
        panic!("expected a fill");
    };
    assert_eq!(paths.len(), 2);
    assert!(!paths[0].hole);
    assert!(paths[1].hole);

    let outer = signed_area(&paths[0].fill);
    let inner = signed_area(&paths[1].fill);
    assert!(outer * inner < 0.0);
    assert_eq!(bounds.to_array(), [0.0, 0.0, 100.0, 100.0]);
}

#[test]
fn test_hole_paths_require_stencil_fill() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 100.0, 100.0);
    canvas.rect(25.0, 25.0, 50.0, 50.0);
    canvas.path_winding(Winding::HOLE);
    canvas.fill();

    canvas.begin_path();
    canvas.rect(200.0, 200.0, 10.0, 10.0);
    canvas.path_winding(Winding::HOLE);
    canvas.fill();

    let frame = finish(canvas);
    let nested = frame.calls[0].paths();
    assert_eq!(nested.len(), 2);
    assert!(nested.iter().all(|p| !p.convex));

    let single = frame.calls[1].paths();
    assert_eq!(single.len(), 1);
    assert!(single[0].hole);
    assert!(!single[0].convex);
    // Stencilled fringes start at zero coverage
    assert_eq!(single[0].stroke[0][2], 0.0);
}

#[test]
fn test_round_cap_vertices_per_end() {
    // Half width 1 at tolerance 0.25 gives three cap divisions
    let ncap = 3;
    let verts = round_cap_stroke(2.0);
    assert_eq!(verts, 2 * (ncap * 2 + 2));
}

#[test]
fn test_round_cap_divisions_grow_with_width() {
    let counts: Vec<usize> = [2.0, 6.0, 20.0, 60.0]
        .iter()
        .map(|&w| round_cap_stroke(w))
        .collect();
    for pair in counts.windows(2) {
        assert!(pair[0] <= pair[1], "{counts:?}");
    }
    assert!(counts[3] > counts[0]);
    // Both caps, nothing in between: 2 * (2 * ncap + 2)
    for count in counts {
        assert_eq!(count % 4, 0);
    }
}

#[test]
fn test_star_is_not_convex() {
    let mut canvas = canvas();
    canvas.begin_path();
    for i in 0..10 {
        let r = if i % 2 == 0 { 50.0 } else { 20.0 };
        let a = i as f32 * PI / 5.0;
        let (x, y) = (100.0 + a.cos() * r, 100.0 + a.sin() * r);
        if i == 0 {
            canvas.move_to(x, y);
        } else {
            canvas.line_to(x, y);
        }
    }
    canvas.close_path();
    canvas.fill();
    assert_eq!(canvas.path_cache().points().len(), 10);

    let frame = finish(canvas);
    let paths = frame.calls[0].paths();
    assert_eq!(paths.len(), 1);
    assert!(!paths[0].convex);
    assert!(paths[0].closed);
}

#[test]
fn test_circle_stays_within_tolerance() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.circle(200.0, 200.0, 80.0);
    canvas.fill();

    let tess = canvas.tolerances().tess;
    let points = canvas.path_cache().points();
    assert!(points.len() > 8);
    for p in points {
        let d = ((p.x - 200.0).powi(2) + (p.y - 200.0).powi(2)).sqrt();
        assert!((d - 80.0).abs() <= tess, "point at distance {d}");
    }
}

#[test]
fn test_collinear_arc_to_is_a_line() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.move_to(0.0, 0.0);
    canvas.arc_to(50.0, 0.0, 100.0, 0.0, 10.0);
    let commands = canvas.commands().commands();
    assert_eq!(commands.len(), 2);
    assert!(matches!(commands[1], Command::LineTo(p) if p.x == 50.0 && p.y == 0.0));
}

#[test]
fn test_stroke_after_fill_shares_flattened_points() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.rounded_rect(20.0, 20.0, 100.0, 60.0, 12.0);
    canvas.fill();
    let flattened = canvas.path_cache().points().len();
    canvas.stroke();
    assert_eq!(canvas.path_cache().points().len(), flattened);

    let frame = finish(canvas);
    assert_eq!(frame.fills().count(), 1);
    assert_eq!(frame.strokes().count(), 1);
    // Stroke expansion drops the fill fans
    assert!(frame.calls[1].paths()[0].fill.is_empty());
}

#[test]
fn test_stats_match_recorded_geometry() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.ellipse(100.0, 100.0, 60.0, 30.0);
    canvas.fill();
    canvas.stroke();
    canvas.fill_triangles(&[Vertex::new(0.0, 0.0, 0.5, 0.5); 6]);
    let stats = canvas.frame_stats();

    let frame = finish(canvas);
    let strip = |n: usize| n.saturating_sub(2);
    let fill_tris: usize = frame.calls[0]
        .paths()
        .iter()
        .map(|p| strip(p.fill.len()) + strip(p.stroke.len()))
        .sum();
    let stroke_tris: usize = frame.calls[1]
        .paths()
        .iter()
        .map(|p| strip(p.stroke.len()))
        .sum();

    assert_eq!(stats.fill_triangles, fill_tris);
    assert_eq!(stats.stroke_triangles, stroke_tris);
    assert_eq!(stats.text_triangles, 2);
    assert_eq!(stats.draw_calls, 2 + 1 + 1);
    assert_eq!(frame.calls[2].vertex_count(), 6);
}

#[test]
fn test_cancel_discards_frame() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 5.0, 5.0);
    canvas.fill();
    canvas.cancel_frame();

    canvas.begin_frame(400.0, 400.0, 2.0);
    canvas.end_frame();

    let sink = canvas.sink();
    assert_eq!(sink.cancelled_frames(), 1);
    assert_eq!(sink.frames().len(), 1);
    let frame = &sink.frames()[0];
    assert!(frame.calls.is_empty());
    assert_eq!(frame.viewport.unwrap().device_pixel_ratio, 2.0);
}

#[test]
fn test_pixel_ratio_scales_fringe() {
    let mut canvas = canvas();
    canvas.begin_frame(400.0, 400.0, 2.0);
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 10.0, 10.0);
    canvas.fill();

    let frame = finish(canvas);
    let DrawCommand::Fill { fringe, .. } = &frame.calls[0] else {
        panic!("expected a fill");
    };
    assert!((fringe - 0.5).abs() < 1e-6);
}

#[test]
fn test_disabled_antialias_has_no_fringe() {
    init_tracing();
    let config = CanvasConfig::from_toml_str("antialias = false").unwrap();
    let mut canvas = Canvas::with_config(RecordingSink::new(), config);
    canvas.begin_frame(100.0, 100.0, 1.0);
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 10.0, 10.0);
    canvas.fill();

    let frame = finish(canvas);
    let path = &frame.calls[0].paths()[0];
    assert_eq!(path.fill, vec![
        [0.0, 0.0, 0.5, 1.0],
        [0.0, 10.0, 0.5, 1.0],
        [10.0, 10.0, 0.5, 1.0],
        [10.0, 0.0, 0.5, 1.0],
    ]);
    assert!(path.stroke.is_empty());
}

#[test]
fn test_fill_paint_and_alpha_are_recorded() {
    let mut canvas = canvas();
    canvas.fill_color(Color::rgba(1.0, 0.0, 0.0, 0.8));
    canvas.global_alpha(0.5);
    canvas.begin_path();
    canvas.circle(50.0, 50.0, 10.0);
    canvas.fill();

    let frame = finish(canvas);
    let paint = frame.calls[0].paint();
    assert!((paint.inner_color.r - 1.0).abs() < 1e-6);
    assert!((paint.inner_color.a - 0.4).abs() < 1e-6);
}

#[test]
fn test_images_round_trip_through_canvas() {
    let mut canvas = canvas();
    let id = canvas
        .create_image_rgba(2, 2, ImageFlags::REPEAT_X, &[255; 16])
        .unwrap();
    assert_eq!(canvas.image_size(id).unwrap(), (2, 2));

    canvas.update_image(id, &[7; 16]).unwrap();
    assert_eq!(canvas.sink().texture(id).unwrap().data, vec![7; 16]);

    let err = canvas.update_image(id, &[0; 3]).unwrap_err();
    assert!(matches!(err, CanvasError::ImageDataSize { expected: 16, actual: 3 }));

    canvas.delete_image(id).unwrap();
    assert!(matches!(
        canvas.delete_image(id),
        Err(CanvasError::UnknownImage(_))
    ));
}

#[test]
fn test_frame_exports_json() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.rect(10.0, 10.0, 20.0, 20.0);
    canvas.fill();
    canvas.stroke();

    let frame = finish(canvas);
    let json = frame.to_json().unwrap();
    assert!(json.contains("\"kind\": \"fill\""));
    assert!(json.contains("\"kind\": \"stroke\""));

    let parsed = RecordedFrame::from_json(&json).unwrap();
    assert_eq!(parsed.calls.len(), 2);
    assert_eq!(parsed.vertex_count(), frame.vertex_count());
}

#[test]
fn test_into_sink_keeps_recording() {
    let mut canvas = canvas();
    canvas.begin_path();
    canvas.rect(0.0, 0.0, 1.0, 1.0);
    canvas.fill();
    canvas.end_frame();

    let sink = canvas.into_sink();
    assert!(!sink.is_deleted());
    assert_eq!(sink.frames().len(), 1);
}
