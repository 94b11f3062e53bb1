//! Unit tests for graphlens-export

use crate::*;
use graphlens_core::{
    Color, EdgeGlyph, GraphEdge, GraphNode, GraphSnapshot, LayoutConfig, NodeGlyph, Point,
    Renderer, Scene, ViewConfig,
};

fn small_scene() -> Scene {
    let mut scene = Scene::empty(120.0, 80.0);
    scene.edges.push(EdgeGlyph {
        id: "e".to_string(),
        from: Point::new(30.0, 40.0),
        to: Point::new(90.0, 40.0),
        color: Color::rgb(0xA5, 0xAB, 0xB6),
        width: 1.0,
        opacity: 1.0,
        label: None,
    });
    for (id, x) in [("a", 30.0), ("b", 90.0)] {
        scene.nodes.push(NodeGlyph {
            id: id.to_string(),
            center: Point::new(x, 40.0),
            radius: 15.0,
            fill: Color::rgb(0x33, 0xC6, 0xFF),
            border: Color::rgb(0xFF, 0xFF, 0xFF),
            border_width: 2.0,
            opacity: 1.0,
            label: Some(id.to_string()),
        });
    }
    scene
}

#[test]
fn test_scale_heuristic() {
    assert_eq!(optimal_export_settings(1200.0, 1000.0, ExportFormat::Png).scale, 1.0);
    assert_eq!(optimal_export_settings(250.0, 200.0, ExportFormat::Png).scale, 3.0);
    assert_eq!(optimal_export_settings(1000.0, 500.0, ExportFormat::Png).scale, 2.0);
}

#[test]
fn test_scale_heuristic_boundaries_pick_default() {
    assert_eq!(optimal_export_settings(1000.0, 1000.0, ExportFormat::Png).scale, 2.0);
    assert_eq!(optimal_export_settings(1000.0, 100.0, ExportFormat::Png).scale, 2.0);
}

#[test]
fn test_quality_only_for_jpeg() {
    assert_eq!(optimal_export_settings(10.0, 10.0, ExportFormat::Png).quality, None);
    assert_eq!(optimal_export_settings(10.0, 10.0, ExportFormat::Pdf).quality, None);
    assert_eq!(
        optimal_export_settings(10.0, 10.0, ExportFormat::Jpeg).quality,
        Some(0.9)
    );
}

#[test]
fn test_pdf_fit_for_4_by_3_capture() {
    let p = fit_to_page(1600, 1200);
    assert!(p.height_mm <= 190.0 + 1e-9);
    assert!(p.width_mm <= 277.0 + 1e-9);
    assert!((p.height_mm / p.width_mm - 0.75).abs() < 1e-9);
    assert_eq!(p.orientation, Orientation::Landscape);
    assert!((p.height_mm - 190.0).abs() < 1e-9);
    assert!((p.width_mm - 253.333_333).abs() < 1e-5);
    assert!((p.x_mm - 21.833_333).abs() < 1e-5);
    assert!((p.y_mm - 10.0).abs() < 1e-9);
}

#[test]
fn test_default_options() {
    let options = ExportOptions::default();
    assert!(options.filename.starts_with("graph-export-"));
    assert_eq!(options.quality, 0.9);
    assert_eq!(options.scale, 2.0);
    assert_eq!(options.background.to_hex(), "#0f0f23");
}

#[test]
fn test_png_export_written_to_directory() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path().join("exports"));
    let options = ExportOptions::new(ExportFormat::Png).with_filename("graph");

    let report = export_element(&small_scene(), &options, &mut sink).unwrap();

    assert_eq!(report.path, dir.path().join("exports").join("graph.png"));
    assert_eq!((report.width_px, report.height_px), (240, 160));
    assert!(report.warnings.is_empty());

    let bytes = std::fs::read(&report.path).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (240, 160));
    // background corner and the middle of node "a"
    assert_eq!(decoded.get_pixel(0, 0).0, [0x0f, 0x0f, 0x23, 0xff]);
    assert_eq!(decoded.get_pixel(60, 80).0, [0x33, 0xC6, 0xFF, 0xff]);
}

#[test]
fn test_jpeg_uses_jpg_extension() {
    let mut sink = MemorySink::new();
    let options = ExportOptions::new(ExportFormat::Jpeg)
        .with_filename("shot")
        .with_quality(0.5);
    let report = export_element(&small_scene(), &options, &mut sink).unwrap();

    assert_eq!(report.path.to_str(), Some("shot.jpg"));
    let bytes = sink.get("shot.jpg").unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
}

#[test]
fn test_svg_falls_back_to_png_with_warning() {
    let mut sink = MemorySink::new();
    let options = ExportOptions::new(ExportFormat::Svg).with_filename("vector");
    let report = export_element(&small_scene(), &options, &mut sink).unwrap();

    assert_eq!(report.requested, ExportFormat::Svg);
    assert_eq!(report.format, ExportFormat::Png);
    assert_eq!(report.warnings, vec![ExportWarning::SvgFallbackToPng]);
    assert!(sink.get("vector.png").unwrap().starts_with(b"\x89PNG"));
}

#[test]
fn test_pdf_export() {
    let mut sink = MemorySink::new();
    let options = ExportOptions::new(ExportFormat::Pdf).with_filename("report");
    export_element(&small_scene(), &options, &mut sink).unwrap();

    let bytes = sink.get("report.pdf").unwrap();
    assert!(bytes.starts_with(b"%PDF-1.5"));
    let doc = lopdf::Document::load_mem(bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn test_rasterize_failure_names_format_and_cause() {
    let mut sink = MemorySink::new();
    let huge = Scene::empty(20_000.0, 10.0);
    let options = ExportOptions::new(ExportFormat::Jpeg).with_scale(1.0);

    let err = export_element(&huge, &options, &mut sink).unwrap_err();
    assert_eq!(err.stage(), Some(ExportStage::Rasterize));
    assert!(err.to_string().starts_with("Failed to export as JPEG: "));
    assert!(err.to_string().contains("8192"));
    assert!(std::error::Error::source(&err).is_some());
    assert!(sink.files.is_empty());
}

#[test]
fn test_delivery_failure_propagates() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();
    let mut sink = DirectorySink::new(&blocker);

    let err = export_element(&small_scene(), &ExportOptions::default(), &mut sink).unwrap_err();
    assert_eq!(err.stage(), Some(ExportStage::Deliver));
    assert!(err.to_string().starts_with("Failed to export as PNG: "));
}

#[test]
fn test_invalid_options_rejected_before_capture() {
    let mut sink = MemorySink::new();
    let options = ExportOptions::new(ExportFormat::Jpeg).with_quality(1.5);
    let err = export_element(&small_scene(), &options, &mut sink).unwrap_err();
    assert!(matches!(err, ExportError::InvalidOptions { .. }));

    let options = ExportOptions::default().with_scale(0.0);
    assert!(export_element(&small_scene(), &options, &mut sink).is_err());
}

#[test]
fn test_full_png_ignores_zoom() {
    let mut renderer = Renderer::new(ViewConfig::default(), LayoutConfig::default().with_seed(5));
    renderer
        .load_graph(GraphSnapshot::new(
            vec![
                GraphNode::new("a", "alpha", "Function"),
                GraphNode::new("b", "beta", "Class"),
            ],
            vec![GraphEdge::new("ab", "CALLS", "a", "b")],
        ))
        .unwrap();
    renderer.viewport_mut().zoom_by(0.1, Point::ORIGIN);
    let bounds = renderer.bounds().unwrap();

    let mut sink = MemorySink::new();
    let report = export_full_png(&renderer, &mut sink).unwrap();

    assert_eq!(report.path.to_str(), Some("codegraph.png"));
    assert_eq!(report.width_px, (bounds.width() * 2.0).ceil() as u32);
    assert_eq!(report.height_px, (bounds.height() * 2.0).ceil() as u32);
}

#[test]
fn test_format_parsing() {
    assert_eq!("JPG".parse::<ExportFormat>(), Ok(ExportFormat::Jpeg));
    assert_eq!("pdf".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
    assert!("gif".parse::<ExportFormat>().is_err());
}
