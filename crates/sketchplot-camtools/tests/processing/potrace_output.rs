use sketchplot_camtools::{
    pad, parse_svg, BinaryRaster, FileFormatError, PotraceTracer, ScaleTransform, Tracer,
};
use sketchplot_core::TracerError;
use sketchplot_settings::TracerSettings;

// Shape of a real potrace 1.16 document for a 612x612 bitmap: a stroke
// outline with relative curves and an inner hole.
const TRACED_LOOP: &str = r##"<?xml version="1.0" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 20010904//EN"
 "http://www.w3.org/TR/2001/REC-SVG-20010904/DTD/svg10.dtd">
<svg version="1.0" xmlns="http://www.w3.org/2000/svg"
 width="612.000000pt" height="612.000000pt" viewBox="0 0 612.000000 612.000000"
 preserveAspectRatio="xMidYMid meet">
<metadata>
Created by potrace 1.16, written by Peter Selinger 2001-2019
</metadata>
<g transform="translate(0.000000,612.000000) scale(0.100000,-0.100000)"
fill="#000000" stroke="none">
<path d="M1060 3065 l0 -15 2000 0 2000 0 0 15 0 15 -2000 0 -2000 0 0 -15z"/>
<path d="M2500 4500 c-300 -50 -500 -300 -500 -600 0 -330 270 -600 600 -600
330 0 600 270 600 600 0 300 -200 550 -500 600 -70 12 -130 12 -200 0z m150
-300 c-90 0 -150 -60 -150 -150 0 -90 60 -150 150 -150 90 0 150 60 150 150 0
90 -60 150 -150 150z"/>
</g>
</svg>
"##;

#[test]
fn test_potrace_document_parses_into_subpaths() {
    let paths = parse_svg(TRACED_LOOP, 0.05).unwrap();

    // bar outline, blob outline, and the blob's hole
    assert_eq!(paths.len(), 3);
    assert!(paths.iter().all(|p| p.is_closed()));

    let bar = &paths.as_slice()[0];
    // 400 x 3 pixel outline
    assert!((bar.length() - 806.0).abs() < 1e-2);
    // pixel (106, 306.5) with the Y axis flipped
    assert!((bar.start().x - 106.0).abs() < 1e-3);
    assert!((bar.start().y - 306.5).abs() < 1e-3);
}

#[test]
fn test_parsed_paths_stay_inside_the_raster() {
    let paths = parse_svg(TRACED_LOOP, 0.05).unwrap();
    for path in &paths {
        for point in path.sample(50) {
            assert!((0.0..=612.0).contains(&point.x), "{}", point);
            assert!((0.0..=612.0).contains(&point.y), "{}", point);
        }
    }

    let transform = ScaleTransform::from_paths(&paths, 11, 80.0).unwrap();
    assert!(transform.scale > 0.0);
}

#[test]
fn test_malformed_path_data() {
    let svg = r#"<svg viewBox="0 0 10 10"><path d="M0 0 L 1"/></svg>"#;
    assert!(matches!(
        parse_svg(svg, 0.1),
        Err(FileFormatError::SvgParseError(_))
    ));
}

#[test]
fn test_parse_errors_become_tracer_errors() {
    let err: TracerError = parse_svg("not svg at all", 0.1).unwrap_err().into();
    assert!(matches!(err, TracerError::ParseFailed { .. }));
}

#[test]
fn test_unconfigured_binary_reports_tool_missing() {
    let settings = TracerSettings {
        binary: Some("/definitely/not/installed/potrace".into()),
        ..TracerSettings::default()
    };
    let tracer = PotraceTracer::from_settings(&settings, 0.05);
    let padded = pad(BinaryRaster::new(16, 16), 4);

    let err = tracer.trace(&padded).unwrap_err();
    assert!(matches!(err, TracerError::ToolMissing { .. }));
    assert!(err.to_string().contains("/definitely/not/installed/potrace"));
}
