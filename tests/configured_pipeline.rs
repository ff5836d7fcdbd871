use sketchplot::{
    BinaryRaster, MeasurementSystem, PaddedRaster, PathSet, PipelineConfig, Point2,
    SketchOutcome, SketchPipeline, Stage, TracedPath, TracerError,
};

fn diagonal_tracer(raster: &PaddedRaster) -> Result<PathSet, TracerError> {
    let (width, height) = raster.dimensions();
    let path = TracedPath::from_points(vec![
        Point2::new(0.0, 0.0),
        Point2::new(width as f64, height as f64),
    ]);
    Ok(path.into_iter().collect())
}

fn stroke_png() -> Vec<u8> {
    BinaryRaster::from_fn(128, 128, |x, y| x == y)
        .encode_line_art(image::ImageFormat::Png)
        .unwrap()
}

#[test]
fn test_config_file_drives_the_pipeline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plotter.toml");

    let mut config = PipelineConfig::default();
    config.raster.canonical_size = 128;
    config.raster.border_pad = 10;
    config.geometry.target_width = 40.0;
    config.program.units = MeasurementSystem::Imperial;
    config.program.feed_rate = 1500;
    config.save_to_file(&path).unwrap();

    let loaded = PipelineConfig::load_from_file(&path).unwrap();
    assert_eq!(loaded, config);

    let pipeline = SketchPipeline::new(loaded, diagonal_tracer);
    let outcome = pipeline.run(&stroke_png()).unwrap();
    let SketchOutcome::Drawn(result) = outcome else {
        panic!("expected a drawing");
    };

    let gcode = result.program.to_gcode();
    let lines: Vec<&str> = gcode.lines().collect();
    assert_eq!(lines[0], "G20");
    assert_eq!(lines[3], "G1 F1500");
    // (40, 40) after scaling -> a = 80, b = 0
    assert_eq!(lines[16], "G1 X80.00 Y0.00");
}

#[test]
fn test_stage_is_named_in_failures() {
    let pipeline = SketchPipeline::new(PipelineConfig::default(), diagonal_tracer);
    let err = pipeline.run(&[0u8; 16]).unwrap_err();
    assert_eq!(err.stage, Stage::Decode);
    assert!(err.source.is_decode());
}
