use image::{GrayImage, ImageFormat, Luma};
use sketchplot_camtools::{
    normalize, skeletonize, BinaryRaster, PaddedRaster, PathSet, SketchOutcome, SketchPipeline,
    TracedPath,
};
use sketchplot_core::{Point2, TracerError};
use sketchplot_settings::PipelineConfig;

/// One path per foreground row, from its leftmost to its rightmost pixel,
/// in the same Y-up frame the potrace adapter produces
fn row_tracer(raster: &PaddedRaster) -> Result<PathSet, TracerError> {
    let binary = raster.raster();
    let height = binary.height() as f64;

    let mut paths = Vec::new();
    for y in 0..binary.height() {
        let xs: Vec<u32> = (0..binary.width())
            .filter(|&x| binary.is_foreground(x, y))
            .collect();
        if let (Some(&first), Some(&last)) = (xs.first(), xs.last()) {
            let row = height - y as f64;
            paths.extend(TracedPath::from_points(vec![
                Point2::new(first as f64, row),
                Point2::new(last as f64, row),
            ]));
        }
    }
    Ok(paths.into())
}

fn horizontal_line() -> BinaryRaster {
    BinaryRaster::from_fn(512, 512, |x, y| y == 256 && (56..456).contains(&x))
}

#[test]
fn test_horizontal_line_scenario() {
    let line = horizontal_line();
    let png = line.encode_line_art(ImageFormat::Png).unwrap();
    let config = PipelineConfig::default();

    // skeleton of a one-pixel line is the line itself
    let binary = normalize(&png, &config.raster).unwrap();
    assert_eq!(binary, line);
    let skeleton = skeletonize(binary, config.raster.structuring_element, None).unwrap();
    assert_eq!(skeleton.skeleton, line);

    let pipeline = SketchPipeline::new(config, row_tracer);
    let padded = pipeline.preprocess(&png).unwrap();
    assert_eq!(padded.dimensions(), (612, 612));
    assert!(padded.raster().is_foreground(106, 306));
    assert!(padded.raster().is_foreground(505, 306));

    let result = match pipeline.run(&png).unwrap() {
        SketchOutcome::Drawn(result) => result,
        other => panic!("expected a drawing, got {:?}", other),
    };
    assert_eq!(result.path_count, 1);
    assert!((result.transform.scale * 399.0 - 80.0).abs() < 1e-9);

    let gcode = result.program.to_gcode();
    let lines: Vec<&str> = gcode.lines().collect();
    assert_eq!(&lines[..4], ["G21", "G90", "M3 S1000", "G1 F3000"]);
    assert_eq!(&lines[4..7], ["M5", "G0 X0.00 Y0.00", "M3"]);
    assert_eq!(lines[7], "G1 X8.00 Y8.00");
    // scaled width is exactly the target width
    assert_eq!(lines[16], "G1 X80.00 Y80.00");
    assert_eq!(&lines[17..], ["M5", "G0 X0 Y0"]);

    assert_eq!(lines.iter().filter(|l| **l == "M3").count(), 1);
    assert_eq!(lines.iter().filter(|l| l.starts_with("G1 X")).count(), 10);
}

#[test]
fn test_blank_image_has_no_drawable_content() {
    let blank = GrayImage::from_pixel(300, 300, Luma([255]));
    let mut png = std::io::Cursor::new(Vec::new());
    image::DynamicImage::ImageLuma8(blank)
        .write_to(&mut png, ImageFormat::Png)
        .unwrap();

    let pipeline = SketchPipeline::new(PipelineConfig::default(), row_tracer);
    match pipeline.run(png.get_ref()).unwrap() {
        SketchOutcome::NoDrawableContent { preview_bmp } => {
            let preview = image::load_from_memory(&preview_bmp).unwrap().to_luma8();
            assert_eq!(preview.dimensions(), (612, 612));
            assert!(preview.pixels().all(|p| p.0[0] == 255));
        }
        other => panic!("expected no drawable content, got {:?}", other),
    }
}

#[test]
fn test_thick_strokes_are_thinned_before_tracing() {
    let thick = BinaryRaster::from_fn(512, 512, |x, y| (250..262).contains(&y) && (56..456).contains(&x));
    let png = thick.encode_line_art(ImageFormat::Png).unwrap();

    let pipeline = SketchPipeline::new(PipelineConfig::default(), row_tracer);
    let padded = pipeline.preprocess(&png).unwrap();

    let skeleton_pixels = padded.raster().foreground_count();
    assert!(skeleton_pixels > 0);
    assert!(skeleton_pixels < thick.foreground_count() / 2);
}
