use sketchplot_camtools::{
    from_corexy, to_corexy, Instruction, PathSet, ProgramEmitter, ScaleTransform, TracedPath,
};
use sketchplot_core::{MotorPosition, Point2};
use sketchplot_settings::{GeometrySettings, MeasurementSystem, ProgramSettings};

fn path(points: &[(f64, f64)]) -> TracedPath {
    TracedPath::from_points(points.iter().map(|&(x, y)| Point2::new(x, y)).collect()).unwrap()
}

fn mixed_paths() -> PathSet {
    PathSet::new(vec![
        path(&[(60.0, 60.0), (61.0, 60.5)]),
        path(&[(100.0, 100.0), (300.0, 180.0), (420.0, 90.0)]),
        path(&[(200.0, 400.0)]),
        path(&[(80.0, 500.0), (80.0, 502.0)]),
        path(&[(500.0, 120.0), (540.0, 160.0), (500.0, 200.0), (500.0, 120.0)]),
    ])
}

#[test]
fn test_each_drawn_path_contributes_one_block() {
    let paths = mixed_paths();
    let geometry = GeometrySettings::default();
    let transform = ScaleTransform::from_paths(&paths, geometry.bbox_samples, geometry.target_width)
        .unwrap();
    let program = ProgramEmitter::new(ProgramSettings::default(), &geometry).emit(&paths, &transform);

    let long_enough = paths.iter().filter(|p| p.length() >= 2.0).count();
    assert_eq!(long_enough, 3);
    assert_eq!(program.drawn_paths(), 3);
    assert_eq!(program.skipped_paths(), 2);

    let instructions = program.instructions();
    let pen_downs: Vec<usize> = instructions
        .iter()
        .enumerate()
        .filter(|(_, i)| i.is_pen_down())
        .map(|(n, _)| n)
        .collect();
    assert_eq!(pen_downs.len(), 3);

    for &n in &pen_downs {
        assert_eq!(instructions[n - 2], Instruction::PenUp);
        assert!(matches!(instructions[n - 1], Instruction::Rapid(_)));
        assert!(instructions[n + 1..=n + 10].iter().all(Instruction::is_linear));
        assert!(!instructions[n + 11].is_linear());
    }
    assert_eq!(program.instruction_count(), 4 + 3 * 13 + 2);
}

#[test]
fn test_motor_coordinates_decode_to_scaled_drawing() {
    let paths = mixed_paths();
    let transform = ScaleTransform::from_paths(&paths, 11, 80.0).unwrap();
    let program = ProgramEmitter::new(ProgramSettings::default(), &GeometrySettings::default())
        .emit(&paths, &transform);

    let mut max_x = f64::NEG_INFINITY;
    for instruction in program.instructions() {
        if let Instruction::Rapid(pos) | Instruction::Linear(pos) = instruction {
            let cartesian = from_corexy(*pos);
            assert!(cartesian.x >= -1e-9 && cartesian.y >= -1e-9);
            max_x = max_x.max(cartesian.x);
        }
    }
    assert!(max_x <= 80.0 + 1e-9);
}

#[test]
fn test_corexy_round_trip_through_scale() {
    let transform = ScaleTransform {
        min_x: 12.0,
        min_y: -3.0,
        scale: 0.37,
    };
    for &(x, y) in &[(12.0, -3.0), (100.5, 77.25), (612.0, 612.0), (13.1, 400.0)] {
        let normalized = transform.apply(Point2::new(x, y));
        let motors = to_corexy(normalized);
        assert_eq!(motors, MotorPosition::new(normalized.x() + normalized.y(), normalized.x() - normalized.y()));

        let back = from_corexy(motors);
        assert!((back.x - normalized.x()).abs() < 1e-12);
        assert!((back.y - normalized.y()).abs() < 1e-12);
    }
}

#[test]
fn test_imperial_units_and_custom_feed() {
    let settings = ProgramSettings {
        units: MeasurementSystem::Imperial,
        feed_rate: 1200,
        pen_servo_value: 90,
        decimals: 3,
        include_header_comments: false,
    };
    let paths = PathSet::new(vec![path(&[(0.0, 0.0), (10.0, 0.0)])]);
    let transform = ScaleTransform::from_paths(&paths, 11, 80.0).unwrap();
    let gcode = ProgramEmitter::new(settings, &GeometrySettings::default())
        .emit(&paths, &transform)
        .to_gcode();

    let lines: Vec<&str> = gcode.lines().collect();
    assert_eq!(&lines[..4], ["G20", "G90", "M3 S90", "G1 F1200"]);
    assert_eq!(lines[5], "G0 X0.000 Y0.000");
    assert_eq!(lines[16], "G1 X80.000 Y80.000");
}
