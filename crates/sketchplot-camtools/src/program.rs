//! Motion Program Emitter
//!
//! Serializes scaled, CoreXY-transformed paths into G-code:
//!
//! ```text
//! G21            units
//! G90            absolute positioning
//! M3 S1000       pen servo ready
//! G1 F3000       feed rate
//! M5             \
//! G0 X.. Y..      | per drawn path: pen up, rapid to start, pen down,
//! M3              | then one linear move per sample
//! G1 X.. Y.. x N /
//! M5             pen up
//! G0 X0 Y0       home
//! ```
//!
//! Every coordinate pair in the body is a motor-space position, written in
//! the `X`/`Y` words the plotter firmware reads as motor A and motor B.

use crate::corexy::to_corexy;
use crate::path::{PathSet, TracedPath};
use crate::scaling::ScaleTransform;
use sketchplot_core::MotorPosition;
use sketchplot_settings::{GeometrySettings, MeasurementSystem, ProgramSettings};
use std::fmt;

/// One line of the motion program
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `; text`
    Comment(String),
    /// `G21` / `G20`
    Units(MeasurementSystem),
    /// `G90`
    Absolute,
    /// `M3 S<value>`, arms the pen servo
    PenReady(u32),
    /// `G1 F<rate>`
    FeedRate(u32),
    /// `M5`
    PenUp,
    /// `M3`
    PenDown,
    /// `G0 X.. Y..` in motor space
    Rapid(MotorPosition),
    /// `G1 X.. Y..` in motor space
    Linear(MotorPosition),
    /// `G0 X0 Y0`
    Home,
}

impl Instruction {
    /// Render the instruction with `decimals` digits on coordinates
    pub fn render(&self, decimals: usize) -> String {
        match self {
            Self::Comment(text) => format!("; {}", text),
            Self::Units(units) => units.gcode_declaration().to_string(),
            Self::Absolute => "G90".to_string(),
            Self::PenReady(value) => format!("M3 S{}", value),
            Self::FeedRate(rate) => format!("G1 F{}", rate),
            Self::PenUp => "M5".to_string(),
            Self::PenDown => "M3".to_string(),
            Self::Rapid(pos) => format!("G0 X{:.*} Y{:.*}", decimals, pos.a, decimals, pos.b),
            Self::Linear(pos) => format!("G1 X{:.*} Y{:.*}", decimals, pos.a, decimals, pos.b),
            Self::Home => "G0 X0 Y0".to_string(),
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Self::Linear(_))
    }

    pub fn is_pen_down(&self) -> bool {
        matches!(self, Self::PenDown)
    }
}

/// An emitted motion program
#[derive(Debug, Clone, PartialEq)]
pub struct MotionProgram {
    instructions: Vec<Instruction>,
    drawn_paths: usize,
    skipped_paths: usize,
    decimals: usize,
}

impl MotionProgram {
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    /// Paths that produced a pen-down block
    pub fn drawn_paths(&self) -> usize {
        self.drawn_paths
    }

    /// Paths dropped as tracer noise
    pub fn skipped_paths(&self) -> usize {
        self.skipped_paths
    }

    pub fn instruction_count(&self) -> usize {
        self.instructions.len()
    }

    pub fn linear_move_count(&self) -> usize {
        self.instructions.iter().filter(|i| i.is_linear()).count()
    }

    /// Rendered lines
    pub fn lines(&self) -> impl Iterator<Item = String> + '_ {
        self.instructions.iter().map(|i| i.render(self.decimals))
    }

    /// The program text, one instruction per line, without a trailing newline
    pub fn to_gcode(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }
}

impl fmt::Display for MotionProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_gcode())
    }
}

/// Builds motion programs from traced paths
#[derive(Debug, Clone)]
pub struct ProgramEmitter {
    program: ProgramSettings,
    samples: usize,
    min_path_length: f64,
}

impl ProgramEmitter {
    pub fn new(program: ProgramSettings, geometry: &GeometrySettings) -> Self {
        Self {
            program,
            samples: geometry.emit_samples,
            min_path_length: geometry.min_path_length,
        }
    }

    /// Emit the program for `paths` under `transform`
    pub fn emit(&self, paths: &PathSet, transform: &ScaleTransform) -> MotionProgram {
        let mut body = vec![
            Instruction::Units(self.program.units),
            Instruction::Absolute,
            Instruction::PenReady(self.program.pen_servo_value),
            Instruction::FeedRate(self.program.feed_rate),
        ];

        let mut drawn_paths = 0;
        let mut skipped_paths = 0;
        for path in paths {
            if path.length() < self.min_path_length {
                skipped_paths += 1;
                continue;
            }
            self.emit_path(path, transform, &mut body);
            drawn_paths += 1;
        }

        body.push(Instruction::PenUp);
        body.push(Instruction::Home);

        tracing::info!(
            "Emitted {} paths ({} skipped as noise), {} instructions",
            drawn_paths,
            skipped_paths,
            body.len()
        );

        let instructions = if self.program.include_header_comments {
            let mut with_header = self.header(drawn_paths, skipped_paths, body.len(), transform);
            with_header.extend(body);
            with_header
        } else {
            body
        };

        MotionProgram {
            instructions,
            drawn_paths,
            skipped_paths,
            decimals: self.program.decimals,
        }
    }

    fn emit_path(&self, path: &TracedPath, transform: &ScaleTransform, out: &mut Vec<Instruction>) {
        let start = to_corexy(transform.apply(path.start()));
        out.push(Instruction::PenUp);
        out.push(Instruction::Rapid(start));
        out.push(Instruction::PenDown);

        for i in 1..=self.samples {
            let point = path.point_at(i as f64 / self.samples as f64);
            out.push(Instruction::Linear(to_corexy(transform.apply(point))));
        }
    }

    fn header(
        &self,
        drawn: usize,
        skipped: usize,
        body_len: usize,
        transform: &ScaleTransform,
    ) -> Vec<Instruction> {
        vec![
            Instruction::Comment("Sketchplot CoreXY drawing".to_string()),
            Instruction::Comment(format!(
                "Generated: {}",
                chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
            )),
            Instruction::Comment(format!("Paths drawn: {} (skipped {})", drawn, skipped)),
            Instruction::Comment(format!("Scale: {}", transform)),
            Instruction::Comment(format!(
                "Units: {} ({})",
                self.program.units,
                self.program.units.suffix()
            )),
            Instruction::Comment(format!("Instructions: {}", body_len)),
        ]
    }
}
