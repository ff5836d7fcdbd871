//! Tracer SVG output parsing.
//!
//! Reads the SVG documents written by potrace's SVG backend: one group with a
//! transform list (`translate(...) scale(...)`) mapping the tracer's internal
//! coordinates back to raster pixels, containing `<path>` elements made of
//! absolute and relative moves, lines, and Bézier curves.

use crate::error::{FileFormatError, FileFormatResult};
use crate::path::{PathSet, TracedPath};
use lyon::algorithms::path::iterator::PathIterator;
use lyon::math::{point, vector, Angle, Point, Transform};
use lyon::path::{Event, Path};
use regex::Regex;
use sketchplot_core::Point2;
use std::sync::LazyLock;

static SVG_ROOT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<svg[\s>]").expect("invalid svg regex"));
static VIEWBOX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"viewBox\s*=\s*["']([^"']+)["']"#).expect("invalid viewbox regex")
});
static GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<g\s+([^>]+)>"#).expect("invalid g regex"));
static TRANSFORM_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"transform\s*=\s*["']([^"']+)["']"#).expect("invalid transform regex")
});
static TRANSFORM_OP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(matrix|translate|scale|rotate)\s*\(([^)]*)\)").expect("invalid op regex")
});
static PATH_ELEMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<path\s+([^>]+)>"#).expect("invalid path regex"));
static PATH_DATA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\bd\s*=\s*["']([^"']+)["']"#).expect("invalid d regex"));

/// Parse a tracer SVG document into raster-space paths
///
/// The group transform is applied, then Y is flipped against the viewBox
/// height so the result is in a Y-up machine frame. Curves are flattened to
/// `tolerance` pixels and every subpath becomes its own [`TracedPath`].
pub fn parse_svg(content: &str, tolerance: f32) -> FileFormatResult<PathSet> {
    if content.trim().is_empty() {
        return Err(FileFormatError::EmptyFile("tracer output is empty".into()));
    }
    if !SVG_ROOT.is_match(content) {
        return Err(FileFormatError::SvgParseError(
            "missing <svg> element".into(),
        ));
    }

    let view_height = match VIEWBOX.captures(content) {
        Some(caps) => {
            let parts = parse_numbers(&caps[1])?;
            if parts.len() != 4 {
                return Err(FileFormatError::SvgParseError(format!(
                    "viewBox needs 4 values, got {}",
                    parts.len()
                )));
            }
            parts[3]
        }
        None => 0.0,
    };

    let group_transform = match GROUP
        .captures(content)
        .and_then(|caps| TRANSFORM_ATTR.captures(&caps[1]).map(|t| t[1].to_string()))
    {
        Some(list) => parse_transform_list(&list)?,
        None => Transform::identity(),
    };

    // y' = view_height - y
    let flip = Transform::new(1.0, 0.0, 0.0, -1.0, 0.0, view_height);
    let transform = group_transform.then(&flip);

    let mut paths = Vec::new();
    for element in PATH_ELEMENT.captures_iter(content) {
        let Some(data) = PATH_DATA.captures(&element[1]) else {
            continue;
        };
        let path = build_path(&data[1])?.transformed(&transform);
        paths.extend(
            flatten_subpaths(&path, tolerance)
                .into_iter()
                .filter_map(TracedPath::from_points),
        );
    }

    tracing::debug!("Parsed {} subpaths from tracer SVG", paths.len());
    Ok(PathSet::new(paths))
}

/// Parse an SVG transform list such as `translate(0,612) scale(0.1,-0.1)`
pub fn parse_transform_list(list: &str) -> FileFormatResult<Transform> {
    let mut combined = Transform::identity();

    for caps in TRANSFORM_OP.captures_iter(list) {
        let args = parse_numbers(&caps[2])?;
        let op = match (&caps[1], args.as_slice()) {
            ("matrix", [a, b, c, d, e, f]) => Transform::new(*a, *b, *c, *d, *e, *f),
            ("translate", [tx]) => Transform::translation(*tx, 0.0),
            ("translate", [tx, ty]) => Transform::translation(*tx, *ty),
            ("scale", [s]) => Transform::scale(*s, *s),
            ("scale", [sx, sy]) => Transform::scale(*sx, *sy),
            ("rotate", [deg]) => Transform::rotation(Angle::degrees(*deg)),
            (name, values) => {
                return Err(FileFormatError::SvgParseError(format!(
                    "unsupported transform {}({} values)",
                    name,
                    values.len()
                )))
            }
        };
        // later entries in the list apply first
        combined = op.then(&combined);
    }

    Ok(combined)
}

fn parse_numbers(list: &str) -> FileFormatResult<Vec<f32>> {
    list.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<f32>()
                .map_err(|_| FileFormatError::InvalidNumber(s.to_string()))
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
enum PathToken {
    Command(char),
    Number(f32),
}

/// Tokenize SVG path data into commands and numbers
fn tokenize_path_data(data: &str) -> FileFormatResult<Vec<PathToken>> {
    let mut tokens = Vec::new();
    let mut current = String::new();

    fn flush(current: &mut String, tokens: &mut Vec<PathToken>) -> FileFormatResult<()> {
        if !current.is_empty() {
            let value = current
                .parse::<f32>()
                .map_err(|_| FileFormatError::InvalidNumber(current.clone()))?;
            tokens.push(PathToken::Number(value));
            current.clear();
        }
        Ok(())
    }

    for ch in data.chars() {
        match ch {
            'M' | 'm' | 'L' | 'l' | 'H' | 'h' | 'V' | 'v' | 'C' | 'c' | 'S' | 's' | 'Q' | 'q'
            | 'T' | 't' | 'A' | 'a' | 'Z' | 'z' => {
                flush(&mut current, &mut tokens)?;
                tokens.push(PathToken::Command(ch));
            }
            ' ' | ',' | '\n' | '\r' | '\t' => flush(&mut current, &mut tokens)?,
            // a sign starts a new number unless it belongs to an exponent
            '-' | '+' if !current.is_empty() && !current.ends_with(['e', 'E']) => {
                flush(&mut current, &mut tokens)?;
                current.push(ch);
            }
            _ => current.push(ch),
        }
    }
    flush(&mut current, &mut tokens)?;

    Ok(tokens)
}

/// Build a lyon path from SVG path data
fn build_path(data: &str) -> FileFormatResult<Path> {
    let tokens = tokenize_path_data(data)?;

    let mut builder = Path::builder();
    let mut cursor = point(0.0, 0.0);
    let mut subpath_start = cursor;
    let mut active = false;
    let mut command: Option<char> = None;
    let mut i = 0;

    while i < tokens.len() {
        if let PathToken::Command(c) = tokens[i] {
            i += 1;
            if matches!(c, 'Z' | 'z') {
                if active {
                    builder.close();
                    active = false;
                }
                cursor = subpath_start;
                command = None;
                continue;
            }
            command = Some(c);
        }

        let c = command.ok_or_else(|| {
            FileFormatError::SvgParseError("path data must start with a command".into())
        })?;
        let arity = match c.to_ascii_uppercase() {
            'M' | 'L' => 2,
            'H' | 'V' => 1,
            'Q' => 4,
            'C' => 6,
            other => return Err(FileFormatError::UnsupportedCommand(other)),
        };
        let args = take_numbers(&tokens, i, arity, c)?;
        i += arity;

        let origin = if c.is_ascii_lowercase() {
            cursor.to_vector()
        } else {
            vector(0.0, 0.0)
        };

        if !active && c.to_ascii_uppercase() != 'M' {
            builder.begin(cursor);
            subpath_start = cursor;
            active = true;
        }

        match c.to_ascii_uppercase() {
            'M' => {
                if active {
                    builder.end(false);
                }
                cursor = point(args[0], args[1]) + origin;
                subpath_start = cursor;
                builder.begin(cursor);
                active = true;
                // further coordinate pairs are implicit line-tos
                command = Some(if c == 'm' { 'l' } else { 'L' });
            }
            'L' => {
                cursor = point(args[0], args[1]) + origin;
                builder.line_to(cursor);
            }
            'H' => {
                cursor = point(args[0] + origin.x, cursor.y);
                builder.line_to(cursor);
            }
            'V' => {
                cursor = point(cursor.x, args[0] + origin.y);
                builder.line_to(cursor);
            }
            'Q' => {
                let ctrl = point(args[0], args[1]) + origin;
                let to = point(args[2], args[3]) + origin;
                builder.quadratic_bezier_to(ctrl, to);
                cursor = to;
            }
            'C' => {
                let ctrl1 = point(args[0], args[1]) + origin;
                let ctrl2 = point(args[2], args[3]) + origin;
                let to = point(args[4], args[5]) + origin;
                builder.cubic_bezier_to(ctrl1, ctrl2, to);
                cursor = to;
            }
            _ => unreachable!("arity check rejects other commands"),
        }
    }

    if active {
        builder.end(false);
    }
    Ok(builder.build())
}

fn take_numbers(
    tokens: &[PathToken],
    start: usize,
    count: usize,
    command: char,
) -> FileFormatResult<Vec<f32>> {
    let values: Vec<f32> = tokens
        .iter()
        .skip(start)
        .take(count)
        .map_while(|t| match t {
            PathToken::Number(v) => Some(*v),
            PathToken::Command(_) => None,
        })
        .collect();

    if values.len() != count {
        return Err(FileFormatError::SvgParseError(format!(
            "'{}' expects {} numbers, found {}",
            command,
            count,
            values.len()
        )));
    }
    Ok(values)
}

/// Flatten a path and split it into one polyline per subpath
fn flatten_subpaths(path: &Path, tolerance: f32) -> Vec<Vec<Point2>> {
    let to_point = |p: Point| Point2::new(p.x as f64, p.y as f64);
    let mut subpaths = Vec::new();
    let mut current: Vec<Point2> = Vec::new();

    for event in path.iter().flattened(tolerance) {
        match event {
            Event::Begin { at } => {
                current = vec![to_point(at)];
            }
            Event::Line { to, .. } => {
                current.push(to_point(to));
            }
            Event::End { last, first, close } => {
                if close && last != first {
                    current.push(to_point(first));
                }
                subpaths.push(std::mem::take(&mut current));
            }
            _ => {}
        }
    }

    subpaths
}

#[cfg(test)]
mod tests {
    use super::*;

    const POTRACE_SAMPLE: &str = r##"<?xml version="1.0" standalone="no"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 20010904//EN"
 "http://www.w3.org/TR/2001/REC-SVG-20010904/DTD/svg10.dtd">
<svg version="1.0" xmlns="http://www.w3.org/2000/svg"
 width="100.000000pt" height="50.000000pt" viewBox="0 0 100.000000 50.000000"
 preserveAspectRatio="xMidYMid meet">
<metadata>
Created by potrace 1.16, written by Peter Selinger 2001-2019
</metadata>
<g transform="translate(0.000000,50.000000) scale(0.100000,-0.100000)"
fill="#000000" stroke="none">
<path d="M100 200 l500 0 0 100 -500 0 z"/>
</g>
</svg>
"##;

    #[test]
    fn test_tokenizer_splits_signs() {
        let tokens = tokenize_path_data("M10-20c1.5e-1 -3,4 5").unwrap();
        assert_eq!(
            tokens,
            vec![
                PathToken::Command('M'),
                PathToken::Number(10.0),
                PathToken::Number(-20.0),
                PathToken::Command('c'),
                PathToken::Number(0.15),
                PathToken::Number(-3.0),
                PathToken::Number(4.0),
                PathToken::Number(5.0),
            ]
        );
    }

    #[test]
    fn test_tokenizer_rejects_garbage() {
        assert!(matches!(
            tokenize_path_data("M 1 2 L 3 x"),
            Err(FileFormatError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_transform_list_order() {
        let t = parse_transform_list("translate(0,50) scale(0.1,-0.1)").unwrap();
        let p = t.transform_point(point(100.0, 200.0));
        assert!((p.x - 10.0).abs() < 1e-4);
        assert!((p.y - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_potrace_document_to_pixel_space() {
        let paths = parse_svg(POTRACE_SAMPLE, 0.05).unwrap();
        assert_eq!(paths.len(), 1);

        let rect = &paths.as_slice()[0];
        assert!(rect.is_closed());
        // 50px x 10px rectangle outline
        assert!((rect.length() - 120.0).abs() < 1e-3);

        // pixel (10, 30) flipped against the 50px view height
        let start = rect.start();
        assert!((start.x - 10.0).abs() < 1e-4);
        assert!((start.y - 20.0).abs() < 1e-4);
    }

    #[test]
    fn test_each_subpath_is_separate() {
        let svg = r#"<svg viewBox="0 0 10 10"><path d="M0 0 L4 0 M0 5 L0 8 L3 8 z"/></svg>"#;
        let paths = parse_svg(svg, 0.1).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths.as_slice()[0].length(), 4.0);
        assert!(paths.as_slice()[1].is_closed());
    }

    #[test]
    fn test_curves_are_flattened() {
        let svg = r#"<svg viewBox="0 0 20 20"><path d="M0 10 C0 0 10 0 10 10"/></svg>"#;
        let paths = parse_svg(svg, 0.01).unwrap();
        let curve = &paths.as_slice()[0];
        assert!(curve.points().len() > 4);
        // chord is 10, the arch is longer
        assert!(curve.length() > 12.0);
        assert!((curve.end().x - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_implicit_lineto_after_relative_move() {
        let svg = r#"<svg viewBox="0 0 10 10"><path d="m1 1 2 0 0 2"/></svg>"#;
        let paths = parse_svg(svg, 0.1).unwrap();
        let path = &paths.as_slice()[0];
        assert_eq!(path.points().len(), 3);
        assert_eq!(path.length(), 4.0);
    }

    #[test]
    fn test_document_without_paths_is_empty_set() {
        let svg = r#"<svg viewBox="0 0 10 10"><g transform="scale(1)"></g></svg>"#;
        assert!(parse_svg(svg, 0.1).unwrap().is_empty());
    }

    #[test]
    fn test_non_svg_is_rejected() {
        assert!(matches!(
            parse_svg("P1\n1 1\n0\n", 0.1),
            Err(FileFormatError::SvgParseError(_))
        ));
        assert!(matches!(parse_svg("  ", 0.1), Err(FileFormatError::EmptyFile(_))));
    }

    #[test]
    fn test_arc_commands_are_unsupported() {
        let svg = r#"<svg viewBox="0 0 10 10"><path d="M0 0 A1 1 0 0 1 2 2"/></svg>"#;
        assert!(matches!(
            parse_svg(svg, 0.1),
            Err(FileFormatError::UnsupportedCommand('A'))
        ));
    }
}
