//! Traced paths
//!
//! A traced path is a continuous polyline in raster-pixel space, produced by
//! a tracer from a padded raster. It is parameterized by normalized arc
//! length: `point_at(0.0)` is the start and `point_at(1.0)` the end.

use sketchplot_core::Point2;

/// A continuous traced path
#[derive(Debug, Clone, PartialEq)]
pub struct TracedPath {
    points: Vec<Point2>,
    /// Arc length from the start to each vertex
    cumulative: Vec<f64>,
}

impl TracedPath {
    /// Build a path from its vertices; `None` when there are none
    pub fn from_points(points: Vec<Point2>) -> Option<Self> {
        if points.is_empty() {
            return None;
        }

        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(0.0);
        for pair in points.windows(2) {
            total += pair[0].distance_to(&pair[1]);
            cumulative.push(total);
        }

        Some(Self { points, cumulative })
    }

    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    pub fn start(&self) -> Point2 {
        self.points[0]
    }

    pub fn end(&self) -> Point2 {
        self.points[self.points.len() - 1]
    }

    /// Total arc length
    pub fn length(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// Whether the path returns to its start point
    pub fn is_closed(&self) -> bool {
        self.points.len() > 2 && self.start().distance_to(&self.end()) < 1e-9
    }

    /// Point at the given fraction of the arc length
    ///
    /// `fraction` is clamped to `[0, 1]`. A zero-length path always yields
    /// its start point.
    pub fn point_at(&self, fraction: f64) -> Point2 {
        let length = self.length();
        if length <= 0.0 || fraction <= 0.0 {
            return self.start();
        }
        if fraction >= 1.0 {
            return self.end();
        }

        let target = fraction * length;
        // first vertex whose cumulative length reaches the target
        let idx = self
            .cumulative
            .partition_point(|&d| d < target)
            .clamp(1, self.points.len() - 1);

        let seg_start = self.cumulative[idx - 1];
        let seg_len = self.cumulative[idx] - seg_start;
        if seg_len <= 0.0 {
            return self.points[idx];
        }
        let t = (target - seg_start) / seg_len;
        self.points[idx - 1].lerp(&self.points[idx], t)
    }

    /// `count` points at evenly spaced fractions from 0 to 1 inclusive
    pub fn sample(&self, count: usize) -> Vec<Point2> {
        match count {
            0 => Vec::new(),
            1 => vec![self.start()],
            _ => (0..count)
                .map(|i| self.point_at(i as f64 / (count - 1) as f64))
                .collect(),
        }
    }
}

/// The ordered set of paths produced by one tracer run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathSet {
    paths: Vec<TracedPath>,
}

impl PathSet {
    pub fn new(paths: Vec<TracedPath>) -> Self {
        Self { paths }
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TracedPath> {
        self.paths.iter()
    }

    pub fn as_slice(&self) -> &[TracedPath] {
        &self.paths
    }

    /// Sum of all path lengths
    pub fn total_length(&self) -> f64 {
        self.paths.iter().map(TracedPath::length).sum()
    }
}

impl From<Vec<TracedPath>> for PathSet {
    fn from(paths: Vec<TracedPath>) -> Self {
        Self::new(paths)
    }
}

impl FromIterator<TracedPath> for PathSet {
    fn from_iter<I: IntoIterator<Item = TracedPath>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl IntoIterator for PathSet {
    type Item = TracedPath;
    type IntoIter = std::vec::IntoIter<TracedPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.into_iter()
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a TracedPath;
    type IntoIter = std::slice::Iter<'a, TracedPath>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polyline(points: &[(f64, f64)]) -> TracedPath {
        TracedPath::from_points(points.iter().map(|&(x, y)| Point2::new(x, y)).collect()).unwrap()
    }

    #[test]
    fn test_empty_points_rejected() {
        assert!(TracedPath::from_points(Vec::new()).is_none());
    }

    #[test]
    fn test_length_and_endpoints() {
        let path = polyline(&[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]);
        assert_eq!(path.length(), 11.0);
        assert_eq!(path.start(), Point2::new(0.0, 0.0));
        assert_eq!(path.end(), Point2::new(3.0, 10.0));
        assert!(!path.is_closed());
    }

    #[test]
    fn test_point_at_is_arc_length_parameterized() {
        let path = polyline(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0)]);
        assert_eq!(path.point_at(0.0), Point2::new(0.0, 0.0));
        assert_eq!(path.point_at(0.25), Point2::new(5.0, 0.0));
        assert_eq!(path.point_at(0.5), Point2::new(10.0, 0.0));
        assert_eq!(path.point_at(0.75), Point2::new(10.0, 5.0));
        assert_eq!(path.point_at(1.0), Point2::new(10.0, 10.0));
        assert_eq!(path.point_at(7.0), Point2::new(10.0, 10.0));
        assert_eq!(path.point_at(-1.0), Point2::new(0.0, 0.0));
    }

    #[test]
    fn test_repeated_vertices_do_not_divide_by_zero() {
        let path = polyline(&[(0.0, 0.0), (0.0, 0.0), (4.0, 0.0), (4.0, 0.0)]);
        assert_eq!(path.length(), 4.0);
        assert_eq!(path.point_at(0.5), Point2::new(2.0, 0.0));

        let dot = polyline(&[(2.0, 3.0)]);
        assert_eq!(dot.length(), 0.0);
        assert_eq!(dot.point_at(0.6), Point2::new(2.0, 3.0));
    }

    #[test]
    fn test_sample_includes_both_ends() {
        let path = polyline(&[(0.0, 0.0), (10.0, 0.0)]);
        let samples = path.sample(11);
        assert_eq!(samples.len(), 11);
        assert_eq!(samples[0], Point2::new(0.0, 0.0));
        assert_eq!(samples[10], Point2::new(10.0, 0.0));
        assert!((samples[3].x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_closed_loop_detection() {
        let square = polyline(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0)]);
        assert!(square.is_closed());
    }
}
