//! Piecewise cubic Bezier splines.
//!
//! A [`Spline`] stores one flat buffer of control points for a chain of cubic
//! Bezier segments that share endpoints. Segment `i` owns the points at
//! `3i..=3i+3`, so the buffer length is always `1 + 3 * segment_count` and the
//! last point is the open end where the next segment starts.
//!
//! The chain is evaluated with a global parameter `t` in `[0, segment_count]`:
//! the integer part selects the segment and the fractional part is the local
//! parameter inside it.
//!
//! # Example
//!
//! ```ignore
//! use spline_engine::geom::{Point3, Spline};
//!
//! let mut spline = Spline::new();
//! spline.add_segment();
//! spline.set_point(1, Point3::new(0.0, 1.0, 0.0))?;
//! spline.set_point(2, Point3::new(1.0, 1.0, 0.0))?;
//! spline.set_point(3, Point3::new(1.0, 0.0, 0.0))?;
//!
//! let mid = spline.evaluate(0.5)?;
//! let polyline: Vec<_> = spline.tessellate(16).collect();
//! ```

use std::iter::FusedIterator;

use super::core::{BBox, Point3, Tolerance, Vec3};
use super::curve::{CubicBezier3, Curve3, Line3, curve_arc_length};

/// Control points per segment, not counting the shared start point.
const POINTS_PER_SEGMENT: usize = 3;

// ============================================================================
// Options
// ============================================================================

/// Evaluator used for each cubic segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BezierBasis {
    /// Expanded power basis `p0 + c1 u + c2 u² + c3 u³`.
    #[default]
    Polynomial,
    /// Bernstein basis `(1-u)³p0 + 3(1-u)²u p1 + 3(1-u)u² p2 + u³p3`.
    Bernstein,
    /// Repeated linear interpolation.
    DeCasteljau,
}

/// What [`Spline::evaluate`] does with a parameter outside `[0, segment_count]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterPolicy {
    /// Return [`SplineError::OutOfRangeParameter`].
    #[default]
    Reject,
    /// Clamp into the valid range.
    Clamp,
}

/// Options controlling spline evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplineOptions {
    pub basis: BezierBasis,
    pub parameter_policy: ParameterPolicy,
    /// Samples per segment used by [`Spline::arc_length`] when the caller passes 0
    /// and by hosts that do not pick their own resolution.
    pub samples_per_segment: usize,
}

impl SplineOptions {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            basis: BezierBasis::Polynomial,
            parameter_policy: ParameterPolicy::Reject,
            samples_per_segment: 16,
        }
    }

    #[must_use]
    pub const fn with_basis(mut self, basis: BezierBasis) -> Self {
        self.basis = basis;
        self
    }

    #[must_use]
    pub const fn with_parameter_policy(mut self, policy: ParameterPolicy) -> Self {
        self.parameter_policy = policy;
        self
    }

    #[must_use]
    pub const fn with_samples_per_segment(mut self, samples: usize) -> Self {
        self.samples_per_segment = samples;
        self
    }
}

impl Default for SplineOptions {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Errors and diagnostics
// ============================================================================

/// Errors reported by [`Spline`] operations.
///
/// Growing and shrinking the chain never fails; only evaluation and direct
/// point edits can be rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SplineError {
    /// The parameter lies outside `[0, segment_count]`.
    #[error("parameter {t} is outside the spline domain [0, {segment_count}]")]
    OutOfRangeParameter { t: f64, segment_count: usize },

    /// The parameter is NaN or infinite.
    #[error("parameter must be finite, got {t}")]
    NonFiniteParameter { t: f64 },

    /// A control point index past the end of the buffer.
    #[error("control point index {index} is out of range for {len} points")]
    PointIndexOutOfRange { index: usize, len: usize },

    /// A control point with a NaN or infinite coordinate.
    #[error("control point {index} has non-finite coordinates")]
    NonFinitePoint { index: usize },

    /// A replacement buffer whose length is not `1 + 3n`.
    #[error("control point count must be 1 + 3n, got {count}")]
    InvalidPointCount { count: usize },
}

/// Outcome of [`Spline::set_segment_count`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SegmentCountDiagnostics {
    /// Segment count before the call.
    pub previous: usize,
    /// Segment count after the call.
    pub current: usize,
    /// Number of segments appended.
    pub added: usize,
    /// Number of segments removed.
    pub removed: usize,
}

// ============================================================================
// Spline
// ============================================================================

/// A chain of cubic Bezier segments sharing endpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    points: Vec<Point3>,
    open_end: Point3,
    options: SplineOptions,
}

impl Spline {
    /// A spline with no segments and its open end at the origin.
    #[must_use]
    pub fn new() -> Self {
        Self::with_start(Point3::ORIGIN)
    }

    /// A spline with no segments and its open end at `start`.
    #[must_use]
    pub fn with_start(start: Point3) -> Self {
        Self {
            points: vec![start],
            open_end: start,
            options: SplineOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: SplineOptions) -> Self {
        self.options = options;
        self
    }

    /// Builds a spline from a complete control point buffer.
    ///
    /// # Errors
    /// Returns [`SplineError::InvalidPointCount`] unless `points.len()` is
    /// `1 + 3n`, or [`SplineError::NonFinitePoint`] for NaN/infinite coordinates.
    pub fn from_points(points: Vec<Point3>) -> Result<Self, SplineError> {
        let mut spline = Self::new();
        spline.set_points(points)?;
        Ok(spline)
    }

    #[must_use]
    pub const fn options(&self) -> SplineOptions {
        self.options
    }

    pub fn set_options(&mut self, options: SplineOptions) {
        self.options = options;
    }

    // ------------------------------------------------------------------------
    // Point buffer
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub fn point(&self, index: usize) -> Option<Point3> {
        self.points.get(index).copied()
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1) / POINTS_PER_SEGMENT
    }

    /// True when the spline has no segments (only the lingering open end).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segment_count() == 0
    }

    /// The most recent shared endpoint, where the next segment starts.
    ///
    /// Always equal to the last control point.
    #[must_use]
    pub const fn open_end(&self) -> Point3 {
        self.open_end
    }

    /// Moves a single control point.
    ///
    /// Moving a joint (index `3i`) moves the shared endpoint of both adjacent
    /// segments.
    ///
    /// # Errors
    /// [`SplineError::PointIndexOutOfRange`] or [`SplineError::NonFinitePoint`].
    pub fn set_point(&mut self, index: usize, point: Point3) -> Result<(), SplineError> {
        let len = self.points.len();
        let slot = self
            .points
            .get_mut(index)
            .ok_or(SplineError::PointIndexOutOfRange { index, len })?;
        if !point.is_finite() {
            return Err(SplineError::NonFinitePoint { index });
        }
        *slot = point;
        if index + 1 == len {
            self.open_end = point;
        }
        Ok(())
    }

    /// Replaces the whole control point buffer.
    ///
    /// # Errors
    /// [`SplineError::InvalidPointCount`] or [`SplineError::NonFinitePoint`];
    /// the spline is left untouched on error.
    pub fn set_points(&mut self, points: Vec<Point3>) -> Result<(), SplineError> {
        let count = points.len();
        if count == 0 || (count - 1) % POINTS_PER_SEGMENT != 0 {
            return Err(SplineError::InvalidPointCount { count });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(SplineError::NonFinitePoint { index });
        }

        log::debug!(
            "replacing spline buffer: {} -> {} control points",
            self.points.len(),
            count
        );
        self.open_end = points[count - 1];
        self.points = points;
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Segment management
    // ------------------------------------------------------------------------

    /// Appends a segment collapsed onto the current open end.
    ///
    /// The three new control points and the new terminal point all start at
    /// the open end; the caller is expected to move them apart afterwards.
    /// Returns the index of the new segment.
    pub fn add_segment(&mut self) -> usize {
        if let Some(last) = self.points.pop() {
            self.open_end = last;
        }
        self.points
            .extend(std::iter::repeat_n(self.open_end, POINTS_PER_SEGMENT + 1));

        let index = self.segment_count() - 1;
        log::debug!("added spline segment {index} at {:?}", self.open_end);
        index
    }

    /// Removes the last segment, keeping the current terminal point as the
    /// new open end.
    ///
    /// Saturates at the single-point state: returns `false` and leaves the
    /// buffer unchanged when there is no segment to remove.
    pub fn remove_segment(&mut self) -> bool {
        let len = self.points.len();
        if len <= POINTS_PER_SEGMENT {
            return false;
        }

        self.open_end = self.points[len - 1];
        self.points.truncate(len - (POINTS_PER_SEGMENT + 1));
        self.points.push(self.open_end);

        log::debug!("removed spline segment {}", self.segment_count());
        true
    }

    /// Grows or shrinks the chain to exactly `count` segments.
    pub fn set_segment_count(&mut self, count: usize) -> SegmentCountDiagnostics {
        let previous = self.segment_count();
        let mut diagnostics = SegmentCountDiagnostics {
            previous,
            ..SegmentCountDiagnostics::default()
        };

        while self.segment_count() < count {
            self.add_segment();
            diagnostics.added += 1;
        }
        while self.segment_count() > count && self.remove_segment() {
            diagnostics.removed += 1;
        }

        diagnostics.current = self.segment_count();
        if diagnostics.added > 0 || diagnostics.removed > 0 {
            log::debug!(
                "spline segment count {} -> {} (+{} / -{})",
                diagnostics.previous,
                diagnostics.current,
                diagnostics.added,
                diagnostics.removed
            );
        }
        diagnostics
    }

    /// Segment `index` as a standalone cubic.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<CubicBezier3> {
        let start = index.checked_mul(POINTS_PER_SEGMENT)?;
        let window: &[Point3; 4] = self.points.get(start..start + 4)?.try_into().ok()?;
        Some(CubicBezier3::from_slice(window))
    }

    /// All segments in chain order.
    pub fn segments(&self) -> impl ExactSizeIterator<Item = CubicBezier3> + '_ {
        self.points
            .windows(4)
            .step_by(POINTS_PER_SEGMENT)
            .map(|w| CubicBezier3::new(w[0], w[1], w[2], w[3]))
    }

    // ------------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------------

    /// Position at global parameter `t` in `[0, segment_count]`.
    ///
    /// `evaluate(0.0)` is exactly the first control point and
    /// `evaluate(segment_count)` exactly the last.
    ///
    /// # Errors
    /// [`SplineError::NonFiniteParameter`] for NaN/infinite `t`, and
    /// [`SplineError::OutOfRangeParameter`] for `t` outside the domain when
    /// the policy is [`ParameterPolicy::Reject`].
    pub fn evaluate(&self, t: f64) -> Result<Point3, SplineError> {
        let t = self.resolve_parameter(t)?;
        Ok(self.evaluate_in_domain(t))
    }

    /// Position at `u` in `[0, 1]` spread over the whole chain.
    ///
    /// # Errors
    /// Same as [`Spline::evaluate`], with the domain `[0, 1]`.
    pub fn evaluate_normalized(&self, u: f64) -> Result<Point3, SplineError> {
        if !u.is_finite() {
            return Err(SplineError::NonFiniteParameter { t: u });
        }
        let segment_count = self.segment_count();
        let t = u * segment_count as f64;
        if !(0.0..=1.0).contains(&u) && self.options.parameter_policy == ParameterPolicy::Reject {
            return Err(SplineError::OutOfRangeParameter { t, segment_count });
        }
        self.evaluate(t.clamp(0.0, segment_count as f64))
    }

    /// Lazily samples the chain with `samples_per_segment` steps per segment.
    ///
    /// Joints are emitted once, so the iterator yields
    /// `segment_count * samples_per_segment + 1` points. A `samples_per_segment`
    /// of zero is treated as one, and counts whose total would not fit in a
    /// `usize` are capped so the total does.
    #[must_use]
    pub fn tessellate(&self, samples_per_segment: usize) -> Tessellation<'_> {
        let segment_count = self.segment_count();
        let max_samples = (usize::MAX - 1) / segment_count.max(1);
        let samples = samples_per_segment.clamp(1, max_samples);
        Tessellation {
            spline: self,
            samples,
            next: 0,
            end: segment_count * samples + 1,
        }
    }

    /// Approximate chain length using `samples_per_segment` chords per segment
    /// (the configured default when zero).
    #[must_use]
    pub fn arc_length(&self, samples_per_segment: usize) -> f64 {
        let samples = if samples_per_segment == 0 {
            self.options.samples_per_segment.max(1)
        } else {
            samples_per_segment
        };
        self.segments()
            .map(|segment| curve_arc_length(&segment, samples))
            .sum()
    }

    // ------------------------------------------------------------------------
    // Control polygon
    // ------------------------------------------------------------------------

    /// Lines between consecutive control points.
    #[must_use]
    pub fn control_polygon(&self) -> Vec<Line3> {
        self.points
            .windows(2)
            .map(|pair| Line3::new(pair[0], pair[1]))
            .collect()
    }

    /// Handle lines per segment: `p0 -> p1` and `p2 -> p3`.
    #[must_use]
    pub fn handle_lines(&self) -> Vec<Line3> {
        self.segments()
            .flat_map(|segment| {
                let [p0, p1, p2, p3] = segment.control_points();
                [Line3::new(p0, p1), Line3::new(p2, p3)]
            })
            .collect()
    }

    /// Bounds of the control points, which also bound the curve.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BBox> {
        BBox::from_points(&self.points)
    }

    // ------------------------------------------------------------------------
    // Continuity
    // ------------------------------------------------------------------------

    /// Parametric continuity order at interior joint `joint` (between segments
    /// `joint - 1` and `joint`).
    ///
    /// Joints always share a position, so the result is `Some(0)` or `Some(1)`.
    /// Returns `None` when `joint` is not an interior joint.
    #[must_use]
    pub fn continuity_at_joint(&self, joint: usize, tol: Tolerance) -> Option<usize> {
        let (incoming, outgoing) = self.joint_derivatives(joint)?;
        if tol.approx_eq_vec3(incoming, outgoing) {
            Some(1)
        } else {
            Some(0)
        }
    }

    /// Whether the tangent direction is continuous across `joint` (G1).
    #[must_use]
    pub fn is_tangent_continuous_at_joint(&self, joint: usize, tol: Tolerance) -> bool {
        let Some((incoming, outgoing)) = self.joint_derivatives(joint) else {
            return false;
        };
        match (incoming.normalized(), outgoing.normalized()) {
            (Some(a), Some(b)) => tol.approx_eq_vec3(a, b),
            _ => false,
        }
    }

    fn joint_derivatives(&self, joint: usize) -> Option<(Vec3, Vec3)> {
        if joint == 0 || joint >= self.segment_count() {
            return None;
        }
        let before = self.segment(joint - 1)?;
        let after = self.segment(joint)?;
        Some((before.derivative_at(1.0), after.derivative_at(0.0)))
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    fn resolve_parameter(&self, t: f64) -> Result<f64, SplineError> {
        if !t.is_finite() {
            return Err(SplineError::NonFiniteParameter { t });
        }
        let segment_count = self.segment_count();
        let max = segment_count as f64;
        if (0.0..=max).contains(&t) {
            return Ok(t);
        }
        match self.options.parameter_policy {
            ParameterPolicy::Reject => Err(SplineError::OutOfRangeParameter { t, segment_count }),
            ParameterPolicy::Clamp => {
                log::trace!("clamping spline parameter {t} into [0, {max}]");
                Ok(t.clamp(0.0, max))
            }
        }
    }

    /// Splits an in-domain global parameter into `(segment, local)`.
    fn locate(&self, t: f64) -> Option<(usize, f64)> {
        let segment_count = self.segment_count();
        if segment_count == 0 {
            return None;
        }
        let floor = t.floor();
        // `t` is finite and non-negative here, so the cast cannot wrap.
        let segment = floor as usize;
        if segment >= segment_count {
            Some((segment_count - 1, 1.0))
        } else {
            Some((segment, t - floor))
        }
    }

    fn evaluate_in_domain(&self, t: f64) -> Point3 {
        let Some((index, local)) = self.locate(t) else {
            return self.points[0];
        };
        let Some(segment) = self.segment(index) else {
            return self.points[0];
        };
        evaluate_segment(&segment, self.options.basis, local)
    }

    fn local_derivative(&self, t: f64, second: bool) -> Vec3 {
        let (t0, t1) = self.domain();
        let Some((index, local)) = self.locate(t.clamp(t0, t1)) else {
            return Vec3::ZERO;
        };
        let Some(segment) = self.segment(index) else {
            return Vec3::ZERO;
        };
        if second {
            segment.second_derivative_at(local)
        } else {
            segment.derivative_at(local)
        }
    }
}

impl Default for Spline {
    fn default() -> Self {
        Self::new()
    }
}

/// The global parameter maps each segment onto a unit interval, so local
/// derivatives are also global derivatives.
impl Curve3 for Spline {
    fn point_at(&self, t: f64) -> Point3 {
        if t.is_nan() {
            return self.points[0];
        }
        let (t0, t1) = self.domain();
        self.evaluate_in_domain(t.clamp(t0, t1))
    }

    fn domain(&self) -> (f64, f64) {
        (0.0, self.segment_count() as f64)
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        self.local_derivative(t, false)
    }

    fn second_derivative_at(&self, t: f64) -> Vec3 {
        self.local_derivative(t, true)
    }
}

/// Evaluates one segment with the given basis, returning the end control
/// points exactly at `u == 0` and `u == 1`.
#[must_use]
pub fn evaluate_segment(segment: &CubicBezier3, basis: BezierBasis, u: f64) -> Point3 {
    if u <= 0.0 {
        return segment.p0;
    }
    if u >= 1.0 {
        return segment.p3;
    }
    match basis {
        BezierBasis::Polynomial => segment.point_at_polynomial(u),
        BezierBasis::Bernstein => segment.point_at(u),
        BezierBasis::DeCasteljau => segment.point_at_de_casteljau(u),
    }
}

// ============================================================================
// Tessellation
// ============================================================================

/// Lazy sampling of a [`Spline`], created by [`Spline::tessellate`].
///
/// Clone before consuming, or call [`Spline::tessellate`] again, to walk the
/// chain a second time.
#[derive(Debug, Clone)]
pub struct Tessellation<'a> {
    spline: &'a Spline,
    samples: usize,
    next: usize,
    end: usize,
}

impl Tessellation<'_> {
    /// Local samples per segment.
    #[must_use]
    pub const fn samples_per_segment(&self) -> usize {
        self.samples
    }

    fn sample(&self, index: usize) -> Point3 {
        if index == 0 {
            return self.spline.points[0];
        }
        let segment = (index - 1) / self.samples;
        let step = (index - 1) % self.samples + 1;
        let t = if step == self.samples {
            (segment + 1) as f64
        } else {
            segment as f64 + step as f64 / self.samples as f64
        };
        self.spline.evaluate_in_domain(t)
    }
}

impl Iterator for Tessellation<'_> {
    type Item = Point3;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let point = self.sample(self.next);
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Tessellation<'_> {}

impl FusedIterator for Tessellation<'_> {}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_spline_is_a_single_open_end() {
        let spline = Spline::new();
        assert_eq!(spline.points(), &[Point3::ORIGIN]);
        assert_eq!(spline.segment_count(), 0);
        assert!(spline.is_empty());
        assert_eq!(spline.open_end(), Point3::ORIGIN);
    }

    #[test]
    fn add_segment_clones_the_open_end() {
        let start = Point3::new(1.0, 2.0, 3.0);
        let mut spline = Spline::with_start(start);

        assert_eq!(spline.add_segment(), 0);
        assert_eq!(spline.points(), &[start; 4]);
        assert_eq!(spline.add_segment(), 1);
        assert_eq!(spline.point_count(), 7);
        assert!(spline.points().iter().all(|p| *p == start));
    }

    #[test]
    fn add_segment_seeds_from_moved_terminal_point() {
        let mut spline = Spline::new();
        spline.add_segment();
        let end = Point3::new(4.0, 0.0, 0.0);
        spline.set_point(3, end).unwrap();

        spline.add_segment();
        assert_eq!(spline.open_end(), end);
        assert_eq!(&spline.points()[3..], &[end; 4]);
    }

    #[test]
    fn open_end_follows_edited_terminal_point() {
        let mut spline = Spline::new();
        spline.add_segment();
        let end = Point3::new(5.0, 0.0, 0.0);
        spline.set_point(3, end).unwrap();
        assert_eq!(spline.open_end(), end);
        assert_eq!(spline.open_end(), spline.points()[3]);

        spline.set_point(2, Point3::new(1.0, 1.0, 0.0)).unwrap();
        assert_eq!(spline.open_end(), end);

        let mut single = Spline::new();
        single.set_point(0, Point3::new(0.0, 2.0, 0.0)).unwrap();
        assert_eq!(single.open_end(), Point3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn remove_segment_keeps_terminal_point() {
        let mut spline = Spline::new();
        spline.set_segment_count(2);
        let end = Point3::new(9.0, 9.0, 0.0);
        spline.set_point(6, end).unwrap();

        assert!(spline.remove_segment());
        assert_eq!(spline.point_count(), 4);
        assert_eq!(spline.points()[3], end);
        assert_eq!(spline.open_end(), end);
    }

    #[test]
    fn remove_segment_saturates_at_single_point() {
        let mut spline = Spline::with_start(Point3::new(1.0, 1.0, 1.0));
        for _ in 0..3 {
            assert!(!spline.remove_segment());
            assert_eq!(spline.points(), &[Point3::new(1.0, 1.0, 1.0)]);
        }
    }

    #[test]
    fn set_segment_count_reports_changes() {
        let mut spline = Spline::new();
        let grow = spline.set_segment_count(3);
        assert_eq!(
            grow,
            SegmentCountDiagnostics { previous: 0, current: 3, added: 3, removed: 0 }
        );

        let shrink = spline.set_segment_count(1);
        assert_eq!(
            shrink,
            SegmentCountDiagnostics { previous: 3, current: 1, added: 0, removed: 2 }
        );

        let same = spline.set_segment_count(1);
        assert_eq!(same.added + same.removed, 0);
        assert_eq!(spline.point_count(), 4);
    }

    #[test]
    fn set_points_validates_length_and_finiteness() {
        let mut spline = Spline::new();
        assert_eq!(
            spline.set_points(vec![Point3::ORIGIN; 3]),
            Err(SplineError::InvalidPointCount { count: 3 })
        );
        assert_eq!(
            spline.set_points(Vec::new()),
            Err(SplineError::InvalidPointCount { count: 0 })
        );

        let mut bad = vec![Point3::ORIGIN; 4];
        bad[2] = Point3::new(f64::NAN, 0.0, 0.0);
        assert_eq!(spline.set_points(bad), Err(SplineError::NonFinitePoint { index: 2 }));
        assert_eq!(spline.point_count(), 1);

        let good = vec![Point3::new(0.0, 0.0, 0.0); 7];
        assert!(spline.set_points(good).is_ok());
        assert_eq!(spline.segment_count(), 2);
    }

    #[test]
    fn set_point_rejects_bad_input() {
        let mut spline = Spline::new();
        assert_eq!(
            spline.set_point(1, Point3::ORIGIN),
            Err(SplineError::PointIndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(
            spline.set_point(0, Point3::new(0.0, f64::INFINITY, 0.0)),
            Err(SplineError::NonFinitePoint { index: 0 })
        );
    }

    #[test]
    fn evaluate_rejects_or_clamps_out_of_range() {
        let mut spline = Spline::new();
        spline.add_segment();
        spline.set_point(3, Point3::new(3.0, 0.0, 0.0)).unwrap();

        assert_eq!(
            spline.evaluate(1.5),
            Err(SplineError::OutOfRangeParameter { t: 1.5, segment_count: 1 })
        );
        assert!(matches!(
            spline.evaluate(f64::NAN),
            Err(SplineError::NonFiniteParameter { .. })
        ));

        spline.set_options(SplineOptions::new().with_parameter_policy(ParameterPolicy::Clamp));
        assert_eq!(spline.evaluate(-2.0), Ok(Point3::ORIGIN));
        assert_eq!(spline.evaluate(7.0), Ok(Point3::new(3.0, 0.0, 0.0)));
        assert!(spline.evaluate(f64::INFINITY).is_err());
    }

    #[test]
    fn evaluate_on_empty_spline_returns_the_single_point() {
        let spline = Spline::with_start(Point3::new(2.0, 0.0, 0.0));
        assert_eq!(spline.evaluate(0.0), Ok(Point3::new(2.0, 0.0, 0.0)));
        assert!(spline.evaluate(0.5).is_err());
        assert_eq!(spline.tessellate(8).collect::<Vec<_>>(), vec![Point3::new(2.0, 0.0, 0.0)]);
    }

    #[test]
    fn segment_snaps_to_end_control_points() {
        let segment = CubicBezier3::new(
            Point3::new(0.1, 0.2, 0.3),
            Point3::new(0.7, -1.3, 2.9),
            Point3::new(-4.1, 0.3, 0.7),
            Point3::new(0.3, 0.6, 0.9),
        );
        for basis in [BezierBasis::Polynomial, BezierBasis::Bernstein, BezierBasis::DeCasteljau] {
            assert_eq!(evaluate_segment(&segment, basis, 0.0), segment.p0);
            assert_eq!(evaluate_segment(&segment, basis, 1.0), segment.p3);
        }
    }

    #[test]
    fn tessellation_is_exact_size_and_restartable() {
        let mut spline = Spline::new();
        spline.set_segment_count(3);
        let iter = spline.tessellate(4);
        assert_eq!(iter.len(), 13);

        let first: Vec<_> = iter.clone().collect();
        let second: Vec<_> = iter.collect();
        assert_eq!(first, second);
        assert_eq!(spline.tessellate(0).len(), 4);
    }

    #[test]
    fn tessellate_caps_oversized_sample_counts() {
        let mut spline = Spline::new();
        spline.set_segment_count(2);
        let mut iter = spline.tessellate(usize::MAX);
        assert_eq!(iter.samples_per_segment(), (usize::MAX - 1) / 2);
        assert_eq!(iter.len(), usize::MAX);
        assert_eq!(iter.next(), Some(Point3::ORIGIN));

        assert_eq!(Spline::new().tessellate(usize::MAX).len(), 1);
    }
}
