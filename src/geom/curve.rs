use super::core::{Point3, Tolerance, Vec3};

pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn is_closed(&self) -> bool {
        false
    }

    #[must_use]
    fn derivative_at(&self, t: f64) -> Vec3 {
        let (a, b) = self.domain();
        let span = b - a;
        if !span.is_finite() || span == 0.0 {
            return Vec3::ZERO;
        }

        let h = Tolerance::DERIVATIVE.relative_to(span);
        if !h.is_finite() || h == 0.0 {
            return Vec3::ZERO;
        }

        let t0 = (t - h).max(a);
        let t1 = (t + h).min(b);
        if t1 == t0 {
            return Vec3::ZERO;
        }

        let p0 = self.point_at(t0);
        let p1 = self.point_at(t1);
        p1.sub_point(p0).mul_scalar(1.0 / (t1 - t0))
    }

    #[must_use]
    fn second_derivative_at(&self, t: f64) -> Vec3 {
        let (a, b) = self.domain();
        let span = b - a;
        if !span.is_finite() || span == 0.0 {
            return Vec3::ZERO;
        }

        let h = Tolerance::SECOND_DERIVATIVE.relative_to(span);
        if !h.is_finite() || h == 0.0 {
            return Vec3::ZERO;
        }

        let t0 = (t - h).max(a);
        let t2 = (t + h).min(b);
        if t2 == t0 {
            return Vec3::ZERO;
        }
        let tm = 0.5 * (t0 + t2);
        let dt = tm - t0;

        let p0 = self.point_at(t0);
        let p1 = self.point_at(tm);
        let p2 = self.point_at(t2);
        second_difference(p0, p1, p2).mul_scalar(1.0 / (dt * dt))
    }

    #[must_use]
    fn curvature_at(&self, t: f64) -> Option<f64> {
        let d1 = self.derivative_at(t);
        let d2 = self.second_derivative_at(t);
        let denom = d1.length();
        if denom <= 0.0 || !denom.is_finite() {
            return None;
        }
        let k = d1.cross(d2).length() / (denom * denom * denom);
        if k.is_finite() { Some(k) } else { None }
    }

    /// Returns the unit tangent vector at parameter `t`.
    /// Returns `None` if the derivative is zero or degenerate.
    #[must_use]
    fn tangent_at(&self, t: f64) -> Option<Vec3> {
        self.derivative_at(t).normalized()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    #[must_use]
    pub const fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn direction(self) -> Vec3 {
        self.end.sub_point(self.start)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.direction().length()
    }
}

impl Curve3 for Line3 {
    fn point_at(&self, t: f64) -> Point3 {
        self.start.add_vec(self.direction().mul_scalar(t))
    }

    fn derivative_at(&self, _t: f64) -> Vec3 {
        self.direction()
    }

    fn second_derivative_at(&self, _t: f64) -> Vec3 {
        Vec3::ZERO
    }
}

/// A single cubic Bezier segment.
///
/// Three equivalent evaluators are provided: [`Curve3::point_at`] uses the
/// Bernstein basis, [`CubicBezier3::point_at_polynomial`] the expanded power
/// basis and [`CubicBezier3::point_at_de_casteljau`] repeated interpolation.
/// They agree to within floating-point rounding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier3 {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
}

impl CubicBezier3 {
    #[must_use]
    pub const fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Builds a segment from four consecutive control points.
    #[must_use]
    pub const fn from_slice(points: &[Point3; 4]) -> Self {
        Self::new(points[0], points[1], points[2], points[3])
    }

    #[must_use]
    pub const fn control_points(&self) -> [Point3; 4] {
        [self.p0, self.p1, self.p2, self.p3]
    }

    /// Power-basis coefficients `[c1, c2, c3]` of
    /// `B(u) = p0 + c1 u + c2 u² + c3 u³`.
    #[must_use]
    pub fn polynomial_coefficients(&self) -> [Vec3; 3] {
        let (p0, p1, p2, p3) = (
            self.p0.to_vec3(),
            self.p1.to_vec3(),
            self.p2.to_vec3(),
            self.p3.to_vec3(),
        );
        let c1 = p1.sub(p0).mul_scalar(3.0);
        let c2 = p0.sub(p1.mul_scalar(2.0)).add(p2).mul_scalar(3.0);
        let c3 = p3.sub(p0).add(p1.sub(p2).mul_scalar(3.0));
        [c1, c2, c3]
    }

    #[must_use]
    pub fn point_at_polynomial(&self, t: f64) -> Point3 {
        let t = t.clamp(0.0, 1.0);
        let [c1, c2, c3] = self.polynomial_coefficients();
        let t2 = t * t;
        let t3 = t2 * t;
        self.p0
            .add_vec(c1.mul_scalar(t))
            .add_vec(c2.mul_scalar(t2))
            .add_vec(c3.mul_scalar(t3))
    }

    #[must_use]
    pub fn point_at_de_casteljau(&self, t: f64) -> Point3 {
        let t = t.clamp(0.0, 1.0);
        let a = self.p0.lerp(self.p1, t);
        let b = self.p1.lerp(self.p2, t);
        let c = self.p2.lerp(self.p3, t);
        let d = a.lerp(b, t);
        let e = b.lerp(c, t);
        d.lerp(e, t)
    }

    /// Splits the segment at `t` into two segments covering `[0, t]` and `[t, 1]`.
    #[must_use]
    pub fn split_at(&self, t: f64) -> (Self, Self) {
        let t = t.clamp(0.0, 1.0);
        let a = self.p0.lerp(self.p1, t);
        let b = self.p1.lerp(self.p2, t);
        let c = self.p2.lerp(self.p3, t);
        let d = a.lerp(b, t);
        let e = b.lerp(c, t);
        let mid = d.lerp(e, t);
        (Self::new(self.p0, a, d, mid), Self::new(mid, e, c, self.p3))
    }

    /// True when all four control points coincide within `tol`.
    #[must_use]
    pub fn is_degenerate(&self, tol: Tolerance) -> bool {
        tol.approx_eq_point3(self.p0, self.p1)
            && tol.approx_eq_point3(self.p0, self.p2)
            && tol.approx_eq_point3(self.p0, self.p3)
    }
}

impl Curve3 for CubicBezier3 {
    fn point_at(&self, t: f64) -> Point3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let u2 = u * u;
        let t2 = t * t;
        point_weighted_sum4(
            [self.p0, self.p1, self.p2, self.p3],
            [u2 * u, 3.0 * u2 * t, 3.0 * u * t2, t2 * t],
        )
    }

    fn derivative_at(&self, t: f64) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = self.p1.sub_point(self.p0);
        let b = self.p2.sub_point(self.p1);
        let c = self.p3.sub_point(self.p2);
        a.mul_scalar(3.0 * u * u)
            .add(b.mul_scalar(6.0 * u * t))
            .add(c.mul_scalar(3.0 * t * t))
    }

    fn second_derivative_at(&self, t: f64) -> Vec3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let a = second_difference(self.p0, self.p1, self.p2);
        let b = second_difference(self.p1, self.p2, self.p3);
        a.mul_scalar(6.0 * u).add(b.mul_scalar(6.0 * t))
    }
}

/// Result of sampling a curve at a parameter.
#[derive(Debug, Clone, Copy)]
pub struct CurveSample {
    /// The point on the curve at the given parameter.
    pub point: Point3,
    /// Unit tangent at the parameter, or zero where the curve is degenerate.
    pub tangent: Vec3,
    /// The (clamped) parameter the sample was taken at.
    pub parameter: f64,
}

/// Samples a curve at `t`, clamped to the curve domain.
#[must_use]
pub fn sample_curve_at<C: Curve3>(curve: &C, t: f64) -> CurveSample {
    let (t0, t1) = curve.domain();
    let param = t.clamp(t0, t1);
    CurveSample {
        point: curve.point_at(param),
        tangent: curve.tangent_at(param).unwrap_or(Vec3::ZERO),
        parameter: param,
    }
}

/// Approximate arc length from `samples` chords, evenly spaced in parameter.
#[must_use]
pub fn curve_arc_length<C: Curve3>(curve: &C, samples: usize) -> f64 {
    let samples = samples.max(1);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;
    if !span.is_finite() || span == 0.0 {
        return 0.0;
    }

    let mut length = 0.0;
    let mut prev = curve.point_at(t0);
    for i in 1..=samples {
        let t = t0 + span * (i as f64 / samples as f64);
        let curr = curve.point_at(t);
        length += curr.sub_point(prev).length();
        prev = curr;
    }
    length
}

/// Samples `steps + 1` points evenly spaced in parameter (`steps` for closed curves).
#[must_use]
pub fn tessellate_curve_uniform(curve: &impl Curve3, steps: usize) -> Vec<Point3> {
    let steps = steps.max(1);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;
    if !span.is_finite() || span == 0.0 {
        return vec![curve.point_at(t0)];
    }

    let count = if curve.is_closed() { steps } else { steps + 1 };
    (0..count)
        .map(|i| {
            if i == steps {
                t1
            } else {
                t0 + span * (i as f64 / steps as f64)
            }
        })
        .map(|t| curve.point_at(t))
        .collect()
}

fn point_weighted_sum4(points: [Point3; 4], weights: [f64; 4]) -> Point3 {
    let [p0, p1, p2, p3] = points;
    let [w0, w1, w2, w3] = weights;
    Point3::new(
        p0.x * w0 + p1.x * w1 + p2.x * w2 + p3.x * w3,
        p0.y * w0 + p1.y * w1 + p2.y * w2 + p3.y * w3,
        p0.z * w0 + p1.z * w1 + p2.z * w2 + p3.z * w3,
    )
}

pub(crate) fn second_difference(p0: Point3, p1: Point3, p2: Point3) -> Vec3 {
    Vec3::new(
        p0.x - 2.0 * p1.x + p2.x,
        p0.y - 2.0 * p1.y + p2.y,
        p0.z - 2.0 * p1.z + p2.z,
    )
}
