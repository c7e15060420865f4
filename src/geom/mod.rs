mod core;
mod curve;
mod spline;

pub use core::{BBox, Point3, Tolerance, Vec3};
pub use curve::{
    CubicBezier3, Curve3, CurveSample, Line3, curve_arc_length, sample_curve_at,
    tessellate_curve_uniform,
};
pub use spline::{
    BezierBasis, ParameterPolicy, SegmentCountDiagnostics, Spline, SplineError, SplineOptions,
    Tessellation, evaluate_segment,
};
