#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;

use std::fmt;

use geom::{Point3, Spline};
use serde::Serialize;
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Largest segment count a host session may request.
pub const MAX_SEGMENTS: usize = 1024;

/// Largest per-segment sample count used for host geometry export.
pub const MAX_SAMPLES_PER_SEGMENT: usize = 1024;

/// Renderable primitives handed to the host.
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum GeometryItem {
    Point { coordinates: [f64; 3] },
    Line { start: [f64; 3], end: [f64; 3] },
    Polyline { points: Vec<[f64; 3]> },
}

/// Builds the display list for a spline: anchors, handle lines, the sampled
/// curve and the tracking point, in that order.
///
/// `tracking` is a normalized parameter in `[0, 1]`. Sample counts above
/// [`MAX_SAMPLES_PER_SEGMENT`] are capped.
#[must_use]
pub fn collect_geometry_items(
    spline: &Spline,
    tracking: f64,
    samples_per_segment: usize,
) -> Vec<GeometryItem> {
    let anchors = spline.points().iter().step_by(3);
    let mut items: Vec<GeometryItem> = anchors
        .map(|p| GeometryItem::Point {
            coordinates: p.to_array(),
        })
        .collect();

    items.extend(spline.handle_lines().into_iter().map(|line| GeometryItem::Line {
        start: line.start.to_array(),
        end: line.end.to_array(),
    }));

    if !spline.is_empty() {
        items.push(GeometryItem::Polyline {
            points: spline
                .tessellate(samples_per_segment.min(MAX_SAMPLES_PER_SEGMENT))
                .map(Point3::to_array)
                .collect(),
        });
    }

    items.push(GeometryItem::Point {
        coordinates: tracking_point(spline, tracking).to_array(),
    });
    items
}

fn tracking_point(spline: &Spline, tracking: f64) -> Point3 {
    let t = tracking.clamp(0.0, 1.0) * spline.segment_count() as f64;
    spline.evaluate(t).unwrap_or(spline.open_end())
}

/// Interactive spline editing session for browser hosts.
#[wasm_bindgen]
pub struct SplineEditor {
    spline: Spline,
    tracking: f64,
}

#[wasm_bindgen]
impl SplineEditor {
    /// Starts with one straight segment along +X so there is something to draw.
    #[wasm_bindgen(constructor)]
    pub fn new() -> SplineEditor {
        let mut spline = Spline::new();
        spline.add_segment();
        for (index, x) in [(1, 1.0), (2, 2.0), (3, 3.0)] {
            if let Err(err) = spline.set_point(index, Point3::new(x, 0.0, 0.0)) {
                log::warn!("could not seed default spline: {err}");
            }
        }
        SplineEditor {
            spline,
            tracking: 0.0,
        }
    }

    #[wasm_bindgen]
    pub fn segment_count(&self) -> usize {
        self.spline.segment_count()
    }

    #[wasm_bindgen]
    pub fn point_count(&self) -> usize {
        self.spline.point_count()
    }

    /// Requests above [`MAX_SEGMENTS`] are capped. Returns the resulting count.
    #[wasm_bindgen]
    pub fn set_segment_count(&mut self, count: usize) -> usize {
        let diagnostics = self.spline.set_segment_count(count.min(MAX_SEGMENTS));
        debug_log!(
            "segment count {} -> {}",
            diagnostics.previous,
            diagnostics.current
        );
        diagnostics.current
    }

    /// Returns the index of the new segment, or `None` at [`MAX_SEGMENTS`].
    #[wasm_bindgen]
    pub fn add_segment(&mut self) -> Option<usize> {
        if self.spline.segment_count() >= MAX_SEGMENTS {
            return None;
        }
        Some(self.spline.add_segment())
    }

    #[wasm_bindgen]
    pub fn remove_segment(&mut self) -> bool {
        self.spline.remove_segment()
    }

    #[wasm_bindgen]
    pub fn set_point(&mut self, index: usize, x: f64, y: f64, z: f64) -> Result<(), JsValue> {
        self.spline
            .set_point(index, Point3::new(x, y, z))
            .map_err(to_js_error)
    }

    /// Sets the normalized tracking parameter, clamped to `[0, 1]`.
    #[wasm_bindgen]
    pub fn set_tracking_parameter(&mut self, u: f64) -> Result<(), JsValue> {
        if !u.is_finite() {
            return Err(js_error("tracking parameter must be finite"));
        }
        self.tracking = u.clamp(0.0, 1.0);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn tracking_parameter(&self) -> f64 {
        self.tracking
    }

    /// Tracking point as `[x, y, z]`.
    #[wasm_bindgen]
    pub fn tracking_point(&self) -> Vec<f64> {
        tracking_point(&self.spline, self.tracking).to_array().to_vec()
    }

    /// Control points flattened as `[x0, y0, z0, x1, ...]`.
    #[wasm_bindgen]
    pub fn get_points(&self) -> Vec<f64> {
        self.spline
            .points()
            .iter()
            .flat_map(|p| p.to_array())
            .collect()
    }

    #[wasm_bindgen]
    pub fn get_geometry(&self, samples_per_segment: usize) -> Result<JsValue, JsValue> {
        let items = collect_geometry_items(&self.spline, self.tracking, samples_per_segment);
        serde_wasm_bindgen::to_value(&items).map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl Default for SplineEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl SplineEditor {
    /// The edited spline.
    #[must_use]
    pub fn spline(&self) -> &Spline {
        &self.spline
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}

#[cfg(test)]
mod tests {
    use super::{
        GeometryItem, MAX_SAMPLES_PER_SEGMENT, MAX_SEGMENTS, SplineEditor, collect_geometry_items,
    };
    use crate::geom::{Point3, Spline};

    #[test]
    fn geometry_lists_anchors_handles_curve_and_tracker() {
        let editor = SplineEditor::new();
        let items = collect_geometry_items(editor.spline(), 0.5, 4);

        assert_eq!(items.len(), 2 + 2 + 1 + 1);
        assert_eq!(items[0], GeometryItem::Point { coordinates: [0.0, 0.0, 0.0] });
        assert_eq!(items[1], GeometryItem::Point { coordinates: [3.0, 0.0, 0.0] });
        assert!(matches!(items[2], GeometryItem::Line { .. }));
        match &items[4] {
            GeometryItem::Polyline { points } => {
                assert_eq!(points.len(), 5);
                assert_eq!(points[4], [3.0, 0.0, 0.0]);
            }
            other => panic!("expected Polyline, got {other:?}"),
        }
        match &items[5] {
            GeometryItem::Point { coordinates } => {
                assert!((coordinates[0] - 1.5).abs() < 1e-12);
            }
            other => panic!("expected Point, got {other:?}"),
        }
    }

    #[test]
    fn empty_spline_has_no_polyline() {
        let spline = Spline::with_start(Point3::new(1.0, 1.0, 1.0));
        let items = collect_geometry_items(&spline, 0.7, 8);
        assert_eq!(
            items,
            vec![
                GeometryItem::Point { coordinates: [1.0, 1.0, 1.0] },
                GeometryItem::Point { coordinates: [1.0, 1.0, 1.0] },
            ]
        );
    }

    #[test]
    fn editor_tracks_normalized_parameter() {
        let mut editor = SplineEditor::new();
        assert_eq!(editor.add_segment(), Some(1));
        assert!(editor.set_point(6, 6.0, 0.0, 0.0).is_ok());
        assert!(editor.set_point(99, 0.0, 0.0, 0.0).is_err());

        assert!(editor.set_tracking_parameter(2.0).is_ok());
        assert_eq!(editor.tracking_parameter(), 1.0);
        assert_eq!(editor.tracking_point(), vec![6.0, 0.0, 0.0]);
        assert!(editor.set_tracking_parameter(f64::NAN).is_err());

        assert_eq!(editor.set_segment_count(0), 0);
        assert_eq!(editor.get_points(), vec![6.0, 0.0, 0.0]);
        assert!(!editor.remove_segment());
        assert_eq!(editor.tracking_point(), vec![6.0, 0.0, 0.0]);
    }

    #[test]
    fn editor_caps_segment_count() {
        let mut editor = SplineEditor::new();
        assert_eq!(editor.set_segment_count(usize::MAX), MAX_SEGMENTS);
        assert_eq!(editor.point_count(), 1 + 3 * MAX_SEGMENTS);
        assert_eq!(editor.add_segment(), None);
        assert_eq!(editor.segment_count(), MAX_SEGMENTS);

        assert_eq!(editor.set_segment_count(2), 2);
        assert_eq!(editor.add_segment(), Some(2));
    }

    #[test]
    fn geometry_export_caps_sample_count() {
        let editor = SplineEditor::new();
        let items = collect_geometry_items(editor.spline(), 0.0, usize::MAX);
        let polyline = items
            .iter()
            .find_map(|item| match item {
                GeometryItem::Polyline { points } => Some(points.len()),
                _ => None,
            })
            .unwrap();
        assert_eq!(polyline, MAX_SAMPLES_PER_SEGMENT + 1);
    }
}
