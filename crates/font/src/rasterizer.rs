//! Scanline glyph rasterizer.
//!
//! Converts glyph outlines to per-pixel ink coverage using:
//! - De Casteljau subdivision for quadratic Bézier flattening
//! - Several sub-scanlines per pixel row with exact horizontal span coverage
//! - The non-zero winding fill rule (overlapping strokes stay solid)

use crate::glyph::GlyphOutline;
use common::Vec2;

/// Sub-scanlines sampled per pixel row.
const SUBSAMPLES: usize = 5;

/// Maximum distance (in pixels) between a curve and its flattened polyline.
const FLATTEN_TOLERANCE: f32 = 0.1;

// ─────────────────────────────────────────────────────────────────────────────
// Bézier flattening
// ─────────────────────────────────────────────────────────────────────────────

/// Flatten a quadratic Bézier curve (p0, p1_control, p2) into line segments.
///
/// Uses recursive De Casteljau subdivision until the control point is within
/// `tolerance` pixels of the chord midpoint. Only the end points of the
/// produced segments are pushed; `p0` is assumed to be in `output` already.
pub fn flatten_quad_bezier(p0: Vec2, p1: Vec2, p2: Vec2, tolerance: f32, output: &mut Vec<Vec2>) {
    let d = p1 - p0.midpoint(p2);
    let dist_sq = d.x * d.x + d.y * d.y;

    if dist_sq <= tolerance * tolerance {
        output.push(p2);
    } else {
        let p01 = p0.midpoint(p1);
        let p12 = p1.midpoint(p2);
        let p012 = p01.midpoint(p12);

        flatten_quad_bezier(p0, p01, p012, tolerance, output);
        flatten_quad_bezier(p012, p12, p2, tolerance, output);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Outline → Edges
// ─────────────────────────────────────────────────────────────────────────────

/// A non-horizontal edge in bitmap coordinates, stored top to bottom.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
    /// +1 when the contour runs downward along this edge, -1 when upward.
    pub winding: i32,
}

impl Edge {
    fn new(a: Vec2, b: Vec2) -> Option<Self> {
        if (a.y - b.y).abs() <= f32::EPSILON {
            return None;
        }
        Some(if a.y < b.y {
            Edge { x0: a.x, y0: a.y, x1: b.x, y1: b.y, winding: 1 }
        } else {
            Edge { x0: b.x, y0: b.y, x1: a.x, y1: a.y, winding: -1 }
        })
    }

    #[inline]
    fn x_at(&self, y: f32) -> f32 {
        self.x0 + (y - self.y0) * (self.x1 - self.x0) / (self.y1 - self.y0)
    }
}

/// Convert a glyph outline to flattened edges in bitmap coordinates.
///
/// A font-unit point `(x, y)` lands on pixel position
/// `(origin.x + x * scale, origin.y - y * scale)`: `origin` is where the
/// glyph's baseline origin sits on the bitmap, and the y axis is flipped.
pub fn outline_to_edges(outline: &GlyphOutline, scale: f32, origin: Vec2) -> Vec<Edge> {
    let to_px = |x: i32, y: i32| Vec2::new(origin.x + x as f32 * scale, origin.y - y as f32 * scale);
    let mut edges = Vec::new();

    for contour in &outline.contours {
        let pts = &contour.points;
        let n = pts.len();
        if n < 2 {
            continue;
        }

        // Start at an on-curve point; an all-off-curve contour starts at the
        // implicit on-curve midpoint between its last and first points.
        let (start, order): (Vec2, Vec<usize>) = match pts.iter().position(|p| p.on_curve) {
            Some(s) => (to_px(pts[s].x, pts[s].y), (1..n).map(|k| (s + k) % n).collect()),
            None => {
                let last = to_px(pts[n - 1].x, pts[n - 1].y);
                (last.midpoint(to_px(pts[0].x, pts[0].y)), (0..n).collect())
            }
        };

        let mut polyline = vec![start];
        let mut current = start;
        let mut control: Option<Vec2> = None;

        for i in order {
            let p = to_px(pts[i].x, pts[i].y);
            if pts[i].on_curve {
                match control.take() {
                    Some(c) => flatten_quad_bezier(current, c, p, FLATTEN_TOLERANCE, &mut polyline),
                    None => polyline.push(p),
                }
                current = p;
            } else {
                // Two consecutive off-curve points imply an on-curve midpoint.
                if let Some(c) = control {
                    let mid = c.midpoint(p);
                    flatten_quad_bezier(current, c, mid, FLATTEN_TOLERANCE, &mut polyline);
                    current = mid;
                }
                control = Some(p);
            }
        }

        // Close the contour back to its start.
        match control {
            Some(c) => flatten_quad_bezier(current, c, start, FLATTEN_TOLERANCE, &mut polyline),
            None => polyline.push(start),
        }

        edges.extend(polyline.windows(2).filter_map(|w| Edge::new(w[0], w[1])));
    }

    edges
}

// ─────────────────────────────────────────────────────────────────────────────
// Coverage
// ─────────────────────────────────────────────────────────────────────────────

/// Add `weight` times the horizontal overlap of `[xa, xb)` to each pixel of a row.
fn add_span(row: &mut [f32], xa: f32, xb: f32, weight: f32) {
    let width = row.len() as f32;
    let (xa, xb) = (xa.clamp(0.0, width), xb.clamp(0.0, width));
    if xb <= xa {
        return;
    }

    let first = xa.floor() as usize;
    let last = (xb.ceil() as usize).min(row.len());
    for (col, px) in row.iter_mut().enumerate().take(last).skip(first) {
        let left = xa.max(col as f32);
        let right = xb.min(col as f32 + 1.0);
        *px += (right - left).max(0.0) * weight;
    }
}

/// Rasterize edges into a `width` × `height` grid of ink coverage.
///
/// Returns row-major coverage values in `0.0..=1.0`. Pixels outside the grid
/// are clipped.
pub fn rasterize_edges(edges: &[Edge], width: usize, height: usize) -> Vec<f32> {
    let mut coverage = vec![0.0f32; width * height];
    let weight = 1.0 / SUBSAMPLES as f32;
    let mut crossings: Vec<(f32, i32)> = Vec::new();

    for (row_idx, row) in coverage.chunks_mut(width.max(1)).enumerate().take(height) {
        for s in 0..SUBSAMPLES {
            let scan_y = row_idx as f32 + (s as f32 + 0.5) * weight;

            crossings.clear();
            crossings.extend(
                edges
                    .iter()
                    .filter(|e| scan_y >= e.y0 && scan_y < e.y1)
                    .map(|e| (e.x_at(scan_y), e.winding)),
            );
            crossings.sort_by(|a, b| a.0.total_cmp(&b.0));

            // Fill wherever the running winding number is non-zero
            let mut winding = 0;
            for pair in crossings.windows(2) {
                winding += pair[0].1;
                if winding != 0 {
                    add_span(row, pair[0].0, pair[1].0, weight);
                }
            }
        }
    }

    for c in &mut coverage {
        *c = c.min(1.0);
    }
    coverage
}

/// Rasterize an outline into a `width` × `height` coverage grid.
///
/// `scale` converts font units to pixels (`size_px / units_per_em`), and
/// `origin` is the pixel position of the glyph's baseline origin.
pub fn rasterize_outline(outline: &GlyphOutline, scale: f32, origin: Vec2, width: usize, height: usize) -> Vec<f32> {
    let edges = outline_to_edges(outline, scale, origin);
    rasterize_edges(&edges, width, height)
}

// ─────────────────────────────────────────────────────────────────────────────
// Pixel bounds
// ─────────────────────────────────────────────────────────────────────────────

/// An outline's control box scaled to whole pixels, y axis up.
///
/// `left`/`bottom` are floored and `right`/`top` are ceiled, so the box
/// always encloses every scaled point of the outline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PixelBounds {
    pub left: i32,
    pub bottom: i32,
    pub right: i32,
    pub top: i32,
}

impl PixelBounds {
    pub fn of(outline: &GlyphOutline, scale: f32) -> Self {
        PixelBounds {
            left: (outline.x_min as f32 * scale).floor() as i32,
            bottom: (outline.y_min as f32 * scale).floor() as i32,
            right: (outline.x_max as f32 * scale).ceil() as i32,
            top: (outline.y_max as f32 * scale).ceil() as i32,
        }
    }

    pub fn width(&self) -> i32 {
        self.right - self.left
    }

    pub fn height(&self) -> i32 {
        self.top - self.bottom
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyph::{Contour, OutlinePoint};

    fn on(x: i32, y: i32) -> OutlinePoint {
        OutlinePoint { x, y, on_curve: true }
    }

    fn off(x: i32, y: i32) -> OutlinePoint {
        OutlinePoint { x, y, on_curve: false }
    }

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32, clockwise: bool) -> Contour {
        let mut points = vec![on(x0, y0), on(x0, y1), on(x1, y1), on(x1, y0)];
        if !clockwise {
            points.reverse();
        }
        Contour { points }
    }

    #[test]
    fn flatten_quad_straight_line() {
        // Control point on the line → just the endpoint
        let mut output = Vec::new();
        flatten_quad_bezier(Vec2::new(0.0, 0.0), Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0), 0.5, &mut output);
        assert_eq!(output, vec![Vec2::new(10.0, 10.0)]);
    }

    #[test]
    fn flatten_quad_curved() {
        let mut output = Vec::new();
        let p2 = Vec2::new(100.0, 0.0);
        flatten_quad_bezier(Vec2::new(0.0, 0.0), Vec2::new(50.0, 100.0), p2, 0.5, &mut output);
        assert!(output.len() > 2);
        assert_eq!(*output.last().unwrap(), p2);
    }

    #[test]
    fn edges_are_flipped_and_oriented() {
        let outline = GlyphOutline::from_contours(vec![rect(0, 0, 10, 10, true)]);
        let edges = outline_to_edges(&outline, 1.0, Vec2::new(0.0, 10.0));
        // Two vertical edges survive; horizontal ones are dropped.
        assert_eq!(edges.len(), 2);
        for e in &edges {
            assert!(e.y0 < e.y1);
            assert_eq!((e.y0, e.y1), (0.0, 10.0));
        }
        assert_eq!(edges.iter().map(|e| e.winding).sum::<i32>(), 0);
    }

    #[test]
    fn rasterize_empty_outline() {
        let outline = GlyphOutline::from_contours(Vec::new());
        let cov = rasterize_outline(&outline, 1.0, Vec2::new(0.0, 0.0), 4, 4);
        assert_eq!(cov.len(), 16);
        assert!(cov.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn rasterize_pixel_aligned_square() {
        // 2×2 px square at pixels (1..3, 1..3) of a 4×4 grid
        let outline = GlyphOutline::from_contours(vec![rect(1, 1, 3, 3, true)]);
        let cov = rasterize_outline(&outline, 1.0, Vec2::new(0.0, 4.0), 4, 4);
        for y in 0..4 {
            for x in 0..4 {
                let inside = (1..3).contains(&x) && (1..3).contains(&y);
                let expected = if inside { 1.0 } else { 0.0 };
                assert!((cov[y * 4 + x] - expected).abs() < 1e-4, "pixel ({x},{y}) = {}", cov[y * 4 + x]);
            }
        }
    }

    #[test]
    fn rasterize_half_pixel_coverage() {
        // Square spanning half of column 0 horizontally
        let outline = GlyphOutline::from_contours(vec![rect(0, 0, 1, 2, true)]);
        let cov = rasterize_outline(&outline, 0.5, Vec2::new(0.0, 1.0), 2, 1);
        assert!((cov[0] - 0.5).abs() < 1e-4);
        assert_eq!(cov[1], 0.0);
    }

    #[test]
    fn nonzero_overlap_stays_solid() {
        // Two overlapping squares with the same orientation
        let outline = GlyphOutline::from_contours(vec![
            rect(0, 0, 3, 4, true),
            rect(1, 0, 4, 4, true),
        ]);
        let cov = rasterize_outline(&outline, 1.0, Vec2::new(0.0, 4.0), 4, 4);
        assert!(cov.iter().all(|&c| (c - 1.0).abs() < 1e-4));
    }

    #[test]
    fn counter_wound_hole_stays_empty() {
        let outline = GlyphOutline::from_contours(vec![
            rect(0, 0, 6, 6, true),
            rect(2, 2, 4, 4, false),
        ]);
        let cov = rasterize_outline(&outline, 1.0, Vec2::new(0.0, 6.0), 6, 6);
        assert_eq!(cov[2 * 6 + 2], 0.0);
        assert_eq!(cov[3 * 6 + 3], 0.0);
        assert!((cov[0] - 1.0).abs() < 1e-4);
        assert!((cov[5 * 6 + 5] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn clipping_outside_grid() {
        let outline = GlyphOutline::from_contours(vec![rect(-10, -10, 20, 20, true)]);
        let cov = rasterize_outline(&outline, 1.0, Vec2::new(0.0, 3.0), 3, 3);
        assert!(cov.iter().all(|&c| (c - 1.0).abs() < 1e-4));
    }

    #[test]
    fn all_off_curve_contour_is_closed() {
        // Four off-curve points approximate a diamond-ish circle around (5,5)
        let outline = GlyphOutline::from_contours(vec![Contour {
            points: vec![off(0, 0), off(0, 10), off(10, 10), off(10, 0)],
        }]);
        let edges = outline_to_edges(&outline, 1.0, Vec2::new(0.0, 10.0));
        assert!(!edges.is_empty());
        let cov = rasterize_edges(&edges, 10, 10);
        assert!(cov[5 * 10 + 5] > 0.99);
        assert!(cov[0] < 0.5);
    }

    #[test]
    fn pixel_bounds_rounding() {
        let outline = GlyphOutline::from_contours(vec![rect(-50, -220, 550, 780, true)]);
        let b = PixelBounds::of(&outline, 0.014);
        assert_eq!(b, PixelBounds { left: -1, bottom: -4, right: 8, top: 11 });
        assert_eq!((b.width(), b.height()), (9, 15));
    }
}
