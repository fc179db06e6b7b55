//! Glyph outline parsing from the `glyf` table.
//!
//! Handles both simple glyphs (contour points) and composite glyphs
//! (references to other glyphs with transforms).

use common::{Cursor, ParseError};

// ─────────────────────────────────────────────────────────────────────────────
// OutlinePoint / Contour / GlyphOutline
// ─────────────────────────────────────────────────────────────────────────────

/// A single point in a glyph outline, in font units (y axis up).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlinePoint {
    pub x: i32,
    pub y: i32,
    pub on_curve: bool,
}

/// A closed contour (sequence of points).
#[derive(Clone, Debug, PartialEq)]
pub struct Contour {
    pub points: Vec<OutlinePoint>,
}

/// A glyph outline consisting of contours, with its control box.
#[derive(Clone, Debug, PartialEq)]
pub struct GlyphOutline {
    pub contours: Vec<Contour>,
    pub x_min: i32,
    pub y_min: i32,
    pub x_max: i32,
    pub y_max: i32,
}

impl GlyphOutline {
    /// Build an outline and compute its control box from the points.
    ///
    /// An outline without points gets an all-zero box.
    pub fn from_contours(contours: Vec<Contour>) -> Self {
        let mut pts = contours.iter().flat_map(|c| c.points.iter());
        let Some(first) = pts.next() else {
            return Self { contours, x_min: 0, y_min: 0, x_max: 0, y_max: 0 };
        };

        let (mut x_min, mut y_min, mut x_max, mut y_max) = (first.x, first.y, first.x, first.y);
        for p in pts {
            x_min = x_min.min(p.x);
            y_min = y_min.min(p.y);
            x_max = x_max.max(p.x);
            y_max = y_max.max(p.y);
        }
        Self { contours, x_min, y_min, x_max, y_max }
    }

    pub fn is_empty(&self) -> bool {
        self.contours.iter().all(|c| c.points.is_empty())
    }

    /// Apply a composite component's transform and offset to every point.
    pub fn transformed(&self, comp: &CompositeComponent) -> Self {
        let contours = self
            .contours
            .iter()
            .map(|c| Contour {
                points: c.points.iter().map(|p| comp.apply(*p)).collect(),
            })
            .collect();
        Self::from_contours(contours)
    }

    /// Append another outline's contours (used when flattening composites).
    pub fn merge(self, other: Self) -> Self {
        let mut contours = self.contours;
        contours.extend(other.contours);
        Self::from_contours(contours)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// CompositeComponent
// ─────────────────────────────────────────────────────────────────────────────

/// A component of a composite glyph.
#[derive(Clone, Copy, Debug)]
pub struct CompositeComponent {
    pub glyph_id: u16,
    pub dx: i16,
    pub dy: i16,
    /// 2×2 transform. Default is identity (1.0, 0.0, 0.0, 1.0).
    pub scale_x: f32,
    pub scale_01: f32,
    pub scale_10: f32,
    pub scale_y: f32,
}

impl CompositeComponent {
    fn identity(glyph_id: u16, dx: i16, dy: i16) -> Self {
        Self {
            glyph_id, dx, dy,
            scale_x: 1.0, scale_01: 0.0,
            scale_10: 0.0, scale_y: 1.0,
        }
    }

    /// Map a component point into the composite's coordinate space.
    pub fn apply(&self, p: OutlinePoint) -> OutlinePoint {
        let (x, y) = (p.x as f32, p.y as f32);
        OutlinePoint {
            x: (self.scale_x * x + self.scale_10 * y).round() as i32 + self.dx as i32,
            y: (self.scale_01 * x + self.scale_y * y).round() as i32 + self.dy as i32,
            on_curve: p.on_curve,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// GlyphDesc
// ─────────────────────────────────────────────────────────────────────────────

/// Description of a glyph: empty, simple outline, or composite.
#[derive(Clone, Debug)]
pub enum GlyphDesc {
    /// Glyph has no outline (e.g., space character).
    Empty,
    /// Simple glyph with contour data.
    Simple(GlyphOutline),
    /// Composite glyph referencing other glyphs.
    Composite(Vec<CompositeComponent>),
}

// ─────────────────────────────────────────────────────────────────────────────
// Simple glyph flag bits
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) const ON_CURVE_POINT: u8 = 0x01;
const X_SHORT_VECTOR: u8 = 0x02;
const Y_SHORT_VECTOR: u8 = 0x04;
const REPEAT_FLAG: u8 = 0x08;
const X_IS_SAME_OR_POSITIVE_SHORT: u8 = 0x10;
const Y_IS_SAME_OR_POSITIVE_SHORT: u8 = 0x20;

// Composite glyph flags
const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
const ARGS_ARE_XY_VALUES: u16 = 0x0002;
const WE_HAVE_A_SCALE: u16 = 0x0008;
const MORE_COMPONENTS: u16 = 0x0020;
const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

// ─────────────────────────────────────────────────────────────────────────────
// Parsing
// ─────────────────────────────────────────────────────────────────────────────

/// Parse a glyph from the `glyf` table at the given byte range.
///
/// `data` should be the slice of glyf data for this specific glyph
/// (determined via the `loca` table offsets).
pub fn parse_glyph(data: &[u8]) -> Result<GlyphDesc, ParseError> {
    if data.is_empty() {
        return Ok(GlyphDesc::Empty);
    }

    let mut c = Cursor::new(data);
    let num_contours = c.i16()?;
    c.skip(8)?; // header bbox; recomputed from the points

    if num_contours >= 0 {
        parse_simple_glyph(&mut c, num_contours as u16)
    } else {
        parse_composite_glyph(&mut c)
    }
}

/// Read one coordinate delta according to the short/same flag pair.
fn read_delta(c: &mut Cursor<'_>, flag: u8, short: u8, same_or_positive: u8) -> Result<i32, ParseError> {
    Ok(if flag & short != 0 {
        let d = c.u8()? as i32;
        if flag & same_or_positive != 0 { d } else { -d }
    } else if flag & same_or_positive != 0 {
        0
    } else {
        c.i16()? as i32
    })
}

fn parse_simple_glyph(c: &mut Cursor<'_>, num_contours: u16) -> Result<GlyphDesc, ParseError> {
    if num_contours == 0 {
        return Ok(GlyphDesc::Empty);
    }

    let mut end_pts = Vec::with_capacity(num_contours as usize);
    for _ in 0..num_contours {
        end_pts.push(c.u16()?);
    }
    if end_pts.windows(2).any(|w| w[1] < w[0]) {
        return Err(ParseError::InvalidValue("contour end points are not increasing"));
    }

    let num_points = end_pts.last().map_or(0, |&e| e as usize + 1);

    // Skip instructions
    let instruction_len = c.u16()? as usize;
    c.skip(instruction_len)?;

    let mut flags = Vec::with_capacity(num_points);
    while flags.len() < num_points {
        let flag = c.u8()?;
        flags.push(flag);
        if flag & REPEAT_FLAG != 0 {
            let repeat_count = c.u8()? as usize;
            for _ in 0..repeat_count.min(num_points - flags.len()) {
                flags.push(flag);
            }
        }
    }

    let mut x_coords = Vec::with_capacity(num_points);
    let mut x: i32 = 0;
    for &flag in &flags {
        x += read_delta(c, flag, X_SHORT_VECTOR, X_IS_SAME_OR_POSITIVE_SHORT)?;
        x_coords.push(x);
    }

    let mut y_coords = Vec::with_capacity(num_points);
    let mut y: i32 = 0;
    for &flag in &flags {
        y += read_delta(c, flag, Y_SHORT_VECTOR, Y_IS_SAME_OR_POSITIVE_SHORT)?;
        y_coords.push(y);
    }

    let mut contours = Vec::with_capacity(num_contours as usize);
    let mut start = 0usize;
    for &end in &end_pts {
        let end = end as usize;
        let points = (start..=end)
            .map(|j| OutlinePoint {
                x: x_coords[j],
                y: y_coords[j],
                on_curve: flags[j] & ON_CURVE_POINT != 0,
            })
            .collect();
        contours.push(Contour { points });
        start = end + 1;
    }

    Ok(GlyphDesc::Simple(GlyphOutline::from_contours(contours)))
}

fn parse_composite_glyph(c: &mut Cursor<'_>) -> Result<GlyphDesc, ParseError> {
    let mut components = Vec::new();

    loop {
        let flags = c.u16()?;
        let glyph_id = c.u16()?;

        let (arg1, arg2) = if flags & ARG_1_AND_2_ARE_WORDS != 0 {
            (c.i16()?, c.i16()?)
        } else {
            (c.i8()? as i16, c.i8()? as i16)
        };

        // Point-matching placement is rare in CJK fonts; such components
        // keep their own origin.
        let (dx, dy) = if flags & ARGS_ARE_XY_VALUES != 0 { (arg1, arg2) } else { (0, 0) };

        let mut comp = CompositeComponent::identity(glyph_id, dx, dy);

        if flags & WE_HAVE_A_SCALE != 0 {
            let scale = c.f2dot14()?;
            comp.scale_x = scale;
            comp.scale_y = scale;
        } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
            comp.scale_x = c.f2dot14()?;
            comp.scale_y = c.f2dot14()?;
        } else if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
            comp.scale_x = c.f2dot14()?;
            comp.scale_01 = c.f2dot14()?;
            comp.scale_10 = c.f2dot14()?;
            comp.scale_y = c.f2dot14()?;
        }

        components.push(comp);

        if flags & MORE_COMPONENTS == 0 {
            break;
        }
    }

    Ok(GlyphDesc::Composite(components))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(x: i32, y: i32) -> OutlinePoint {
        OutlinePoint { x, y, on_curve: true }
    }

    #[test]
    fn empty_glyph() {
        let result = parse_glyph(&[]);
        assert!(matches!(result, Ok(GlyphDesc::Empty)));
    }

    #[test]
    fn composite_component_identity() {
        let c = CompositeComponent::identity(42, 10, 20);
        assert_eq!(c.glyph_id, 42);
        assert_eq!(c.apply(pt(5, 7)), pt(15, 27));
    }

    #[test]
    fn composite_component_two_by_two() {
        // 90° rotation: x' = -y, y' = x
        let c = CompositeComponent {
            scale_x: 0.0, scale_01: 1.0, scale_10: -1.0, scale_y: 0.0,
            ..CompositeComponent::identity(1, 0, 0)
        };
        assert_eq!(c.apply(pt(3, 4)), pt(-4, 3));
    }

    #[test]
    fn outline_bounds_from_points() {
        let outline = GlyphOutline::from_contours(vec![
            Contour { points: vec![pt(10, -5), pt(40, 0)] },
            Contour { points: vec![pt(-2, 90)] },
        ]);
        assert_eq!((outline.x_min, outline.y_min, outline.x_max, outline.y_max), (-2, -5, 40, 90));
        assert!(!outline.is_empty());
        assert!(GlyphOutline::from_contours(Vec::new()).is_empty());
    }

    #[test]
    fn simple_glyph_triangle() {
        // 1 contour, 3 on-curve points forming a triangle: (0,0), (500,0), (250,500)
        let mut data = Vec::new();
        data.extend_from_slice(&1i16.to_be_bytes());
        for v in [0i16, 0, 500, 500] {
            data.extend_from_slice(&v.to_be_bytes());
        }
        data.extend_from_slice(&2u16.to_be_bytes()); // endPtsOfContours[0]
        data.extend_from_slice(&0u16.to_be_bytes()); // instructionLength
        data.push(ON_CURVE_POINT | X_IS_SAME_OR_POSITIVE_SHORT | Y_IS_SAME_OR_POSITIVE_SHORT);
        data.push(ON_CURVE_POINT | Y_IS_SAME_OR_POSITIVE_SHORT);
        data.push(ON_CURVE_POINT);
        data.extend_from_slice(&500i16.to_be_bytes());
        data.extend_from_slice(&(-250i16).to_be_bytes());
        data.extend_from_slice(&500i16.to_be_bytes());

        match parse_glyph(&data).unwrap() {
            GlyphDesc::Simple(outline) => {
                assert_eq!(outline.contours.len(), 1);
                assert_eq!(outline.contours[0].points, vec![pt(0, 0), pt(500, 0), pt(250, 500)]);
                assert_eq!(outline.x_max, 500);
            }
            other => panic!("expected Simple glyph, got {other:?}"),
        }
    }

    #[test]
    fn simple_glyph_short_vectors_and_repeat() {
        // 4 points, one flag repeated: square of side 100 from short deltas
        let mut data = Vec::new();
        data.extend_from_slice(&1i16.to_be_bytes());
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&3u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        // p0 (0,0): both same
        data.push(ON_CURVE_POINT | X_IS_SAME_OR_POSITIVE_SHORT | Y_IS_SAME_OR_POSITIVE_SHORT);
        // p1 (+100, 0)
        data.push(ON_CURVE_POINT | X_SHORT_VECTOR | X_IS_SAME_OR_POSITIVE_SHORT | Y_IS_SAME_OR_POSITIVE_SHORT);
        // p2 (0, +100), p3 (-100, 0): encode p2 then p3 separately
        data.push(ON_CURVE_POINT | X_IS_SAME_OR_POSITIVE_SHORT | Y_SHORT_VECTOR | Y_IS_SAME_OR_POSITIVE_SHORT);
        data.push(ON_CURVE_POINT | X_SHORT_VECTOR | Y_IS_SAME_OR_POSITIVE_SHORT | REPEAT_FLAG);
        data.push(0); // repeat zero times
        data.push(100); // x p1
        data.push(100); // x p3 (negative short)
        data.push(100); // y p2

        match parse_glyph(&data).unwrap() {
            GlyphDesc::Simple(outline) => {
                assert_eq!(
                    outline.contours[0].points,
                    vec![pt(0, 0), pt(100, 0), pt(100, 100), pt(0, 100)]
                );
            }
            other => panic!("expected Simple glyph, got {other:?}"),
        }
    }

    #[test]
    fn simple_glyph_rejects_decreasing_end_points() {
        let mut data = Vec::new();
        data.extend_from_slice(&2i16.to_be_bytes());
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&5u16.to_be_bytes());
        data.extend_from_slice(&2u16.to_be_bytes());
        assert!(parse_glyph(&data).is_err());
    }

    #[test]
    fn truncated_glyph_is_an_error() {
        let mut data = Vec::new();
        data.extend_from_slice(&1i16.to_be_bytes());
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&10u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.push(ON_CURVE_POINT);
        assert_eq!(parse_glyph(&data).err(), Some(ParseError::UnexpectedEof));
    }

    #[test]
    fn composite_glyph_components() {
        let mut data = Vec::new();
        data.extend_from_slice(&(-1i16).to_be_bytes());
        data.extend_from_slice(&[0; 8]);
        // component 1: words, xy values, uniform scale 0.5, more follow
        let flags = ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES | WE_HAVE_A_SCALE | MORE_COMPONENTS;
        data.extend_from_slice(&flags.to_be_bytes());
        data.extend_from_slice(&3u16.to_be_bytes());
        data.extend_from_slice(&300i16.to_be_bytes());
        data.extend_from_slice(&(-20i16).to_be_bytes());
        data.extend_from_slice(&0x2000i16.to_be_bytes());
        // component 2: byte args, xy values, last
        data.extend_from_slice(&ARGS_ARE_XY_VALUES.to_be_bytes());
        data.extend_from_slice(&4u16.to_be_bytes());
        data.push(0xF6); // -10
        data.push(5);

        match parse_glyph(&data).unwrap() {
            GlyphDesc::Composite(comps) => {
                assert_eq!(comps.len(), 2);
                assert_eq!((comps[0].glyph_id, comps[0].dx, comps[0].dy), (3, 300, -20));
                assert_eq!(comps[0].scale_x, 0.5);
                assert_eq!(comps[0].scale_y, 0.5);
                assert_eq!((comps[1].glyph_id, comps[1].dx, comps[1].dy), (4, -10, 5));
                assert_eq!(comps[1].scale_x, 1.0);
            }
            other => panic!("expected Composite glyph, got {other:?}"),
        }
    }
}
