use kurbo::{PathEl, Shape as _, SvgArc};

use crate::foundation::core::{Affine, BezPath, CENTER, Point, Rect, VIEW_SIZE, Vec2, view_rect};

/// Number of straight segments used to approximate each semicircular arc of a lens.
pub const LENS_STEPS: usize = 90;

/// Luminance a mask shape paints with: white reveals content, black hides it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskPaint {
    Reveal,
    Hide,
}

impl MaskPaint {
    pub fn svg_fill(self) -> &'static str {
        match self {
            Self::Reveal => "white",
            Self::Hide => "black",
        }
    }
}

/// Which half of the circle a semicircular arc sweeps through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfSide {
    /// `x >= 0`: sweeps from -90° through 0° to +90°.
    Right,
    /// `x <= 0`: sweeps from +90° through 180° to +270°.
    Left,
}

impl HalfSide {
    fn start_angle(self) -> f64 {
        match self {
            Self::Right => -std::f64::consts::FRAC_PI_2,
            Self::Left => std::f64::consts::FRAC_PI_2,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Self::Right => Self::Left,
            Self::Left => Self::Right,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MaskShape {
    Rect {
        rect: Rect,
        paint: MaskPaint,
    },
    Path {
        path: BezPath,
        paint: MaskPaint,
    },
    /// Region enclosed by two circular arcs of equal `radius` joining `from` and `to`.
    Lens {
        from: Point,
        to: Point,
        radius: f64,
        paint: MaskPaint,
    },
}

impl MaskShape {
    pub fn paint(&self) -> MaskPaint {
        match self {
            Self::Rect { paint, .. } | Self::Path { paint, .. } | Self::Lens { paint, .. } => {
                *paint
            }
        }
    }

    /// The shape's outline as a path, with arcs flattened to cubic segments.
    pub fn outline(&self, tolerance: f64) -> BezPath {
        match self {
            Self::Rect { rect, .. } => rect.to_path(tolerance),
            Self::Path { path, .. } => path.clone(),
            Self::Lens {
                from, to, radius, ..
            } => {
                let mut path = BezPath::new();
                path.move_to(*from);
                append_svg_arc(&mut path, *from, *to, *radius, tolerance);
                append_svg_arc(&mut path, *to, *from, *radius, tolerance);
                path.close_path();
                path
            }
        }
    }
}

fn append_svg_arc(path: &mut BezPath, from: Point, to: Point, radius: f64, tolerance: f64) {
    let arc = SvgArc {
        from,
        to,
        radii: Vec2::new(radius, radius),
        x_rotation: 0.0,
        large_arc: false,
        sweep: true,
    };
    match kurbo::Arc::from_svg_arc(&arc) {
        Some(arc) => path.extend(arc.append_iter(tolerance)),
        None => path.push(PathEl::LineTo(to)),
    }
}

/// Shapes drawn inside one coordinate frame of a mask.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaskLayer {
    pub transform: Affine,
    pub shapes: Vec<MaskShape>,
}

/// A mask over the full view: a black background (everything hidden) followed by layers of
/// shapes that reveal or re-hide parts of it, painted in order.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaskRegion {
    pub background: Rect,
    pub layers: Vec<MaskLayer>,
}

impl MaskRegion {
    /// A mask that hides the whole view.
    pub fn hidden() -> Self {
        Self {
            background: view_rect(),
            layers: Vec::new(),
        }
    }

    pub fn shapes(&self) -> impl Iterator<Item = (&Affine, &MaskShape)> {
        self.layers
            .iter()
            .flat_map(|l| l.shapes.iter().map(move |s| (&l.transform, s)))
    }

    pub fn reveals_nothing(&self) -> bool {
        self.shapes().all(|(_, s)| s.paint() == MaskPaint::Hide)
    }
}

/// Describes one half-plane-plus-lens mask.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaskSpec {
    pub is_left_side: bool,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub delta_offset: f64,
    pub rotation_degrees: f64,
}

/// Closed semicircular band used for the lens cut-outs.
///
/// The outer arc is centered at `(0, y_offset)` and traced forward over `steps` segments; the
/// inner arc stays centered at the origin and is traced back, then the path closes.
pub fn semicircle_lens_path(
    y_offset: f64,
    inner_radius: f64,
    outer_radius: f64,
    side: HalfSide,
) -> BezPath {
    let start = side.start_angle();
    let theta = |i: usize| start + i as f64 * std::f64::consts::PI / LENS_STEPS as f64;

    let mut path = BezPath::new();
    for i in 0..=LENS_STEPS {
        let t = theta(i);
        let p = Point::new(outer_radius * t.cos(), y_offset + outer_radius * t.sin());
        if i == 0 {
            path.move_to(p);
        } else {
            path.line_to(p);
        }
    }
    for i in (0..=LENS_STEPS).rev() {
        let t = theta(i);
        path.line_to(Point::new(inner_radius * t.cos(), inner_radius * t.sin()));
    }
    path.close_path();
    path
}

/// Mask revealing one side of the view, reshaped along the seam by two lenses.
///
/// Inside a frame translated to the view center and rotated by `rotation_degrees`:
/// - a white half-plane covers `x <= 0` (left side) or `x >= 0` (right side),
/// - a white lens offset by `∓delta_offset` bulges across the seam into the other side,
/// - a black lens offset by `±delta_offset` bites back into this side.
///
/// Toggling `is_left_side` and negating `delta_offset` mirrors the mask about the vertical axis.
/// Non-positive radii are accepted and simply collapse the lenses.
pub fn build_half_plane_lens_mask(spec: &MaskSpec) -> MaskRegion {
    let MaskSpec {
        is_left_side,
        inner_radius,
        outer_radius,
        delta_offset,
        rotation_degrees,
    } = *spec;

    let half_plane = if is_left_side {
        Rect::new(-VIEW_SIZE, -VIEW_SIZE, 0.0, VIEW_SIZE)
    } else {
        Rect::new(0.0, -VIEW_SIZE, VIEW_SIZE, VIEW_SIZE)
    };

    let (reveal_offset, reveal_side) = if is_left_side {
        (-delta_offset, HalfSide::Right)
    } else {
        (delta_offset, HalfSide::Left)
    };

    let shapes = vec![
        MaskShape::Rect {
            rect: half_plane,
            paint: MaskPaint::Reveal,
        },
        MaskShape::Path {
            path: semicircle_lens_path(reveal_offset, inner_radius, outer_radius, reveal_side),
            paint: MaskPaint::Reveal,
        },
        MaskShape::Path {
            path: semicircle_lens_path(
                -reveal_offset,
                inner_radius,
                outer_radius,
                reveal_side.opposite(),
            ),
            paint: MaskPaint::Hide,
        },
    ];

    let transform = Affine::translate(CENTER.to_vec2()) * Affine::rotate(rotation_degrees.to_radians());

    MaskRegion {
        background: view_rect(),
        layers: vec![MaskLayer { transform, shapes }],
    }
}

/// Lens-shaped intersection of two circles of radius `2h` centered `h` above and below the
/// view center. The lens tips sit at `(cx ∓ h√3, cy)`.
///
/// For `h <= 0` (or NaN) the result reveals nothing.
pub fn build_auxiliary_intersection_mask(h: f64) -> MaskRegion {
    let mut region = MaskRegion::hidden();
    if !(h > 0.0) {
        return region;
    }

    let half_chord = h * 3f64.sqrt();
    region.layers.push(MaskLayer {
        transform: Affine::IDENTITY,
        shapes: vec![MaskShape::Lens {
            from: Point::new(CENTER.x - half_chord, CENTER.y),
            to: Point::new(CENTER.x + half_chord, CENTER.y),
            radius: 2.0 * h,
            paint: MaskPaint::Reveal,
        }],
    });
    region
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mask.rs"]
mod tests;
