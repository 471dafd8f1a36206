use crate::foundation::core::{CENTER, Line, Point, Rgb8, TAU};

/// Inputs for one ring of radial spokes. Built fresh for every render.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SpokeConfig {
    pub count: i64,
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub min_thickness: f64,
    pub max_thickness: f64,
    /// Angle (radians, before `angle_offset`) at which the spoke is thickest.
    pub peak_angle: f64,
    pub stroke: Rgb8,
    pub inverted: bool,
    /// Rotation of the whole ring, radians.
    pub angle_offset: f64,
}

/// One radial line segment with a butt-capped stroke.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Spoke {
    pub angle: f64,
    pub line: Line,
    pub width: f64,
    pub stroke: Rgb8,
}

/// Stroke width of a spoke at `angle`.
///
/// The offset from `peak_angle` is normalized over one full turn into `[0, 1)`. Thickness falls
/// linearly from `max_t` at the peak to `min_t` just before completing the turn; `inverted`
/// flips the ramp so the two variants always sum to `min_t + max_t`.
pub fn spoke_width(angle: f64, peak_angle: f64, min_t: f64, max_t: f64, inverted: bool) -> f64 {
    let mut n = (angle - peak_angle).rem_euclid(TAU) / TAU;
    if !(n < 1.0) {
        // rem_euclid can round up to exactly TAU for tiny negative offsets.
        n = 0.0;
    }

    let ramp = if inverted { n } else { 1.0 - n };
    min_t + (max_t - min_t) * ramp
}

fn polar(radius: f64, angle: f64) -> Point {
    Point::new(
        CENTER.x + radius * angle.cos(),
        CENTER.y + radius * angle.sin(),
    )
}

/// Evenly spaced spokes around the view center, starting at `angle_offset`.
///
/// A non-positive `count` yields no spokes.
pub fn build_spokes(config: &SpokeConfig) -> Vec<Spoke> {
    if config.count <= 0 {
        return Vec::new();
    }

    let count = config.count as usize;
    let step = TAU / count as f64;
    // The thickness ramp turns with the ring.
    let peak = config.peak_angle + config.angle_offset;

    (0..count)
        .map(|i| {
            let angle = config.angle_offset + step * i as f64;
            Spoke {
                angle,
                line: Line::new(
                    polar(config.inner_radius, angle),
                    polar(config.outer_radius, angle),
                ),
                width: spoke_width(
                    angle,
                    peak,
                    config.min_thickness,
                    config.max_thickness,
                    config.inverted,
                ),
                stroke: config.stroke,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/spokes.rs"]
mod tests;
