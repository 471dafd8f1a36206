use crate::{
    foundation::core::{Rgb8, deg_to_rad},
    geometry::spokes::SpokeConfig,
    params::{
        registry::{default_parameter, ids},
        store::{ParamStore, Style},
    },
};

/// Parameter values resolved for one render, with angles converted to radians.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameValues {
    pub r: f64,
    pub d: f64,
    /// Spoke outer radius, `r + 2d`.
    pub outer_radius: f64,
    /// Mask lens outer radius, `r + d`.
    pub mask_outer_radius: f64,
    pub count: i64,
    pub min_thickness: f64,
    pub max_thickness: f64,
    pub peak_angle: f64,
    pub front_offset: f64,
    pub back_offset: f64,
    /// Kept in degrees; masks rotate their own frame.
    pub mask_rotation_deg: f64,
    pub h: f64,
    pub front_color: Rgb8,
    pub back_color: Rgb8,
    pub inverted: bool,
}

/// Current value of `id`, or its built-in default when the store does not carry it.
fn read(store: &ParamStore, id: &str) -> f64 {
    match store.get(id) {
        Some(v) if v.is_finite() => v,
        _ => {
            let fallback = default_parameter(id).map(|p| p.default).unwrap_or(0.0);
            tracing::warn!(id, fallback, "parameter missing for this frame, using default");
            fallback
        }
    }
}

impl FrameValues {
    pub fn resolve(store: &ParamStore, style: &Style) -> Self {
        let r = read(store, ids::R);
        let d = read(store, ids::D);

        Self {
            r,
            d,
            outer_radius: r + 2.0 * d,
            mask_outer_radius: r + d,
            count: read(store, ids::NUM_LINES).trunc() as i64,
            min_thickness: read(store, ids::MIN_THICK),
            max_thickness: read(store, ids::MAX_THICK),
            peak_angle: deg_to_rad(read(store, ids::PEAK_ANGLE)),
            front_offset: deg_to_rad(read(store, ids::FRONT_ROT)),
            back_offset: deg_to_rad(read(store, ids::BACK_ROT)),
            mask_rotation_deg: read(store, ids::MASK_ROT),
            h: read(store, ids::H),
            front_color: style.front_color,
            back_color: style.back_color,
            inverted: style.inverted,
        }
    }

    /// Peak of the back ring: opposite the front peak, within one turn.
    pub fn back_peak_angle(&self) -> f64 {
        (self.peak_angle + std::f64::consts::PI) % std::f64::consts::TAU
    }

    pub fn spoke_config(&self, peak_angle: f64, stroke: Rgb8, angle_offset: f64) -> SpokeConfig {
        SpokeConfig {
            count: self.count,
            inner_radius: self.r,
            outer_radius: self.outer_radius,
            min_thickness: self.min_thickness,
            max_thickness: self.max_thickness,
            peak_angle,
            stroke,
            inverted: self.inverted,
            angle_offset,
        }
    }

    pub fn front_spokes(&self) -> SpokeConfig {
        self.spoke_config(self.peak_angle, self.front_color, self.front_offset)
    }

    pub fn back_spokes(&self) -> SpokeConfig {
        self.spoke_config(self.back_peak_angle(), self.back_color, self.back_offset)
    }
}
