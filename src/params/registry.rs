use crate::foundation::error::{FractreeError, FractreeResult};

/// Parameter ids used by the logo composition.
pub mod ids {
    pub const R: &str = "r";
    pub const D: &str = "d";
    pub const NUM_LINES: &str = "numLines";
    pub const MIN_THICK: &str = "minThick";
    pub const MAX_THICK: &str = "maxThick";
    pub const PEAK_ANGLE: &str = "peakAngle";
    pub const FRONT_ROT: &str = "frontRot";
    pub const BACK_ROT: &str = "backRot";
    pub const MASK_ROT: &str = "maskRot";
    pub const H: &str = "h";
}

/// A named scalar with inclusive bounds.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Parameter {
    pub id: String,
    pub min: f64,
    pub max: f64,
    /// Initial value, also used when a frame has to fall back for a missing parameter.
    pub default: f64,
}

impl Parameter {
    pub fn new(id: impl Into<String>, min: f64, max: f64, default: f64) -> FractreeResult<Self> {
        let p = Self {
            id: id.into(),
            min,
            max,
            default,
        };
        p.validate()?;
        Ok(p)
    }

    pub fn validate(&self) -> FractreeResult<()> {
        if self.id.is_empty() {
            return Err(FractreeError::validation("parameter id must be non-empty"));
        }
        if !self.min.is_finite() || !self.max.is_finite() || !self.default.is_finite() {
            return Err(FractreeError::validation(format!(
                "parameter '{}' bounds and default must be finite",
                self.id
            )));
        }
        if self.min > self.max {
            return Err(FractreeError::validation(format!(
                "parameter '{}' min must be <= max",
                self.id
            )));
        }
        if self.default < self.min || self.default > self.max {
            return Err(FractreeError::validation(format!(
                "parameter '{}' default {} is outside [{}, {}]",
                self.id, self.default, self.min, self.max
            )));
        }
        Ok(())
    }

    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

fn builtin(id: &str, min: f64, max: f64, default: f64) -> Parameter {
    Parameter {
        id: id.to_string(),
        min,
        max,
        default,
    }
}

/// The parameter set the logo generator ships with.
pub fn default_parameters() -> Vec<Parameter> {
    vec![
        builtin(ids::R, 40.0, 100.0, 60.0),
        builtin(ids::D, 10.0, 60.0, 30.0),
        builtin(ids::NUM_LINES, 4.0, 120.0, 36.0),
        builtin(ids::MIN_THICK, 1.0, 20.0, 2.0),
        builtin(ids::MAX_THICK, 1.0, 40.0, 12.0),
        builtin(ids::PEAK_ANGLE, 0.0, 360.0, 0.0),
        builtin(ids::FRONT_ROT, 0.0, 360.0, 0.0),
        builtin(ids::BACK_ROT, 0.0, 360.0, 0.0),
        builtin(ids::MASK_ROT, 0.0, 360.0, 0.0),
        builtin(ids::H, 50.0, 250.0, 100.0),
    ]
}

pub fn default_parameter(id: &str) -> Option<Parameter> {
    default_parameters().into_iter().find(|p| p.id == id)
}
