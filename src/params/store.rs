use std::collections::BTreeMap;

use crate::{
    foundation::{
        core::Rgb8,
        error::{FractreeError, FractreeResult},
    },
    params::registry::{Parameter, default_parameters},
};

/// Wrap `value` into `[min, max]` cyclically.
///
/// Overshooting `max` re-enters from `min` and undershooting `min` re-enters from `max`, so a
/// parameter driven by a constant velocity moves around a torus instead of sticking to a bound.
/// A zero-width (or inverted, or non-finite) range collapses to `min`.
pub fn wrap_into_range(value: f64, min: f64, max: f64) -> f64 {
    let width = max - min;
    if !(width > 0.0) || !width.is_finite() || !value.is_finite() {
        return min;
    }

    let mut v = value;
    if v > max {
        v = min + (v - max) % width;
    }
    if v < min {
        v = max - (min - v) % width;
    }
    v
}

#[derive(Clone, Debug)]
struct ParamSlot {
    param: Parameter,
    value: f64,
    velocity: f64,
}

/// Current values and velocities for a set of registered parameters.
///
/// Values are kept inside their parameter's bounds at all times. Input that cannot be applied
/// (unknown id, non-numeric text, non-finite numbers) is rejected and leaves the last good value
/// in place.
#[derive(Clone, Debug)]
pub struct ParamStore {
    slots: Vec<ParamSlot>,
    index: BTreeMap<String, usize>,
}

impl Default for ParamStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ParamStore {
    pub fn empty() -> Self {
        Self {
            slots: Vec::new(),
            index: BTreeMap::new(),
        }
    }

    pub fn new(params: impl IntoIterator<Item = Parameter>) -> FractreeResult<Self> {
        let mut store = Self::empty();
        for p in params {
            store.register(p)?;
        }
        Ok(store)
    }

    /// Store seeded with the built-in logo parameters at their defaults.
    pub fn with_defaults() -> Self {
        let mut store = Self::empty();
        for p in default_parameters() {
            store.push_slot(p);
        }
        store
    }

    pub fn register(&mut self, param: Parameter) -> FractreeResult<()> {
        param.validate()?;
        if self.index.contains_key(&param.id) {
            return Err(FractreeError::config(format!(
                "parameter '{}' is already registered",
                param.id
            )));
        }
        self.push_slot(param);
        Ok(())
    }

    fn push_slot(&mut self, param: Parameter) {
        self.index.insert(param.id.clone(), self.slots.len());
        self.slots.push(ParamSlot {
            value: param.default,
            velocity: 0.0,
            param,
        });
    }

    fn slot(&self, id: &str) -> FractreeResult<&ParamSlot> {
        self.index
            .get(id)
            .map(|&i| &self.slots[i])
            .ok_or_else(|| FractreeError::config(format!("unknown parameter '{id}'")))
    }

    fn slot_mut(&mut self, id: &str) -> FractreeResult<&mut ParamSlot> {
        match self.index.get(id) {
            Some(&i) => Ok(&mut self.slots[i]),
            None => Err(FractreeError::config(format!("unknown parameter '{id}'"))),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Registered parameters in registration order.
    pub fn parameters(&self) -> impl Iterator<Item = &Parameter> {
        self.slots.iter().map(|s| &s.param)
    }

    pub fn parameter(&self, id: &str) -> Option<&Parameter> {
        self.slot(id).ok().map(|s| &s.param)
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.slot(id).ok().map(|s| s.value)
    }

    pub fn value(&self, id: &str) -> FractreeResult<f64> {
        self.slot(id).map(|s| s.value)
    }

    /// Set a value, wrapping it into the parameter's bounds. Returns the stored value.
    pub fn set(&mut self, id: &str, value: f64) -> FractreeResult<f64> {
        if !value.is_finite() {
            return Err(FractreeError::config(format!(
                "parameter '{id}' value must be finite, got {value}"
            )));
        }
        let slot = self.slot_mut(id)?;
        slot.value = wrap_into_range(value, slot.param.min, slot.param.max);
        Ok(slot.value)
    }

    /// Set a value from text input (a slider or command-line field).
    pub fn set_str(&mut self, id: &str, raw: &str) -> FractreeResult<f64> {
        let value = parse_number(id, raw)?;
        self.set(id, value)
    }

    pub fn velocity(&self, id: &str) -> Option<f64> {
        self.slot(id).ok().map(|s| s.velocity)
    }

    /// Set the per-second velocity of a parameter. Zero makes it static.
    pub fn set_velocity(&mut self, id: &str, velocity: f64) -> FractreeResult<()> {
        if !velocity.is_finite() {
            return Err(FractreeError::config(format!(
                "parameter '{id}' velocity must be finite, got {velocity}"
            )));
        }
        self.slot_mut(id)?.velocity = velocity;
        Ok(())
    }

    pub fn set_velocity_str(&mut self, id: &str, raw: &str) -> FractreeResult<()> {
        let velocity = parse_number(id, raw)?;
        self.set_velocity(id, velocity)
    }

    pub fn bounds(&self, id: &str) -> Option<(f64, f64)> {
        self.parameter(id).map(|p| (p.min, p.max))
    }

    /// Apply every nonzero velocity over `dt_secs` with wraparound.
    ///
    /// Returns how many parameters moved.
    pub fn advance(&mut self, dt_secs: f64) -> usize {
        if !dt_secs.is_finite() || dt_secs <= 0.0 {
            return 0;
        }

        let mut moved = 0;
        for slot in &mut self.slots {
            if slot.velocity == 0.0 {
                continue;
            }
            if !slot.velocity.is_finite() || !slot.value.is_finite() {
                tracing::warn!(id = %slot.param.id, "skipping parameter with non-finite state");
                continue;
            }
            let next = slot.value + slot.velocity * dt_secs;
            slot.value = wrap_into_range(next, slot.param.min, slot.param.max);
            moved += 1;
        }
        moved
    }

    /// Display label for a parameter: its value rounded to the nearest integer.
    pub fn label(&self, id: &str) -> Option<String> {
        self.get(id).map(label_for)
    }

    pub fn labels(&self) -> Vec<(String, String)> {
        self.slots
            .iter()
            .map(|s| (s.param.id.clone(), label_for(s.value)))
            .collect()
    }
}

/// Nearest integer, with halves rounded toward positive infinity (`-2.5` reads as `-2`).
fn label_for(value: f64) -> String {
    format!("{}", (value + 0.5).floor() as i64)
}

fn parse_number(id: &str, raw: &str) -> FractreeResult<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            FractreeError::config(format!("parameter '{id}' expects a number, got '{raw}'"))
        })
}

/// Non-numeric look settings: spoke colors and mask inversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Style {
    pub front_color: Rgb8,
    pub back_color: Rgb8,
    pub inverted: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            front_color: Rgb8::new(0x33, 0x66, 0xff),
            back_color: Rgb8::new(0xff, 0x66, 0x33),
            inverted: false,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/params/store.rs"]
mod tests;
