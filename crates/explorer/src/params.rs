//! User-adjustable control parameters
//!
//! Two bounded numeric controls drive the session: sample size `n` and
//! noise level `sigma`. Mutation goes through a rejecting setter; an
//! accepted change is what triggers scheduler invalidation upstream.

use std::fmt;

use thiserror::Error;

/// Identity of a control parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    SampleSize,
    NoiseSigma,
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamId::SampleSize => write!(f, "n"),
            ParamId::NoiseSigma => write!(f, "sigma"),
        }
    }
}

/// Rejected parameter mutation; the prior value is retained
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{name} = {value} outside [{min}, {max}]")]
pub struct OutOfRangeError {
    pub name: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// A named numeric value with bounds and a current value.
///
/// The step is slider metadata: values inside the bounds but off the step
/// grid are accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: &'static str,
    min: f64,
    max: f64,
    step: f64,
    value: f64,
}

impl Parameter {
    pub fn new(name: &'static str, min: f64, max: f64, step: f64, value: f64) -> Self {
        Self {
            name,
            min,
            max,
            step,
            value,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Update the value, rejecting non-finite or out-of-bounds input
    pub fn set(&mut self, value: f64) -> Result<(), OutOfRangeError> {
        if !value.is_finite() || value < self.min || value > self.max {
            return Err(OutOfRangeError {
                name: self.name,
                value,
                min: self.min,
                max: self.max,
            });
        }
        self.value = value;
        Ok(())
    }
}

/// Current values of the session's two controls
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    sample_size: Parameter,
    noise_sigma: Parameter,
}

impl ControlState {
    /// Controls with the documented ranges and defaults
    pub fn new() -> Self {
        Self::custom(
            Parameter::new("n", 100.0, 5000.0, 100.0, 1000.0),
            Parameter::new("sigma", 0.0, 2.0, 0.1, 0.5),
        )
    }

    /// Controls with caller-supplied bounds.
    ///
    /// Lets a harness drive values the default sliders cannot reach, e.g.
    /// a zero sample size to exercise the degenerate pipeline path.
    pub fn custom(sample_size: Parameter, noise_sigma: Parameter) -> Self {
        Self {
            sample_size,
            noise_sigma,
        }
    }

    pub fn get(&self, id: ParamId) -> &Parameter {
        match id {
            ParamId::SampleSize => &self.sample_size,
            ParamId::NoiseSigma => &self.noise_sigma,
        }
    }

    pub fn set(&mut self, id: ParamId, value: f64) -> Result<(), OutOfRangeError> {
        match id {
            ParamId::SampleSize => self.sample_size.set(value),
            ParamId::NoiseSigma => self.noise_sigma.set(value),
        }
    }

    pub fn sample_size(&self) -> i64 {
        self.sample_size.value() as i64
    }

    pub fn noise_sigma(&self) -> f64 {
        self.noise_sigma.value()
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}
