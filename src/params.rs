// src/params.rs
//! Parameter bundle for the SIS dynamics.
//!
//! The healing rate μ is fixed to 1, so `lambda` is the infection rate
//! expressed in units of μ. Time is binned in unit intervals `1..=t_max`,
//! which is also the horizon of each sample.

use crate::error::SimError;

/// Denominator used when averaging the infected fraction of a bin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Normalization {
    /// Divide by every completed sample: population prevalence,
    /// samples that already died out count as ρ = 0.
    #[default]
    Population,
    /// Divide by the samples still active in that bin (QS analysis).
    QuasiStationary,
}

/// All tunable controls of a run.
#[derive(Clone, Debug)]
pub struct Params {
    /// Number of independent trajectories.
    pub samples:          usize,

    /// Infection rate λ per infected-susceptible edge.
    pub lambda:           f64,

    /// Last time bin and per-sample horizon.
    pub t_max:            usize,

    /// Fraction of vertices infected at t = 0, drawn anew for each sample.
    pub initial_fraction: f64,

    /// Seed for the run's random stream.
    pub seed:             u64,

    pub normalization:    Normalization,
}

impl Default for Params {
    fn default() -> Self {
        Params {
            samples:          1,
            lambda:           1.0,
            t_max:            100,
            initial_fraction: 1.0,
            seed:             0,
            normalization:    Normalization::Population,
        }
    }
}

impl Params {
    /// Reject parameters the engine cannot run with.
    pub fn validate(&self) -> Result<(), SimError> {
        if self.samples == 0 {
            return Err(SimError::Config("sample count must be positive".into()));
        }
        if !self.lambda.is_finite() || self.lambda < 0.0 {
            return Err(SimError::Config(format!(
                "infection rate must be a non-negative number, got {}",
                self.lambda
            )));
        }
        if self.t_max == 0 {
            return Err(SimError::Config("maximum time must be at least 1".into()));
        }
        if !(0.0..=1.0).contains(&self.initial_fraction) {
            return Err(SimError::Config(format!(
                "initial fraction must lie in [0, 1], got {}",
                self.initial_fraction
            )));
        }
        Ok(())
    }

    /// floor(n · pINI), never more than n.
    pub fn initial_infected(&self, n: usize) -> usize {
        ((n as f64 * self.initial_fraction).floor() as usize).min(n)
    }
}
