//! One step of the optimized Gillespie algorithm for SIS (SIS-OGA).
//!
//! With healing rate 1 and infection rate λ per edge, the total rate is
//!     R = N_I + λ·N_k
//! where N_k is the degree sum of the infected set. A step draws the
//! waiting time Δt = −ln(u)/R, then heals a uniform infected vertex with
//! probability N_I/R or otherwise fires an infection attempt along a
//! uniformly chosen edge of a degree-biased infected source. Attempts that
//! hit an infected neighbour are phantom events: they consume time and
//! change nothing.

use crate::{error::SimError, graph::Graph, infected::InfectedSet, params::Params};
use rand::Rng;

/// Floor for the uniform variate of the waiting-time draw (avoids ln 0).
pub const MIN_UNIFORM: f64 = 1e-12;

/// Outcome of a single step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    Cure { vertex: usize },
    Infection { source: usize, target: usize },
    /// Attempt on an already infected neighbour.
    Phantom { source: usize, target: usize },
}

/// Rate parameters shared read-only by every sample of a run.
#[derive(Clone, Copy, Debug)]
pub struct Dynamics {
    lambda: f64,
    k_max:  usize,
}

impl Dynamics {
    pub fn new(lambda: f64, k_max: usize) -> Self {
        Self { lambda, k_max }
    }

    /// Rates for `params.lambda` on `graph`.
    ///
    /// The largest reachable rate, N + λ·2E, must be finite and leave the
    /// clock able to move at `t_max`; otherwise Δt rounds to nothing and
    /// a sample never ends.
    pub fn for_run(graph: &Graph, params: &Params) -> Result<Self, SimError> {
        let max_rate = graph.n() as f64 + params.lambda * (2 * graph.m()) as f64;
        let horizon = params.t_max as f64;
        if !max_rate.is_finite() || horizon + 1.0 / max_rate <= horizon {
            return Err(SimError::Config(format!(
                "infection rate {} is too large for this network: total rate {max_rate} \
                 stalls the clock before t = {}",
                params.lambda, params.t_max
            )));
        }
        Ok(Self::new(params.lambda, graph.max_degree()))
    }

    #[inline] pub fn lambda(&self) -> f64 { self.lambda }
    #[inline] pub fn k_max(&self) -> usize { self.k_max }

    /// R = N_I + λ·N_k.
    #[inline]
    pub fn total_rate(&self, set: &InfectedSet) -> f64 {
        set.size() as f64 + self.lambda * set.degree_sum() as f64
    }

    /// Fire one event on a non-empty set. Returns Δt and what happened.
    pub fn step<R>(&self, set: &mut InfectedSet, rng: &mut R) -> (f64, Event)
    where
        R: Rng + ?Sized,
    {
        debug_assert!(!set.is_empty());
        let rate = self.total_rate(set);
        let dt = waiting_time(rate, rng);

        let heal = set.size() as f64 / rate;
        if rng.gen_range(0.0..1.0) < heal {
            let pos = set.sample_uniform(rng);
            let vertex = set.remove_at(pos);
            return (dt, Event::Cure { vertex });
        }

        let source = self.pick_source(set, rng);
        let nb = set.graph().neighbours(source);
        let target = nb[rng.gen_range(0..nb.len())];
        if set.is_infected(target) {
            (dt, Event::Phantom { source, target })
        } else {
            set.insert(target);
            (dt, Event::Infection { source, target })
        }
    }

    /// Infected vertex chosen with probability k_v / N_k.
    ///
    /// Rejection sampling: draw uniformly from the set and accept with
    /// probability k_v / k_max. The expected number of draws is
    /// k_max / ⟨k⟩_I, where ⟨k⟩_I is the mean degree of the infected set.
    /// Requires N_k > 0.
    pub fn pick_source<R>(&self, set: &InfectedSet, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        debug_assert!(set.degree_sum() > 0 && self.k_max > 0);
        let k_max = self.k_max as f64;
        loop {
            let v = set.vertex_at(set.sample_uniform(rng));
            if rng.gen_range(0.0..1.0) < set.graph().degree(v) as f64 / k_max {
                return v;
            }
        }
    }
}

/// Exponential waiting time with the given total rate.
#[inline]
pub fn waiting_time<R>(rate: f64, rng: &mut R) -> f64
where
    R: Rng + ?Sized,
{
    let u: f64 = rng.gen_range(0.0..1.0);
    -u.max(MIN_UNIFORM).ln() / rate
}

/*──────────────────────── tests ───────────────────────────*/
