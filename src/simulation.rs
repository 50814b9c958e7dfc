// src/simulation.rs
//! Sample loop of the SIS-OGA run.
//!
//!  1) Random initial condition of ⌊N·pINI⌋ infected vertices per sample.
//!  2) Gillespie steps until the absorbing state or t > t_max.
//!  3) Bin catch-up after every event.
//!  4) Sequential driver with a per-sample hook, and a rayon driver that
//!     reduces independently seeded samples.

use crate::{
    engine::{Dynamics, Event},
    error::SimError,
    infected::InfectedSet,
    params::Params,
    series::{BinCursor, TimeSeries},
    Graph,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

/// Why a sample stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleOutcome {
    /// No infected vertex left.
    Absorbed,
    /// Clock passed t_max with the epidemic still alive.
    TimeExceeded,
}

#[derive(Clone, Copy, Debug)]
pub struct SampleSummary {
    pub outcome:  SampleOutcome,
    /// Events fired, phantoms included.
    pub events:   u64,
    pub phantoms: u64,
    /// Clock after the last event.
    pub time:     f64,
    /// Bins recorded by this sample.
    pub bins:     usize,
}

/// Run one sample on `set`, which is reset and reseeded first.
pub fn run_sample<'g, R>(
    params: &Params,
    dynamics: &Dynamics,
    set: &mut InfectedSet<'g>,
    series: &mut TimeSeries,
    rng: &mut R,
) -> SampleSummary
where
    R: Rng + ?Sized,
{
    let n = set.graph().n();
    set.reset();
    set.seed(params.initial_infected(n), rng);

    let mut cursor = BinCursor::new();
    let mut t = 0.0;
    let mut events = 0u64;
    let mut phantoms = 0u64;
    let mut bins = 0usize;
    let horizon = params.t_max as f64;

    while t <= horizon && !set.is_empty() {
        let (dt, event) = dynamics.step(set, rng);
        t += dt;
        events += 1;
        if matches!(event, Event::Phantom { .. }) {
            phantoms += 1;
        }
        bins += series.record(&mut cursor, t, set.size(), n);
    }
    series.finish_sample();

    let outcome = if set.is_empty() { SampleOutcome::Absorbed } else { SampleOutcome::TimeExceeded };
    SampleSummary { outcome, events, phantoms, time: t, bins }
}

/// Run every sample in sequence with one random stream.
///
/// `on_sample(index, &series)` is called after each sample (1-based
/// index) with the running aggregate; an error aborts the run.
pub fn run<R, F>(
    graph: &Graph,
    params: &Params,
    rng: &mut R,
    mut on_sample: F,
) -> Result<TimeSeries, SimError>
where
    R: Rng + ?Sized,
    F: FnMut(usize, &TimeSeries) -> Result<(), SimError>,
{
    params.validate()?;
    if graph.n() == 0 {
        return Err(SimError::EmptyNetwork);
    }

    let dynamics = Dynamics::for_run(graph, params)?;
    let mut set = InfectedSet::new(graph);
    let mut series = TimeSeries::new(params.t_max);

    tracing::info!(
        vertices = graph.n(),
        edges = graph.m(),
        k_max = dynamics.k_max(),
        samples = params.samples,
        lambda = dynamics.lambda(),
        t_max = params.t_max,
        "running dynamics"
    );

    for sam in 1..=params.samples {
        let summary = run_sample(params, &dynamics, &mut set, &mut series, rng);
        tracing::debug!(
            sample = sam,
            outcome = ?summary.outcome,
            events = summary.events,
            phantoms = summary.phantoms,
            time = summary.time,
            "sample done"
        );
        on_sample(sam, &series)?;
    }

    Ok(series)
}

/// Run the samples on the rayon pool. Sample `i` draws from its own
/// `ChaCha8Rng` seeded with `params.seed + i`.
pub fn run_parallel(graph: &Graph, params: &Params) -> Result<TimeSeries, SimError> {
    params.validate()?;
    if graph.n() == 0 {
        return Err(SimError::EmptyNetwork);
    }

    let dynamics = Dynamics::for_run(graph, params)?;
    tracing::info!(
        vertices = graph.n(),
        lambda = dynamics.lambda(),
        samples = params.samples,
        threads = rayon::current_num_threads(),
        "running dynamics in parallel"
    );

    let series = (0..params.samples)
        .into_par_iter()
        .fold(
            || (InfectedSet::new(graph), TimeSeries::new(params.t_max)),
            |(mut set, mut series), i| {
                let mut rng = ChaCha8Rng::seed_from_u64(params.seed.wrapping_add(i as u64));
                run_sample(params, &dynamics, &mut set, &mut series, &mut rng);
                (set, series)
            },
        )
        .map(|(_, series)| series)
        .reduce(
            || TimeSeries::new(params.t_max),
            |mut a, b| {
                a.merge(&b);
                a
            },
        );

    Ok(series)
}

/*──────────────────────── tests ───────────────────────────*/
