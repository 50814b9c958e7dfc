//! dynSIS – SIS epidemics on static networks with the optimized
//! Gillespie algorithm (SIS-OGA), plus optional PyO3 bindings.

/*───────── interne modules ─────────*/
pub mod error;
pub mod graph;
pub mod params;
pub mod infected;
pub mod engine;
pub mod series;
pub mod simulation;
pub mod output;

/*───────── re-exports voor Rust-gebruikers ─────────*/
pub use error::SimError;
pub use graph::{Graph, IndexBase};
pub use infected::InfectedSet;
pub use engine::{Dynamics, Event};
pub use params::{Normalization, Params};
pub use series::TimeSeries;
pub use simulation::{run, run_parallel, run_sample, SampleOutcome, SampleSummary};
pub use output::{save, write_report, RunInfo};

/*======================================================================
│  Python-functies
└=====================================================================*/

#[cfg(feature = "python")]
mod python {
    use super::*;
    use pyo3::prelude::*;
    use pyo3::wrap_pyfunction;
    use pyo3::types::PyModule;
    use pyo3::prelude::Bound;       // Bound<'py, T> API in PyO3 v0.25
    use rand_chacha::ChaCha8Rng;
    use rand::SeedableRng;

    fn load(graph_path: &str) -> PyResult<Graph> {
        Graph::open(graph_path, IndexBase::One).map_err(|e| match e {
            SimError::Io(io) => pyo3::exceptions::PyIOError::new_err(io.to_string()),
            other => pyo3::exceptions::PyValueError::new_err(other.to_string()),
        })
    }

    /// Run the dynamics – returns the averaged `(t, rho)` series.
    #[pyfunction]
    #[pyo3(text_signature = "(graph_path, samples, lam, t_max, p_ini, seed)")]
    fn simulate_py(
        graph_path: String,
        samples: usize,
        lam: f64,
        t_max: usize,
        p_ini: f64,
        seed: u64,
    ) -> PyResult<Vec<(f64, f64)>> {
        let graph = load(&graph_path)?;
        let params = Params {
            samples,
            lambda: lam,
            t_max,
            initial_fraction: p_ini,
            seed,
            normalization: Normalization::Population,
        };

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let series = run(&graph, &params, &mut rng, |_, _| Ok(()))
            .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))?;
        Ok(series.rows(params.normalization))
    }

    /// Helper: parse an edge list, return (n, m).
    #[pyfunction]
    #[pyo3(text_signature = "(graph_path)")]
    fn parse_edges_py(graph_path: String) -> PyResult<(usize, usize)> {
        let graph = load(&graph_path)?;
        Ok((graph.n(), graph.m()))
    }

    /*======================================================================
    │  PyO3 module-init
    └=====================================================================*/

    /// ***Important***: name `_native` must match `pyproject.toml -> module-name`.
    #[pymodule]
    fn _native(_py: Python<'_>, m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(simulate_py, m)?)?;
        m.add_function(wrap_pyfunction!(parse_edges_py, m)?)?;
        Ok(())
    }
}
