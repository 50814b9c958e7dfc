//! Result file: metadata header followed by `<t> <rho>` lines.

use crate::{error::SimError, params::Params, series::TimeSeries};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Metadata printed in the header block.
#[derive(Clone, Debug)]
pub struct RunInfo<'a> {
    pub network:  &'a str,
    pub vertices: usize,
    pub edges:    usize,
    pub params:   &'a Params,
}

/// Write header and averaged series; ρ uses `params.normalization`.
pub fn write_report<W: Write>(
    mut out: W,
    info: &RunInfo,
    series: &TimeSeries,
) -> Result<(), SimError> {
    let p = info.params;
    writeln!(out, "## ***** Algorithm used: Optimized Gillespie Algorithm for SIS (SIS-OGA, Rust) *****")?;
    writeln!(out, "#@ Network file: {}", info.network)?;
    writeln!(out, "#@ Number of nodes: {}", info.vertices)?;
    writeln!(out, "#@ Number of edges: {}", info.edges)?;
    writeln!(out, "#@ Samples: {}", p.samples)?;
    writeln!(out, "#! Infection rate (lambda): {}", p.lambda)?;
    writeln!(out, "#! Maximum time steps: {}", p.t_max)?;
    writeln!(out, "#! Fraction of infected vertices (initial condition): {}", p.initial_fraction)?;
    for (t, rho) in series.rows(p.normalization) {
        writeln!(out, "{t} {rho}")?;
    }
    out.flush()?;
    Ok(())
}

/// Create or truncate `path` and write the report into it.
pub fn save<P: AsRef<Path>>(path: P, info: &RunInfo, series: &TimeSeries) -> Result<(), SimError> {
    let file = File::create(path)?;
    write_report(BufWriter::new(file), info, series)
}
