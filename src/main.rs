//! `dynsis` – command line front-end.
//!
//! ```text
//! dynsis network.edges result.dat --samples 100 --lambda 0.2 --tmax 1000 --p-ini 1.0
//! ```
//!
//! Dynamical parameters missing from the command line are asked for on
//! stdin. The output file is written once at the end, or after every sample
//! with `--checkpoint`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use clap::Parser;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::EnvFilter;

use dynsis::{run, run_parallel, save, Graph, IndexBase, Normalization, Params, RunInfo};

#[derive(Parser, Debug)]
#[command(author, version, about = "SIS-OGA: optimized Gillespie simulation of SIS epidemics", long_about = None)]
struct Cli {
    /// Edge list of the network, one `u v` pair per line
    input: PathBuf,

    /// File receiving the averaged time series
    output: PathBuf,

    /// Number of dynamics samples
    #[arg(short, long)]
    samples: Option<usize>,

    /// Infection rate lambda (healing rate is 1)
    #[arg(short, long)]
    lambda: Option<f64>,

    /// Maximum time (stops earlier if the absorbing state is reached)
    #[arg(short, long)]
    tmax: Option<usize>,

    /// Fraction of vertices infected at t = 0
    #[arg(short, long)]
    p_ini: Option<f64>,

    /// Seed of the random stream
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Vertex ids in the edge list start at 0 instead of 1
    #[arg(long)]
    zero_based: bool,

    /// Average rho over surviving samples only (QS analysis)
    #[arg(long)]
    quasi_stationary: bool,

    /// Spread samples over the rayon thread pool
    #[arg(long, conflicts_with = "checkpoint")]
    parallel: bool,

    /// Rewrite the output file after every completed sample
    #[arg(long)]
    checkpoint: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    tracing::info!("reading dynamical parameters");
    let stdin = io::stdin();
    let mut input = stdin.lock();
    let params = Params {
        samples: ask(cli.samples, "How much dynamics samples? ", &mut input)?,
        lambda: ask(cli.lambda, "Value of infection rate lambda (mu is defined as equal to 1): ", &mut input)?,
        t_max: ask(cli.tmax, "Maximum time steps (it stops if the absorbing state is reached): ", &mut input)?,
        initial_fraction: ask(
            cli.p_ini,
            "Fraction of infected vertices on the network as initial condition (is random for each sample): ",
            &mut input,
        )?,
        seed: cli.seed,
        normalization: if cli.quasi_stationary {
            Normalization::QuasiStationary
        } else {
            Normalization::Population
        },
    };
    params.validate()?;

    tracing::info!(path = %cli.input.display(), "loading network");
    let base = if cli.zero_based { IndexBase::Zero } else { IndexBase::One };
    let graph = Graph::open(&cli.input, base)
        .with_context(|| format!("cannot load network {}", cli.input.display()))?;

    let network = cli.input.display().to_string();
    let info = RunInfo { network: &network, vertices: graph.n(), edges: graph.m(), params: &params };

    let series = if cli.parallel {
        run_parallel(&graph, &params)?
    } else {
        let mut rng = ChaCha8Rng::seed_from_u64(params.seed);
        run(&graph, &params, &mut rng, |sam, series| {
            if cli.checkpoint {
                tracing::debug!(sample = sam, "checkpoint");
                save(&cli.output, &info, series)?;
            }
            Ok(())
        })?
    };

    save(&cli.output, &info, &series)
        .with_context(|| format!("cannot write {}", cli.output.display()))?;

    tracing::info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        bins = series.last_bin(),
        "everything ok"
    );
    Ok(())
}

/// Use the command line value, or prompt for it.
fn ask<T, R>(given: Option<T>, prompt: &str, input: &mut R) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    R: BufRead,
{
    if let Some(v) = given {
        return Ok(v);
    }
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        bail!("no value given for: {}", prompt.trim());
    }
    line.trim()
        .parse()
        .with_context(|| format!("`{}` is not a valid answer to: {}", line.trim(), prompt.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn command_line_value_skips_prompt() {
        let mut input = Cursor::new("7\n");
        let v: usize = ask(Some(3), "Samples? ", &mut input).unwrap();
        assert_eq!(v, 3);
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn prompted_value_is_trimmed_and_parsed() {
        let mut input = Cursor::new("  0.25 \n12\n");
        let lambda: f64 = ask(None, "Lambda? ", &mut input).unwrap();
        assert!((lambda - 0.25).abs() < 1e-12);
        let tmax: usize = ask(None, "Tmax? ", &mut input).unwrap();
        assert_eq!(tmax, 12);
    }

    #[test]
    fn non_numeric_answer_fails() {
        let err = ask::<usize, _>(None, "Samples? ", &mut Cursor::new("abc\n")).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("`abc`"), "{msg}");
        assert!(msg.contains("Samples?"), "{msg}");
    }

    #[test]
    fn closed_stdin_fails() {
        let err = ask::<f64, _>(None, "Lambda? ", &mut Cursor::new("")).unwrap_err();
        assert!(err.to_string().starts_with("no value given"), "{err}");
    }
}
