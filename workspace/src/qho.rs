//! Bound states of a harmonic oscillator on a finite tight-binding chain.
//!
//! ```sh
//! qho                       # defaults: 99 sites over 1 nm, k = 5000 J/m²
//! qho job.toml -f npz       # settings from a job file, raw array output
//! RUST_LOG=debug qho -n 400 -o out
//! ```

use std::path::PathBuf;
use anyhow::Context;
use clap::Parser;
use lib::{
    Format,
    JobConfig,
    NpzRenderer,
    PlotlyRenderer,
    load_config,
    report::harmonic_levels,
};
use tbspace::pipeline;

#[derive(Parser)]
#[command(name = "qho")]
#[command(about = "Harmonic oscillator eigenstates on a discretized chain")]
#[command(version)]
struct Cli {
    /// Path to a TOML job file.
    config: Option<PathBuf>,
    /// Number of lattice sites.
    #[arg(short = 'n', long = "sites")]
    sites: Option<usize>,
    /// Spatial extent of the chain, boundary points included.
    #[arg(short = 'a', long = "extent")]
    extent: Option<f64>,
    /// Stiffness k of the potential V(x) = k x² / 2.
    #[arg(short = 'k', long = "stiffness")]
    stiffness: Option<f64>,
    /// Output directory (overrides the job file setting).
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Output format (overrides the job file setting).
    #[arg(short, long, value_enum)]
    format: Option<Format>,
}

impl Cli {
    fn job(&self) -> anyhow::Result<JobConfig> {
        let mut job
            = match &self.config {
                Some(path) => load_config(path)
                    .with_context(|| format!("reading {}", path.display()))?,
                None => JobConfig::default(),
            };
        if let Some(n) = self.sites { job.lattice.n = n; }
        if let Some(a) = self.extent { job.lattice.a = a; }
        if let Some(k) = self.stiffness { job.lattice.k = k; }
        if let Some(dir) = &self.output { job.output.directory = dir.clone(); }
        if let Some(format) = self.format { job.output.format = format; }
        Ok(job)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let job = cli.job()?;
    let config = job.pipeline_config();
    let units = job.unit_handler()?;
    let outdir = &job.output.directory;

    let pe
        = match job.output.format {
            Format::Html => {
                pipeline::run(&config, &units, PlotlyRenderer::new(outdir))?
            },
            Format::Npz => {
                pipeline::run(&config, &units, NpzRenderer::new(outdir))?
            },
        };
    for level in harmonic_levels(&config, &units, &pe, 5)? {
        println!("{level}");
    }
    println!(
        "{} eigenstates written to {}", pe.len(), outdir.display());
    Ok(())
}
