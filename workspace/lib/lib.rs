//! Job configuration and output backends for the `qho` binary.

pub mod config;
pub mod npz;
pub mod plot;
pub mod report;

pub use config::{ Format, JobConfig, load_config };
pub use npz::NpzRenderer;
pub use plot::PlotlyRenderer;
