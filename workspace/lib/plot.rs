//! Interactive HTML output via Plotly.

use std::{ fs, path::{ Path, PathBuf } };
use num_complex::Complex64 as C64;
use plotly::{
    Layout,
    Plot,
    Scatter,
    common::{ Mode, Title },
    layout::Axis,
};
use tbspace::{
    error::RenderError,
    render::{ Labels, RResult, Renderer },
};

/// Writes `EigenValues.html` and one `WaveFunction<n>.html` per eigenstate
/// into an output directory, which is created on the first write.
#[derive(Clone, Debug)]
pub struct PlotlyRenderer {
    outdir: PathBuf,
}

impl PlotlyRenderer {
    pub fn new<P>(outdir: P) -> Self
    where P: AsRef<Path>
    {
        Self { outdir: outdir.as_ref().to_path_buf() }
    }

    pub fn outdir(&self) -> &Path { &self.outdir }

    fn layout(labels: &Labels) -> Layout {
        Layout::new()
            .title(Title::new(&labels.title))
            .x_axis(Axis::new().title(Title::new(&labels.x)))
            .y_axis(Axis::new().title(Title::new(&labels.y)))
    }

    fn write(&self, filename: &str, plot: &Plot) -> RResult<()> {
        fs::create_dir_all(&self.outdir).map_err(RenderError::new)?;
        let path = self.outdir.join(filename);
        fs::write(&path, plot.to_html()).map_err(RenderError::new)?;
        log::debug!("plotly: wrote {}", path.display());
        Ok(())
    }
}

impl Renderer for PlotlyRenderer {
    fn eigenvalues(&mut self, labels: &Labels, evals: &[f64]) -> RResult<()> {
        let idx: Vec<usize> = (0..evals.len()).collect();
        let trace
            = Scatter::new(idx, evals.to_vec())
            .mode(Mode::LinesMarkers)
            .name("E");
        let mut plot = Plot::new();
        plot.add_trace(trace);
        plot.set_layout(Self::layout(labels));
        self.write("EigenValues.html", &plot)
    }

    fn wavefunction(&mut self, labels: &Labels, state: usize, amps: &[C64])
        -> RResult<()>
    {
        let sites: Vec<usize> = (0..amps.len()).collect();
        let re: Vec<f64> = amps.iter().map(|a| a.re).collect();
        let im: Vec<f64> = amps.iter().map(|a| a.im).collect();
        let mut plot = Plot::new();
        plot.add_trace(
            Scatter::new(sites.clone(), re).mode(Mode::LinesMarkers).name("Re"));
        plot.add_trace(
            Scatter::new(sites, im).mode(Mode::LinesMarkers).name("Im"));
        plot.set_layout(Self::layout(labels));
        self.write(&format!("WaveFunction{state}.html"), &plot)
    }
}
