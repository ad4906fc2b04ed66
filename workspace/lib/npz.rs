//! Raw array output as a single `.npz` archive.

use std::{ fs, path::{ Path, PathBuf } };
use ndarray as nd;
use ndarray_npy::NpzWriter;
use num_complex::Complex64 as C64;
use tbspace::{
    error::RenderError,
    render::{ Labels, RResult, Renderer },
};

/// Collects the eigenvalues and wavefunctions, then writes them to
/// `<outdir>/qho.npz` on [`finish`][Renderer::finish] as arrays `e`, `wf_re`,
/// and `wf_im` (the latter two indexed `[state, site]`).
#[derive(Clone, Debug)]
pub struct NpzRenderer {
    outdir: PathBuf,
    evals: Vec<f64>,
    wfs: Vec<(usize, Vec<C64>)>,
}

impl NpzRenderer {
    pub fn new<P>(outdir: P) -> Self
    where P: AsRef<Path>
    {
        Self {
            outdir: outdir.as_ref().to_path_buf(),
            evals: Vec::new(),
            wfs: Vec::new(),
        }
    }

    pub fn path(&self) -> PathBuf { self.outdir.join("qho.npz") }

    fn stacked(&self) -> RResult<(nd::Array2<f64>, nd::Array2<f64>)> {
        let sites = self.wfs.first().map(|(_, amps)| amps.len()).unwrap_or(0);
        let mut re: nd::Array2<f64> = nd::Array2::zeros((self.wfs.len(), sites));
        let mut im: nd::Array2<f64> = nd::Array2::zeros((self.wfs.len(), sites));
        let mut wfs: Vec<&(usize, Vec<C64>)> = self.wfs.iter().collect();
        wfs.sort_by_key(|(state, _)| *state);
        for (k, (state, amps)) in wfs.into_iter().enumerate() {
            if amps.len() != sites {
                return Err(RenderError::new(format!(
                    "wavefunction {state} has {} sites, expected {sites}",
                    amps.len(),
                )));
            }
            re.row_mut(k).iter_mut().zip(amps).for_each(|(r, a)| { *r = a.re; });
            im.row_mut(k).iter_mut().zip(amps).for_each(|(i, a)| { *i = a.im; });
        }
        Ok((re, im))
    }
}

impl Renderer for NpzRenderer {
    fn eigenvalues(&mut self, _: &Labels, evals: &[f64]) -> RResult<()> {
        self.evals = evals.to_vec();
        Ok(())
    }

    fn wavefunction(&mut self, _: &Labels, state: usize, amps: &[C64])
        -> RResult<()>
    {
        self.wfs.push((state, amps.to_vec()));
        Ok(())
    }

    fn finish(&mut self) -> RResult<()> {
        let (re, im) = self.stacked()?;
        let e: nd::Array1<f64> = nd::Array1::from(self.evals.clone());
        fs::create_dir_all(&self.outdir).map_err(RenderError::new)?;
        let path = self.path();
        let file = fs::File::create(&path).map_err(RenderError::new)?;
        let mut npz = NpzWriter::new(file);
        npz.add_array("e", &e).map_err(RenderError::new)?;
        npz.add_array("wf_re", &re).map_err(RenderError::new)?;
        npz.add_array("wf_im", &im).map_err(RenderError::new)?;
        npz.finish().map_err(RenderError::new)?;
        log::debug!("npz: wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use ndarray_npy::NpzReader;
    use super::*;

    #[test]
    fn nothing_written_before_finish() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = NpzRenderer::new(dir.path());
        renderer.eigenvalues(&Labels::eigenvalues(), &[1.0]).unwrap();
        assert!(!renderer.path().exists());
    }

    #[test]
    fn archive_contents() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = NpzRenderer::new(dir.path().join("out"));
        renderer.eigenvalues(&Labels::eigenvalues(), &[-1.0, 1.0]).unwrap();
        let wf1 = [C64::new(0.0, 1.0), C64::new(0.5, 0.0)];
        let wf0 = [C64::new(1.0, 0.0), C64::new(0.0, -0.5)];
        renderer.wavefunction(&Labels::wavefunction(1), 1, &wf1).unwrap();
        renderer.wavefunction(&Labels::wavefunction(0), 0, &wf0).unwrap();
        renderer.finish().unwrap();

        let file = fs::File::open(renderer.path()).unwrap();
        let mut npz = NpzReader::new(file).unwrap();
        let e: nd::Array1<f64> = npz.by_name("e.npy").unwrap();
        let re: nd::Array2<f64> = npz.by_name("wf_re.npy").unwrap();
        let im: nd::Array2<f64> = npz.by_name("wf_im.npy").unwrap();
        assert_eq!(e, nd::array![-1.0, 1.0]);
        assert_eq!(re, nd::array![[1.0, 0.0], [0.0, 0.5]]);
        assert_eq!(im, nd::array![[0.0, -0.5], [1.0, 0.0]]);
    }

    #[test]
    fn ragged_wavefunctions_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut renderer = NpzRenderer::new(dir.path());
        renderer.wavefunction(&Labels::wavefunction(0), 0, &[C64::from(1.0)])
            .unwrap();
        renderer.wavefunction(&Labels::wavefunction(1), 1, &[C64::from(1.0); 2])
            .unwrap();
        assert!(renderer.finish().is_err());
        assert!(!renderer.path().exists());
    }
}
