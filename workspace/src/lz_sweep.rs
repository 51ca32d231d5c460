use std::{ fs, path::PathBuf };
use anyhow::Context;
use ndarray as nd;
use ndarray_npy::NpzWriter;
use rayon::prelude::*;
use tracing::{ debug, info };
use tracing_subscriber::EnvFilter;
use landau_zener::{
    analytical::analytical_probability_for,
    config::Config,
    error::LZResult,
    params::Params,
    sim::{ run_basis, Basis, InitialState },
};

const SLOPES: [f64; 4] = [0.05, 0.1, 0.2, 0.5];
const NUM_COUPLINGS: usize = 40;
// only the final value is kept, so the window needs few samples
const SAMPLES: usize = 2;

fn init_logging() {
    let filter
        = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// diabatic-basis and closed-form transition probabilities at one grid point
fn point(w: f64, a: f64) -> LZResult<(f64, f64)> {
    let params = Params::default().with_w(w)?.with_a(a)?;
    let config = Config { params, samples: SAMPLES, ..Config::default() };
    let run = run_basis(&config, Basis::Diabatic, InitialState::FirstLevel)?;
    let analytical = analytical_probability_for(&params);
    debug!(w, a, p_final = run.probability.p_final, analytical, "sweep point");
    Ok((run.probability.p_final, analytical))
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let w: nd::Array1<f64> = nd::Array1::logspace(10.0, -2.0, 0.5, NUM_COUPLINGS);
    let a: nd::Array1<f64> = nd::Array1::from_vec(SLOPES.to_vec());
    info!(couplings = w.len(), slopes = a.len(), "starting sweep");

    let grid: Vec<(f64, f64)>
        = w.iter()
        .flat_map(|&wk| a.iter().map(move |&ak| (wk, ak)))
        .collect();
    let results: Vec<(f64, f64)>
        = grid.into_par_iter()
        .map(|(wk, ak)| point(wk, ak))
        .collect::<LZResult<Vec<_>>>()
        .context("sweep point failed")?;

    let shape = (w.len(), a.len());
    let p_numerical: nd::Array2<f64>
        = nd::Array2::from_shape_vec(
            shape, results.iter().map(|(p, _)| *p).collect())?;
    let p_analytical: nd::Array2<f64>
        = nd::Array2::from_shape_vec(
            shape, results.iter().map(|(_, p)| *p).collect())?;
    let worst
        = (&p_numerical - &p_analytical).iter()
        .fold(0.0_f64, |acc, d| acc.max(d.abs()));
    info!(worst, "largest deviation from the closed form");

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)
        .with_context(|| format!("failed to create {}", outdir.display()))?;
    let outfile = outdir.join("lz_sweep.npz");
    let file = fs::File::create(&outfile)
        .with_context(|| format!("failed to create {}", outfile.display()))?;
    let mut npz = NpzWriter::new(file);
    npz.add_array("w", &w)?;
    npz.add_array("a", &a)?;
    npz.add_array("p_numerical", &p_numerical)?;
    npz.add_array("p_analytical", &p_analytical)?;
    npz.finish()?;
    info!(path = %outfile.display(), "wrote output");

    Ok(())
}
