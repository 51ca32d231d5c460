use std::{ env, fs, path::PathBuf };
use anyhow::Context;
use ndarray as nd;
use ndarray_npy::NpzWriter;
use tracing::info;
use tracing_subscriber::EnvFilter;
use landau_zener::{
    config::Config,
    sim::{ self, Basis, InitialState },
};

fn init_logging() {
    let filter
        = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let config
        = match env::args().nth(1) {
            Some(path) => Config::load(&path)
                .with_context(|| format!("failed to load config from {path}"))?,
            None => Config::default(),
        };
    info!(params = ?config.params, samples = config.samples, "starting run");

    let cmp = sim::compare(&config).context("integration failed")?;
    // same physical evolution as the diabatic run, for the basis check
    let rotated
        = sim::run_basis(&config, Basis::Adiabatic, InitialState::DiabaticFirstLevel)
        .context("rotated-frame integration failed")?;
    let rotated_p = rotated.diabatic_probability(&config.params);
    let deviation
        = rotated_p.max_abs_diff(&cmp.diabatic.probability)
        .context("mismatched sample counts")?;
    info!(deviation, "rotated frame vs diabatic basis");

    println!("{cmp}");

    let energies: nd::Array2<f64> = cmp.eigen_energies();
    let p_final: nd::Array1<f64> = nd::Array1::from_vec(cmp.finals().to_vec());

    let outdir = PathBuf::from("output");
    fs::create_dir_all(&outdir)
        .with_context(|| format!("failed to create {}", outdir.display()))?;
    let outfile = outdir.join("landau_zener.npz");
    let file = fs::File::create(&outfile)
        .with_context(|| format!("failed to create {}", outfile.display()))?;
    let mut npz = NpzWriter::new(file);
    npz.add_array("t", &cmp.diabatic.probability.t)?;
    npz.add_array("e_minus", &energies.column(0))?;
    npz.add_array("e_plus", &energies.column(1))?;
    npz.add_array("p_diabatic", &cmp.diabatic.probability.p)?;
    npz.add_array("p_adiabatic", &cmp.adiabatic.probability.p)?;
    npz.add_array("p_adiabatic_diabatic_frame", &rotated_p.p)?;
    npz.add_array("p_final", &p_final)?;
    npz.finish()?;
    info!(path = %outfile.display(), "wrote output");

    Ok(())
}
