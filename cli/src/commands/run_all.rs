use std::path::PathBuf;

use anyhow::Result;
use geoclust::{Analysis, AreaLayer};

use crate::{cli::{Cli, RunArgs}, commands};

pub fn run(_cli: &Cli, args: &RunArgs) -> Result<()> {
    let config = commands::load_config(&args.input)?;
    let layer = commands::load_layer(&args.input, &config)?;
    let overlay = args.overlay.as_deref()
        .map(|path| AreaLayer::read(path, args.overlay_id_column.as_deref()))
        .transpose()?;

    let output = args.output.clone().unwrap_or_else(|| PathBuf::from("geoclust-out"));
    let analysis = Analysis::new(layer, config)?;
    let report = analysis.run(&output, overlay.as_ref())?;

    for (name, result) in &report.autocorrelation {
        println!("{name:>24}  I = {:+.4}  p = {:.4}", result.statistic, result.p_value);
    }
    println!("k-means: inertia = {:.4}, sizes = {:?}", report.kmeans.inertia, report.kmeans.assignment.sizes());
    println!("regions: {} dissolved, sizes = {:?}", report.regions.len(), report.regionalization.assignment.sizes());
    println!("Wrote results to {}", output.display());
    Ok(())
}
