use std::path::PathBuf;

use anyhow::Result;
use geoclust::{autocorrelation_table, write_autocorrelation_csv, NeighborGraph};

use crate::{cli::{Cli, MoranArgs}, commands};

pub fn run(_cli: &Cli, args: &MoranArgs) -> Result<()> {
    let mut config = commands::load_config(&args.input)?;
    if let Some(permutations) = args.permutations { config.permutations = permutations; }
    if let Some(weights) = args.weights { config.weights = weights.into(); }

    let layer = commands::load_layer(&args.input, &config)?;
    let graph = NeighborGraph::build(&layer, config.contiguity, config.tolerance)?;
    let attributes = match config.attributes.is_empty() {
        true => layer.attributes().names().to_vec(),
        false => config.attributes.clone(),
    };

    let table = autocorrelation_table(&layer, &graph, &attributes, &config.moran_params())?;
    for (name, result) in &table {
        println!("{name:>24}  I = {:+.4}  E[I] = {:+.4}  z = {:+.3}  p = {:.4}",
            result.statistic, result.expected, result.z_score, result.p_value);
    }

    let output = args.output.clone().unwrap_or_else(|| PathBuf::from("moran.csv"));
    write_autocorrelation_csv(&output, &table)?;
    println!("Wrote {} rows to {}", table.len(), output.display());
    Ok(())
}
