use std::path::PathBuf;

use anyhow::Result;

use crate::{cli::{Cli, KMeansArgs}, commands};

pub fn run(_cli: &Cli, args: &KMeansArgs) -> Result<()> {
    let mut config = commands::load_config(&args.input)?;
    if let Some(k) = args.k { config.kmeans.k = k; }
    if let Some(restarts) = args.restarts { config.kmeans.restarts = restarts; }
    if args.standardize { config.kmeans.standardize = true; }

    let layer = commands::load_layer(&args.input, &config)?;
    let attributes = match config.attributes.is_empty() {
        true => layer.attributes().names().to_vec(),
        false => config.attributes.clone(),
    };

    let result = config.kmeans_params().fit(&layer, &attributes)?;
    if result.degenerate {
        tracing::warn!("[kmeans] fewer distinct attribute vectors than k = {}", config.kmeans.k);
    }
    println!("k = {}, inertia = {:.4}, iterations = {}", result.assignment.k(), result.inertia, result.iterations);
    println!("cluster sizes: {:?}", result.assignment.sizes());

    let output = args.output.clone().unwrap_or_else(|| PathBuf::from("kmeans.csv"));
    result.assignment.write_csv(&output, "cluster")?;
    println!("Wrote labels to {}", output.display());

    if let Some(svg) = &args.svg {
        layer.to_svg_labels(svg, &result.assignment, None)?;
        println!("Wrote map to {}", svg.display());
    }
    Ok(())
}
