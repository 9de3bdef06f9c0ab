use std::path::PathBuf;

use anyhow::Result;
use geoclust::{dissolve, write_regions_geojson, NeighborGraph};

use crate::{cli::{Cli, RegionalizeArgs}, commands};

pub fn run(_cli: &Cli, args: &RegionalizeArgs) -> Result<()> {
    let mut config = commands::load_config(&args.input)?;
    if let Some(k) = args.k { config.regionalization.k = k; }
    if let Some(linkage) = args.linkage { config.regionalization.linkage = linkage.into(); }
    if args.standardize { config.regionalization.standardize = true; }

    let layer = commands::load_layer(&args.input, &config)?;
    let graph = NeighborGraph::build(&layer, config.contiguity, config.tolerance)?;
    let attributes = match config.attributes.is_empty() {
        true => layer.attributes().names().to_vec(),
        false => config.attributes.clone(),
    };

    let result = config.regionalization_params().fit(&layer, &graph, &attributes)?;
    println!("k = {}, merges = {}", result.assignment.k(), result.merges.len());
    println!("region sizes: {:?}", result.assignment.sizes());

    let output = args.output.clone().unwrap_or_else(|| PathBuf::from("regions.csv"));
    result.assignment.write_csv(&output, "region")?;
    println!("Wrote labels to {}", output.display());

    if args.regions.is_some() || args.svg.is_some() {
        let regions = dissolve(&layer, &result.assignment)?;
        if let Some(path) = &args.regions {
            write_regions_geojson(path, &regions)?;
            println!("Wrote {} regions to {}", regions.len(), path.display());
        }
        if let Some(svg) = &args.svg {
            let outlines = regions.into_iter().map(|region| region.geometry).collect::<Vec<_>>();
            layer.to_svg_labels(svg, &result.assignment, Some(&outlines))?;
            println!("Wrote map to {}", svg.display());
        }
    }
    Ok(())
}
