use std::{fs::File, io::BufWriter};

use anyhow::{Context, Result};
use geoclust::NeighborGraph;
use serde_json::json;

use crate::{cli::{Cli, NeighborsArgs}, commands};

pub fn run(_cli: &Cli, args: &NeighborsArgs) -> Result<()> {
    let config = commands::load_config(&args.input)?;
    let layer = commands::load_layer(&args.input, &config)?;
    let graph = NeighborGraph::build(&layer, config.contiguity, config.tolerance)?;

    let islands = graph.islands();
    println!("areas:      {}", graph.len());
    println!("edges:      {}", graph.num_edges());
    println!("components: {}", graph.num_components());
    println!("islands:    {}", islands.len());
    for id in islands.iter().take(10) {
        println!("  {id}");
    }

    if let Some(path) = &args.output {
        let ids = graph.ids();
        let edges = graph.edges()
            .map(|(a, b)| [ids[a].as_str(), ids[b].as_str()])
            .collect::<Vec<_>>();
        let doc = json!({
            "contiguity": graph.rule(),
            "tolerance": graph.tolerance(),
            "areas": ids.iter().map(|id| id.as_str()).collect::<Vec<_>>(),
            "edges": edges,
        });
        let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
        serde_json::to_writer(BufWriter::new(file), &doc)?;
        println!("Wrote edge list to {}", path.display());
    }

    Ok(())
}
