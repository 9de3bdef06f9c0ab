pub mod kmeans;
pub mod moran;
pub mod neighbors;
pub mod regionalize;
pub mod run_all;

use anyhow::{Context, Result};
use geoclust::{AnalysisConfig, AreaLayer};

use crate::cli::InputArgs;

/// Read the config file (if any) and apply the input flags on top of it.
pub fn load_config(input: &InputArgs) -> Result<AnalysisConfig> {
    let mut config = match &input.config {
        Some(path) => AnalysisConfig::from_json_file(path)?,
        None => AnalysisConfig::default(),
    };

    if input.id_column.is_some() { config.id_column = input.id_column.clone(); }
    if !input.attributes.is_empty() { config.attributes = input.attributes.clone(); }
    if let Some(rule) = input.contiguity { config.contiguity = rule.into(); }
    if let Some(tolerance) = input.tolerance { config.tolerance = tolerance; }
    if let Some(seed) = input.seed { config.seed = seed; }
    Ok(config)
}

/// Load the polygon layer and join the attribute CSV, if one was given.
pub fn load_layer(input: &InputArgs, config: &AnalysisConfig) -> Result<AreaLayer> {
    let layer = AreaLayer::read(&input.input, config.id_column.as_deref())
        .with_context(|| format!("Failed to load areas from {}", input.input.display()))?;
    tracing::info!("[load] {} areas, {} attribute columns", layer.len(), layer.attributes().num_columns());

    let Some(join) = &input.join else { return Ok(layer) };
    let column = input.join_column.as_deref()
        .or(config.id_column.as_deref())
        .unwrap_or("id");
    layer.join_csv(join, column)
}
