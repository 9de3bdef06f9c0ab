use std::{path::Path, sync::Arc};

use anyhow::Result;
use polars::prelude::{Column, DataFrame};

use crate::{
    cluster::{write_label_table, KMeansResult, RegionalizationResult},
    common,
    config::AnalysisConfig,
    error::{ClusterError, ClusterResult},
    graph::NeighborGraph,
    map::AreaLayer,
    region::{dissolve, write_regions_geojson, Region},
    stats::{autocorrelation_table, write_autocorrelation_csv, MoranResult},
    ClusterAssignment,
};

/// A layer, its neighbor graph, and the settings every stage reads.
///
/// Stages take `&self` and return fresh values; the shared layer and graph
/// are never mutated.
#[derive(Debug, Clone)]
pub struct Analysis {
    layer: Arc<AreaLayer>,
    graph: Arc<NeighborGraph>,
    config: AnalysisConfig,
}

/// Everything produced by [`Analysis::run`].
#[derive(Debug, Clone)]
pub struct Report {
    pub autocorrelation: Vec<(String, MoranResult)>,
    pub kmeans: KMeansResult,
    pub regionalization: RegionalizationResult,
    pub regions: Vec<Region>,
}

impl Analysis {
    /// Build the neighbor graph for `layer` under the configured contiguity rule.
    pub fn new(layer: impl Into<Arc<AreaLayer>>, config: AnalysisConfig) -> ClusterResult<Self> {
        let layer = layer.into();
        let graph = NeighborGraph::build(&layer, config.contiguity, config.tolerance)?;
        if !graph.islands().is_empty() {
            tracing::warn!("[Analysis] {} areas have no neighbors", graph.islands().len());
        }
        Ok(Self { layer, graph: Arc::new(graph), config })
    }

    #[inline] pub fn layer(&self) -> &Arc<AreaLayer> { &self.layer }

    #[inline] pub fn graph(&self) -> &Arc<NeighborGraph> { &self.graph }

    #[inline] pub fn config(&self) -> &AnalysisConfig { &self.config }

    /// Configured attribute columns, or every column of the layer.
    pub fn attributes(&self) -> Vec<String> {
        if self.config.attributes.is_empty() {
            self.layer.attributes().names().to_vec()
        } else {
            self.config.attributes.clone()
        }
    }

    fn require_attributes(&self) -> ClusterResult<Vec<String>> {
        let attributes = self.attributes();
        if attributes.is_empty() {
            return Err(ClusterError::invalid_parameter("layer has no numeric attribute columns"));
        }
        Ok(attributes)
    }

    /// Moran's I for every attribute.
    pub fn autocorrelation(&self) -> ClusterResult<Vec<(String, MoranResult)>> {
        autocorrelation_table(&self.layer, &self.graph, &self.require_attributes()?, &self.config.moran_params())
    }

    /// Geodemographic classification over all attributes.
    pub fn kmeans(&self) -> ClusterResult<KMeansResult> {
        self.config.kmeans_params().fit(&self.layer, &self.require_attributes()?)
    }

    /// Spatially constrained regionalization over all attributes.
    pub fn regionalize(&self) -> ClusterResult<RegionalizationResult> {
        self.config.regionalization_params().fit(&self.layer, &self.graph, &self.require_attributes()?)
    }

    pub fn dissolve(&self, assignment: &ClusterAssignment) -> ClusterResult<Vec<Region>> {
        dissolve(&self.layer, assignment)
    }

    /// Run every stage and write the results into `out_dir`:
    /// `moran.csv`, `labels.csv`, `regions.geojson`, `kmeans.svg`, `regions.svg`,
    /// and `crosswalk.csv` when an alternate partition is given.
    pub fn run(&self, out_dir: &Path, partition: Option<&AreaLayer>) -> Result<Report> {
        common::ensure_dir_exists(out_dir)?;

        let autocorrelation = self.autocorrelation()?;
        write_autocorrelation_csv(&out_dir.join("moran.csv"), &autocorrelation)?;

        let kmeans = self.kmeans()?;
        let regionalization = self.regionalize()?;
        write_label_table(&out_dir.join("labels.csv"), &[
            ("kmeans", &kmeans.assignment),
            ("region", &regionalization.assignment),
        ])?;

        let regions = self.dissolve(&regionalization.assignment)?;
        write_regions_geojson(&out_dir.join("regions.geojson"), &regions)?;

        let outlines = match partition {
            Some(other) => other.shapes().to_vec(),
            None => regions.iter().map(|r| r.geometry.clone()).collect(),
        };
        self.layer.to_svg_labels(&out_dir.join("kmeans.svg"), &kmeans.assignment, Some(&outlines))?;
        self.layer.to_svg_labels(&out_dir.join("regions.svg"), &regionalization.assignment, Some(&outlines))?;

        if let Some(other) = partition {
            self.write_crosswalk(&out_dir.join("crosswalk.csv"), other)?;
        }

        tracing::info!("[Analysis::run] wrote results to {}", out_dir.display());
        Ok(Report { autocorrelation, kmeans, regionalization, regions })
    }

    /// Write `area_id,partition_id` rows mapping each area into `other`.
    pub fn write_crosswalk(&self, path: &Path, other: &AreaLayer) -> Result<()> {
        let hits = self.layer.crosswalk(other);
        let unmatched = hits.iter().filter(|hit| hit.is_none()).count();
        if unmatched > 0 {
            tracing::warn!("[crosswalk] {unmatched} areas fall outside the alternate partition");
        }

        let mut df = DataFrame::new(vec![
            Column::new("area_id".into(), self.layer.ids().iter().map(|id| id.as_str()).collect::<Vec<_>>()),
            Column::new("partition_id".into(), hits.iter().map(|hit| hit.map(|id| id.as_str())).collect::<Vec<_>>()),
        ])?;
        common::write_csv(&mut df, path)
    }
}
