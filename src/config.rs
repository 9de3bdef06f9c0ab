use std::{fs, path::Path};

use anyhow::{Context, Result};
use geograph::{Contiguity, ContiguityBuilder};
use serde::{Deserialize, Serialize};

use crate::{
    cluster::{KMeans, Linkage, Regionalization},
    stats::{MoranParams, WeightTransform},
};

/// Analysis settings, read from a JSON file. Every field has a default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Property / field holding the area identifier.
    pub id_column: Option<String>,
    /// Attribute columns to analyse; empty means every numeric column.
    pub attributes: Vec<String>,
    pub contiguity: Contiguity,
    /// Boundary contact tolerance, in the data's coordinate units.
    pub tolerance: f64,
    pub weights: WeightTransform,
    pub permutations: usize,
    /// Seed for every randomized stage.
    pub seed: u64,
    pub kmeans: KMeansConfig,
    pub regionalization: RegionalizationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KMeansConfig {
    pub k: usize,
    pub restarts: usize,
    pub max_iterations: usize,
    pub tolerance: f64,
    pub standardize: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegionalizationConfig {
    pub k: usize,
    pub linkage: Linkage,
    pub standardize: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            id_column: None,
            attributes: Vec::new(),
            contiguity: Contiguity::Queen,
            tolerance: ContiguityBuilder::DEFAULT_TOLERANCE,
            weights: WeightTransform::Row,
            permutations: 999,
            seed: 0,
            kmeans: KMeansConfig::default(),
            regionalization: RegionalizationConfig::default(),
        }
    }
}

impl Default for KMeansConfig {
    fn default() -> Self {
        let base = KMeans::default();
        Self {
            k: base.k,
            restarts: base.restarts,
            max_iterations: base.max_iterations,
            tolerance: base.tolerance,
            standardize: base.standardize,
        }
    }
}

impl Default for RegionalizationConfig {
    fn default() -> Self {
        let base = Regionalization::default();
        Self { k: base.k, linkage: base.linkage, standardize: base.standardize }
    }
}

impl AnalysisConfig {
    /// Load a configuration from a JSON file; absent fields take defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("[AnalysisConfig] Failed to read config file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("[AnalysisConfig] Failed to parse config file: {}", path.display()))
    }

    pub fn moran_params(&self) -> MoranParams {
        MoranParams { transform: self.weights, permutations: self.permutations, seed: self.seed }
    }

    pub fn kmeans_params(&self) -> KMeans {
        KMeans {
            k: self.kmeans.k,
            restarts: self.kmeans.restarts,
            max_iterations: self.kmeans.max_iterations,
            tolerance: self.kmeans.tolerance,
            seed: self.seed,
            standardize: self.kmeans.standardize,
        }
    }

    pub fn regionalization_params(&self) -> Regionalization {
        Regionalization {
            k: self.regionalization.k,
            linkage: self.regionalization.linkage,
            standardize: self.regionalization.standardize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_takes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        fs::write(&path, r#"{
            "id_column": "MSOA_CODE",
            "contiguity": "rook",
            "weights": "binary",
            "seed": 12345,
            "kmeans": { "k": 7 },
            "regionalization": { "linkage": "average" }
        }"#).unwrap();

        let config = AnalysisConfig::from_json_file(&path).unwrap();
        assert_eq!(config.id_column.as_deref(), Some("MSOA_CODE"));
        assert_eq!(config.contiguity, Contiguity::Rook);
        assert_eq!(config.tolerance, 1e-9);
        assert_eq!(config.permutations, 999);

        let kmeans = config.kmeans_params();
        assert_eq!((kmeans.k, kmeans.restarts, kmeans.seed), (7, 10, 12345));
        assert_eq!(config.regionalization_params().linkage, Linkage::Average);
        assert_eq!(config.moran_params().transform, WeightTransform::Binary);
    }

    #[test]
    fn malformed_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("analysis.json");
        fs::write(&path, r#"{ "contiguity": "bishop" }"#).unwrap();
        assert!(AnalysisConfig::from_json_file(&path).is_err());
        assert!(AnalysisConfig::from_json_file(&dir.path().join("none.json")).is_err());
    }
}
