use std::fs;

use approx::assert_relative_eq;
use geoclust::{Analysis, AnalysisConfig, AreaLayer, Contiguity, Linkage, NeighborGraph};
use serde_json::{json, Value};

/// `n`×`n` unit squares; `income` is high on the western half.
fn grid_geojson(n: usize) -> String {
    let features = (0..n * n)
        .map(|i| {
            let (x, y) = ((i % n) as f64, (i / n) as f64);
            json!({
                "type": "Feature",
                "properties": {
                    "code": format!("A{i:02}"),
                    "income": if (x as usize) < n / 2 { 10.0 } else { 0.0 },
                    "households": 100 + i,
                },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[x, y], [x + 1.0, y], [x + 1.0, y + 1.0], [x, y + 1.0], [x, y]]],
                },
            })
        })
        .collect::<Vec<_>>();
    json!({ "type": "FeatureCollection", "features": features }).to_string()
}

/// Two halves of the same extent, as an alternate partition.
fn halves_geojson(n: usize) -> String {
    let half = (n / 2) as f64;
    let full = n as f64;
    let feature = |id: &str, x0: f64, x1: f64| json!({
        "type": "Feature",
        "properties": { "name": id },
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[x0, 0.0], [x1, 0.0], [x1, full], [x0, full], [x0, 0.0]]],
        },
    });
    json!({ "type": "FeatureCollection", "features": [feature("west", 0.0, half), feature("east", half, full)] })
        .to_string()
}

fn make_config() -> AnalysisConfig {
    let mut config = AnalysisConfig::default();
    config.id_column = Some("code".into());
    config.attributes = vec!["income".into()];
    config.permutations = 199;
    config.seed = 7;
    config.kmeans.k = 2;
    config.regionalization.k = 2;
    config
}

#[test]
fn full_run_writes_every_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("grid.geojson");
    let overlay = dir.path().join("halves.geojson");
    fs::write(&input, grid_geojson(4)).unwrap();
    fs::write(&overlay, halves_geojson(4)).unwrap();

    let config = make_config();
    let layer = AreaLayer::read(&input, config.id_column.as_deref()).unwrap();
    let partition = AreaLayer::read(&overlay, Some("name")).unwrap();
    assert_eq!(layer.len(), 16);
    assert_eq!(layer.attributes().names(), &["households".to_string(), "income".to_string()]);

    let analysis = Analysis::new(layer, config).unwrap();
    assert_eq!(analysis.graph().num_components(), 1);

    let out = dir.path().join("out");
    let report = analysis.run(&out, Some(&partition)).unwrap();

    for name in ["moran.csv", "labels.csv", "regions.geojson", "kmeans.svg", "regions.svg", "crosswalk.csv"] {
        assert!(out.join(name).is_file(), "missing {name}");
    }

    let (name, moran) = &report.autocorrelation[0];
    assert_eq!(name, "income");
    assert!(moran.statistic > 0.5);
    assert!(moran.p_value < 0.05);
    assert_relative_eq!(moran.expected, -1.0 / 15.0);

    let regions = &report.regionalization.assignment;
    assert!(regions.is_contiguous(analysis.graph()));
    assert_eq!(regions.sizes(), vec![8, 8]);
    assert_eq!(report.regionalization.merges.len(), 14);
    assert_eq!(report.kmeans.assignment.sizes(), vec![8, 8]);
    assert_relative_eq!(report.kmeans.inertia, 0.0);

    let labels = fs::read_to_string(out.join("labels.csv")).unwrap();
    assert_eq!(labels.lines().next(), Some("area_id,kmeans,region"));
    assert_eq!(labels.lines().count(), 17);

    let crosswalk = fs::read_to_string(out.join("crosswalk.csv")).unwrap();
    assert!(crosswalk.lines().any(|line| line == "A00,west"));
    assert!(crosswalk.lines().any(|line| line == "A03,east"));

    let geojson: Value = serde_json::from_str(&fs::read_to_string(out.join("regions.geojson")).unwrap()).unwrap();
    let features = geojson["features"].as_array().unwrap();
    assert_eq!(features.len(), 2);
    let total_area = features.iter().map(|f| f["properties"]["area"].as_f64().unwrap()).sum::<f64>();
    assert_relative_eq!(total_area, 16.0, epsilon = 1e-9);
}

#[test]
fn rook_and_queen_differ_on_diagonals() {
    let layer = AreaLayer::from_geojson_str(&grid_geojson(3), Some("code")).unwrap();
    let queen = NeighborGraph::build(&layer, Contiguity::Queen, 1e-9).unwrap();
    let rook = NeighborGraph::build(&layer, Contiguity::Rook, 1e-9).unwrap();
    assert_eq!(rook.num_edges(), 12);
    assert_eq!(queen.num_edges(), 20);
    assert_eq!(queen.degree(4), 8);
    assert_eq!(rook.degree(4), 4);
}

#[test]
fn regionalization_respects_contiguity_for_every_linkage() {
    let layer = AreaLayer::from_geojson_str(&grid_geojson(6), Some("code")).unwrap();
    let graph = NeighborGraph::build(&layer, Contiguity::Rook, 1e-9).unwrap();
    for linkage in [Linkage::Ward, Linkage::Average, Linkage::Complete, Linkage::Single] {
        let mut config = make_config();
        config.regionalization.k = 5;
        config.regionalization.linkage = linkage;
        config.attributes = vec!["income".into(), "households".into()];
        let result = config.regionalization_params().fit(&layer, &graph, &config.attributes).unwrap();
        assert_eq!(result.assignment.k(), 5);
        assert!(result.assignment.is_contiguous(&graph), "{linkage:?} produced a split region");
    }
}

#[test]
fn config_round_trips_through_json() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(&path, r#"{ "contiguity": "rook", "kmeans": { "k": 3 }, "regionalization": { "linkage": "average" } }"#).unwrap();
    let config = AnalysisConfig::from_json_file(&path).unwrap();
    assert_eq!(config.contiguity, Contiguity::Rook);
    assert_eq!(config.kmeans.k, 3);
    assert_eq!(config.regionalization.linkage, Linkage::Average);
    assert_eq!(config.permutations, 999);
}
