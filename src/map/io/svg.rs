use std::{io::Write, path::Path};

use anyhow::{anyhow, ensure, Result};
use geo::MultiPolygon;

use crate::{cluster::ClusterAssignment, common, map::AreaLayer};

const WIDTH: f64 = 1200.0;
const MARGIN: f64 = 10.0;

impl AreaLayer {
    /// Choropleth of cluster labels; `overlay` outlines are drawn on top.
    pub fn to_svg_labels(&self, path: &Path, assignment: &ClusterAssignment, overlay: Option<&[MultiPolygon<f64>]>) -> Result<()> {
        ensure!(assignment.ids() == self.ids(), "[to_svg_labels] assignment covers different areas");
        let fills = assignment.labels().iter()
            .map(|&label| common::golden_angle_color(label as usize).to_string())
            .collect::<Vec<_>>();
        self.write_svg(path, &fills, overlay)
    }

    /// Choropleth of one attribute on a sequential ramp; missing values are grey.
    pub fn to_svg_values(&self, path: &Path, attribute: &str, overlay: Option<&[MultiPolygon<f64>]>) -> Result<()> {
        let values = self.attributes().column(attribute)?;
        let (lo, hi) = values.iter()
            .filter(|v| !v.is_nan())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        let fills = values.iter()
            .map(|&v| {
                let t = match v {
                    v if v.is_nan() => f64::NAN,
                    v if hi > lo => (v - lo) / (hi - lo),
                    _ => 0.5,
                };
                common::sequential_color(t).to_string()
            })
            .collect::<Vec<_>>();
        self.write_svg(path, &fills, overlay)
    }

    fn write_svg(&self, path: &Path, fills: &[String], overlay: Option<&[MultiPolygon<f64>]>) -> Result<()> {
        let bounds = self.geometries().bounds()
            .ok_or_else(|| anyhow!("[to_svg] Could not determine bounds; nothing to draw."))?;
        let (project, height) = common::Projection::fit(bounds, WIDTH, MARGIN);

        let mut writer = common::SvgWriter::create(path)?;
        writer.write_header(WIDTH, height, &bounds)?;
        writer.write_styles()?;
        common::draw_polygons_with_fill(&mut writer, self.shapes(), fills, &project)?;
        if let Some(overlay) = overlay {
            common::draw_outlines(&mut writer, overlay, &project)?;
        }
        writer.write_footer()?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::map::{AreaId, AttributeTable};
    use geo::polygon;

    fn make_test_layer() -> AreaLayer {
        let cell = |x: f64| MultiPolygon(vec![polygon![(x: x, y: 0.0), (x: x + 1.0, y: 0.0), (x: x + 1.0, y: 1.0), (x: x, y: 1.0)]]);
        AreaLayer::new(
            vec![AreaId::from("a"), AreaId::from("b")],
            vec![cell(0.0), cell(1.0)],
            AttributeTable::from_columns(vec![("rating".into(), vec![1.0, f64::NAN])]).unwrap(),
        ).unwrap()
    }

    #[test]
    fn label_map_has_one_path_per_area_plus_overlay() {
        let layer = make_test_layer();
        let assignment = ClusterAssignment::new(layer.ids().to_vec(), vec![0, 1], 2).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("labels.svg");
        layer.to_svg_labels(&path, &assignment, Some(&layer.shapes()[..1])).unwrap();

        let svg = fs::read_to_string(&path).unwrap();
        assert_eq!(svg.matches(r#"class="area""#).count(), 2);
        assert_eq!(svg.matches(r#"class="outline""#).count(), 1);
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn value_map_greys_out_missing() {
        let layer = make_test_layer();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rating.svg");
        layer.to_svg_values(&path, "rating", None).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("rgb(150,150,150)"));
        assert!(layer.to_svg_values(&path, "price", None).is_err());
    }
}
