use std::{collections::BTreeMap, path::Path};

use anyhow::{bail, Context, Result};
use shapefile::{dbase::FieldValue, Reader, Shape};

use crate::{common, map::{AreaId, AreaLayer, AttributeTable}};

impl AreaLayer {
    /// Read polygons and their `.dbf` attributes from a `.shp` file.
    ///
    /// Area ids come from the `id_column` field when given, otherwise from the
    /// record position. Numeric fields become attribute columns ordered by name.
    pub fn read_shapefile(path: &Path, id_column: Option<&str>) -> Result<Self> {
        common::require_file_exists(path)?;
        let mut reader = Reader::from_path(path)
            .with_context(|| format!("[AreaLayer::read_shapefile] Failed to open shapefile: {}", path.display()))?;

        let mut ids = Vec::new();
        let mut shapes = Vec::new();
        // None marks a field holding non-numeric values
        let mut fields: BTreeMap<String, Option<Vec<f64>>> = BTreeMap::new();

        for (row, result) in reader.iter_shapes_and_records().enumerate() {
            let (shape, record) = result
                .with_context(|| format!("[AreaLayer::read_shapefile] Error reading record {row}"))?;

            let polygon = match shape {
                Shape::Polygon(polygon) => polygon,
                Shape::NullShape => bail!("[AreaLayer::read_shapefile] record {row} has no geometry"),
                other => bail!("[AreaLayer::read_shapefile] record {row} is a {:?}, expected Polygon", other.shapetype()),
            };
            shapes.push(common::shp_to_geo(&polygon));

            let mut id = None;
            for (name, value) in record {
                if Some(name.as_str()) == id_column {
                    id = Some(field_to_id(&name, value)?);
                    continue;
                }
                let column = fields.entry(name).or_insert_with(|| Some(vec![f64::NAN; row]));
                match (column, numeric_value(&value)) {
                    (Some(values), Some(v)) => values.push(v),
                    (column, None) => *column = None,
                    (None, Some(_)) => {}
                }
            }

            ids.push(match (id, id_column) {
                (Some(id), _) => id,
                (None, Some(column)) => bail!("[AreaLayer::read_shapefile] record {row} has no {column:?} field"),
                (None, None) => AreaId::from(row.to_string()),
            });
        }

        let columns = fields.into_iter()
            .filter_map(|(name, values)| values.map(|values| (name, values)))
            .collect::<Vec<_>>();
        let attributes = if columns.is_empty() {
            AttributeTable::empty(ids.len())
        } else {
            AttributeTable::from_columns(columns)?
        };

        tracing::debug!("[AreaLayer::read_shapefile] {} areas, {} numeric fields from {}", ids.len(), attributes.num_columns(), path.display());
        Ok(Self::new(ids, shapes, attributes)?)
    }
}

/// Numeric dBase value; `Some(NaN)` for an empty numeric cell, `None` for text.
fn numeric_value(value: &FieldValue) -> Option<f64> {
    match value {
        FieldValue::Numeric(n) => Some(n.unwrap_or(f64::NAN)),
        FieldValue::Float(n) => Some(n.map_or(f64::NAN, f64::from)),
        FieldValue::Double(n) | FieldValue::Currency(n) => Some(*n),
        FieldValue::Integer(n) => Some(f64::from(*n)),
        _ => None,
    }
}

fn field_to_id(name: &str, value: FieldValue) -> Result<AreaId> {
    match value {
        FieldValue::Character(Some(s)) => Ok(AreaId::from(s.trim())),
        FieldValue::Numeric(Some(n)) => Ok(AreaId::from(n.to_string())),
        FieldValue::Integer(n) => Ok(AreaId::from(n.to_string())),
        _ => bail!("missing or invalid id field: {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells() {
        assert_eq!(numeric_value(&FieldValue::Integer(3)), Some(3.0));
        assert!(numeric_value(&FieldValue::Numeric(None)).unwrap().is_nan());
        assert_eq!(numeric_value(&FieldValue::Character(Some("E02".into()))), None);
    }

    #[test]
    fn ids_from_fields() {
        assert_eq!(field_to_id("code", FieldValue::Character(Some(" E02000001 ".into()))).unwrap().as_str(), "E02000001");
        assert_eq!(field_to_id("code", FieldValue::Numeric(Some(12.0))).unwrap().as_str(), "12");
        assert!(field_to_id("code", FieldValue::Character(None)).is_err());
    }

    fn square(x0: f64, y0: f64, side: f64) -> Vec<shapefile::Point> {
        vec![
            shapefile::Point::new(x0, y0),
            shapefile::Point::new(x0, y0 + side),
            shapefile::Point::new(x0 + side, y0 + side),
            shapefile::Point::new(x0 + side, y0),
        ]
    }

    fn record(code: &str, pop: f64, name: &str) -> shapefile::dbase::Record {
        let mut record = shapefile::dbase::Record::default();
        record.insert("code".into(), FieldValue::Character(Some(code.into())));
        record.insert("pop".into(), FieldValue::Numeric(Some(pop)));
        record.insert("name".into(), FieldValue::Character(Some(name.into())));
        record
    }

    #[test]
    fn reads_polygons_and_fields_written_to_disk() {
        use geo::Area;
        use shapefile::{dbase::TableWriterBuilder, Polygon, PolygonRing, Writer};

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("areas.shp");
        {
            let table = TableWriterBuilder::new()
                .add_character_field("code".try_into().unwrap(), 12)
                .add_numeric_field("pop".try_into().unwrap(), 10, 2)
                .add_character_field("name".try_into().unwrap(), 20);
            let mut writer = Writer::from_path(&path, table).unwrap();

            let plain = Polygon::new(PolygonRing::Outer(square(0.0, 0.0, 1.0)));
            let holed = Polygon::with_rings(vec![
                PolygonRing::Outer(square(1.0, 0.0, 4.0)),
                PolygonRing::Inner(square(2.0, 1.0, 1.0)),
            ]);
            writer.write_shape_and_record(&plain, &record("E01", 1200.0, "Camden")).unwrap();
            writer.write_shape_and_record(&holed, &record("E02", 850.5, "Hackney")).unwrap();
        }

        let layer = AreaLayer::read_shapefile(&path, Some("code")).unwrap();
        assert_eq!(layer.ids(), &[AreaId::from("E01"), AreaId::from("E02")]);
        assert_eq!(layer.attributes().names(), &["pop".to_string()]);
        assert_eq!(layer.column("pop").unwrap(), vec![1200.0, 850.5]);

        let holed = &layer.shapes()[1];
        assert_eq!(holed.0.len(), 1);
        assert_eq!(holed.0[0].interiors().len(), 1);
        assert!((holed.unsigned_area() - 15.0).abs() < 1e-9);

        let by_position = AreaLayer::read_shapefile(&path, None).unwrap();
        assert_eq!(by_position.ids()[1].as_str(), "1");
        assert!(AreaLayer::read_shapefile(&path, Some("msoa")).is_err());
    }

    #[test]
    fn missing_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AreaLayer::read_shapefile(&dir.path().join("areas.shp"), None).is_err());
    }
}
