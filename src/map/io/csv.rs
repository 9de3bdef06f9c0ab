use std::path::Path;

use ahash::AHashMap;
use anyhow::{anyhow, Context, Result};
use polars::prelude::DataType;

use crate::{common, map::AreaLayer};

impl AreaLayer {
    /// Join the numeric columns of a CSV onto the layer by area id.
    ///
    /// Areas absent from the CSV get missing values; CSV rows whose id is not in
    /// the layer are skipped with a warning. Text columns are ignored, and a
    /// joined column replaces an existing column of the same name.
    pub fn join_csv(self, path: &Path, id_column: &str) -> Result<Self> {
        common::require_file_exists(path)?;
        let df = common::read_csv(path, Some(id_column))?;

        let ids = df.column(id_column)
            .with_context(|| format!("[AreaLayer::join_csv] {} has no {id_column:?} column", path.display()))?
            .str()?
            .into_iter()
            .collect::<Vec<_>>();

        // layer position -> CSV row
        let mut rows = AHashMap::with_capacity(ids.len());
        let mut unknown = 0;
        for (row, id) in ids.iter().enumerate() {
            let id = id.ok_or_else(|| anyhow!("[AreaLayer::join_csv] row {row} has an empty id"))?;
            match self.index_of(id) {
                Some(idx) => { rows.insert(idx, row); }
                None => unknown += 1,
            }
        }
        if unknown > 0 {
            tracing::warn!("[AreaLayer::join_csv] skipped {unknown} rows of {} with ids not in the layer", path.display());
        }

        let mut attributes = self.attributes().clone();
        for column in df.get_columns() {
            if column.name().as_str() == id_column || matches!(column.dtype(), DataType::String) { continue }

            let values = column.cast(&DataType::Float64)
                .with_context(|| format!("[AreaLayer::join_csv] column {:?} is not numeric", column.name()))?;
            let values = values.f64()?;
            let joined = (0..self.len())
                .map(|idx| rows.get(&idx).and_then(|&row| values.get(row)).unwrap_or(f64::NAN))
                .collect();
            attributes.push_column(column.name().to_string(), joined)?;
        }

        tracing::debug!("[AreaLayer::join_csv] matched {} areas, {} attribute columns", rows.len(), attributes.num_columns());
        Ok(self.with_attributes(attributes)?)
    }
}
