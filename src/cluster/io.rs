use std::path::Path;

use anyhow::{ensure, Result};
use polars::prelude::{Column, DataFrame};

use crate::{cluster::ClusterAssignment, common};

impl ClusterAssignment {
    /// Write `area_id,<label_column>` rows in layer order.
    pub fn write_csv(&self, path: &Path, label_column: &str) -> Result<()> {
        write_label_table(path, &[(label_column, self)])
    }
}

/// Write several assignments over the same areas side by side:
/// `area_id,<name 1>,<name 2>,...`.
pub fn write_label_table(path: &Path, columns: &[(&str, &ClusterAssignment)]) -> Result<()> {
    ensure!(!columns.is_empty(), "[write_label_table] no label columns to write");
    let ids = columns[0].1.ids();
    for (name, assignment) in columns {
        ensure!(assignment.ids() == ids, "[write_label_table] column {name:?} covers different areas");
    }

    let mut frame = vec![Column::new("area_id".into(), ids.iter().map(|id| id.as_str()).collect::<Vec<_>>())];
    frame.extend(columns.iter().map(|(name, assignment)| Column::new((*name).into(), assignment.labels())));

    let mut df = DataFrame::new(frame)?;
    common::write_csv(&mut df, path)
}
