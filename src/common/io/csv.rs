use std::{fs::File, path::Path, sync::Arc};

use anyhow::{Context, Result};
use polars::{frame::DataFrame, io::{SerReader, SerWriter}, prelude::{CsvReadOptions, CsvReader, CsvWriter, DataType, Field, Schema}};

/// Reads a CSV file from `path` into a Polars DataFrame.
/// The `text_column`, when given, is read as strings to preserve leading zeros.
pub(crate) fn read_csv(path: &Path, text_column: Option<&str>) -> Result<DataFrame> {
    let file = File::open(path)
        .with_context(|| format!("[io::csv] Failed to open CSV file: {}", path.display()))?;

    let schema = text_column.map(|name| Arc::new(Schema::from_iter([Field::new(name.into(), DataType::String)])));
    let options = CsvReadOptions::default()
        .with_has_header(true)
        .with_schema_overwrite(schema);

    CsvReader::new(file)
        .with_options(options)
        .finish()
        .with_context(|| format!("[io::csv] Failed to read CSV from {}", path.display()))
}

/// Write a DataFrame to a CSV file.
pub(crate) fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("[io::csv] Failed to create CSV file: {}", path.display()))?;
    CsvWriter::new(file)
        .finish(df)
        .with_context(|| format!("[io::csv] Failed to write CSV to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, DataFrame};

    #[test]
    fn text_column_keeps_leading_zeros() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.csv");
        let mut df = DataFrame::new(vec![
            Column::new("code".into(), ["007", "010"]),
            Column::new("rating".into(), [4.5, 3.0]),
        ]).unwrap();
        write_csv(&mut df, &path).unwrap();

        let read = read_csv(&path, Some("code")).unwrap();
        let codes = read.column("code").unwrap().str().unwrap().into_no_null_iter().collect::<Vec<_>>();
        assert_eq!(codes, vec!["007", "010"]);
        assert_eq!(read.column("rating").unwrap().f64().unwrap().get(0), Some(4.5));
    }
}
