use std::path::Path;

use anyhow::Result;
use polars::prelude::{Column, DataFrame};

use crate::{common, stats::MoranResult};

/// Write `attribute,moran_i,expected,z_score,p_value,permutations` rows.
pub fn write_autocorrelation_csv(path: &Path, table: &[(String, MoranResult)]) -> Result<()> {
    let column = |name: &str, f: fn(&MoranResult) -> f64| {
        Column::new(name.into(), table.iter().map(|(_, r)| f(r)).collect::<Vec<_>>())
    };

    let mut df = DataFrame::new(vec![
        Column::new("attribute".into(), table.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>()),
        column("moran_i", |r| r.statistic),
        column("expected", |r| r.expected),
        column("z_score", |r| r.z_score),
        column("p_value", |r| r.p_value),
        Column::new("permutations".into(), table.iter().map(|(_, r)| r.permutations as u64).collect::<Vec<_>>()),
    ])?;
    common::write_csv(&mut df, path)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let result = MoranResult { statistic: 0.5, expected: -0.25, p_value: 0.001, z_score: 4.0, permutations: 999 };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moran.csv");
        write_autocorrelation_csv(&path, &[("rating".into(), result)]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("attribute,moran_i,expected,z_score,p_value,permutations"));
        let row = lines.next().unwrap().split(',').collect::<Vec<_>>();
        assert_eq!(row[0], "rating");
        assert_eq!(row[1..5].iter().map(|v| v.parse::<f64>().unwrap()).collect::<Vec<_>>(), vec![0.5, -0.25, 4.0, 0.001]);
        assert_eq!(row[5], "999");
    }
}
