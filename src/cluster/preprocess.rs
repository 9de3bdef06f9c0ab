use ndarray::{Array2, Axis};

use crate::error::{ClusterError, ClusterResult};

/// Z-score every column (population standard deviation). Constant columns
/// become all zeros.
pub fn standardize(data: &Array2<f64>) -> Array2<f64> {
    let mut out = data.clone();
    for mut column in out.axis_iter_mut(Axis(1)) {
        let n = column.len() as f64;
        if n == 0.0 { continue }
        let mean = column.sum() / n;
        let sd = (column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
        column.mapv_inplace(|v| if sd > 0.0 { (v - mean) / sd } else { 0.0 });
    }
    out
}

/// First NaN cell of a matrix, reported against its column.
pub(crate) fn ensure_complete(data: &Array2<f64>, ids: &[crate::AreaId]) -> ClusterResult<()> {
    for (j, column) in data.axis_iter(Axis(1)).enumerate() {
        let missing = column.iter().filter(|v| v.is_nan()).count();
        if let Some(first) = column.iter().position(|v| v.is_nan()) {
            return Err(ClusterError::MissingData {
                attribute: format!("column {j}"),
                count: missing,
                first: ids.get(first).map_or_else(|| first.to_string(), |id| id.to_string()),
            });
        }
    }
    Ok(())
}
