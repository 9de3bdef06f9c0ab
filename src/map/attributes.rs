use ndarray::{Array2, ArrayView1, Axis};

use crate::error::{ClusterError, ClusterResult};

/// Named numeric columns over the areas of a layer.
///
/// Values are stored row-major as an N×D matrix; missing values are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeTable {
    names: Vec<String>,
    values: Array2<f64>,
}

impl AttributeTable {
    /// Construct a table from column names and an N×D value matrix.
    pub fn new(names: Vec<String>, values: Array2<f64>) -> ClusterResult<Self> {
        if names.len() != values.ncols() {
            return Err(ClusterError::invalid_parameter(format!(
                "{} column names for a matrix with {} columns", names.len(), values.ncols()
            )));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ClusterError::invalid_parameter(format!("duplicate attribute column {name:?}")));
            }
        }
        Ok(Self { names, values })
    }

    /// A table with `rows` rows and no columns.
    pub fn empty(rows: usize) -> Self {
        Self { names: Vec::new(), values: Array2::zeros((rows, 0)) }
    }

    /// Build a table from `(name, column)` pairs of equal length.
    pub fn from_columns(columns: Vec<(String, Vec<f64>)>) -> ClusterResult<Self> {
        let rows = columns.first().map_or(0, |(_, col)| col.len());
        let mut table = Self::empty(rows);
        for (name, col) in columns {
            table.push_column(name, col)?;
        }
        Ok(table)
    }

    #[inline] pub fn num_rows(&self) -> usize { self.values.nrows() }

    #[inline] pub fn num_columns(&self) -> usize { self.values.ncols() }

    #[inline] pub fn names(&self) -> &[String] { &self.names }

    #[inline] pub fn values(&self) -> &Array2<f64> { &self.values }

    /// Position of a named column.
    pub fn column_index(&self, name: &str) -> ClusterResult<usize> {
        self.names.iter()
            .position(|n| n == name)
            .ok_or_else(|| ClusterError::invalid_parameter(format!("unknown attribute column {name:?}")))
    }

    /// View of a named column (may contain NaN).
    pub fn column(&self, name: &str) -> ClusterResult<ArrayView1<'_, f64>> {
        Ok(self.values.column(self.column_index(name)?))
    }

    /// View of one area's attribute vector.
    #[inline] pub fn row(&self, row: usize) -> ArrayView1<'_, f64> { self.values.row(row) }

    /// Append a column, replacing any existing column of the same name.
    pub fn push_column(&mut self, name: impl Into<String>, column: Vec<f64>) -> ClusterResult<()> {
        let name = name.into();
        if column.len() != self.num_rows() {
            return Err(ClusterError::invalid_parameter(format!(
                "column {name:?} has {} values, expected {}", column.len(), self.num_rows()
            )));
        }

        if let Some(idx) = self.names.iter().position(|n| *n == name) {
            self.values.column_mut(idx).iter_mut().zip(column).for_each(|(dst, v)| *dst = v);
        } else {
            let column = ArrayView1::from(&column);
            self.values.push_column(column)
                .map_err(|e| ClusterError::invalid_parameter(format!("cannot append column {name:?}: {e}")))?;
            self.names.push(name);
        }
        Ok(())
    }

    /// Restrict to the named columns, in the order given.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> ClusterResult<Self> {
        let indices = names.iter()
            .map(|name| self.column_index(name.as_ref()))
            .collect::<ClusterResult<Vec<_>>>()?;
        Self::new(
            names.iter().map(|name| name.as_ref().to_string()).collect(),
            self.values.select(Axis(1), &indices),
        )
    }

    /// Rows of a column holding NaN.
    pub fn missing_rows(&self, column: usize) -> Vec<usize> {
        self.values.column(column).iter()
            .enumerate()
            .filter_map(|(row, v)| v.is_nan().then_some(row))
            .collect()
    }
}
