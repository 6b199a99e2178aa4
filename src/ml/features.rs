use ndarray::{Array2, ArrayView1};
use serde::{Deserialize, Serialize};

/// Column order the estimator was fitted with
pub const FEATURE_NAMES: [&str; 3] = ["year", "mileage", "max_power"];

/// A single vehicle as seen by the model
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Year of manufacture
    pub year: f64,

    /// Mileage in km/l
    pub mileage: f64,

    /// Max power in bhp
    pub max_power: f64,
}

impl FeatureRecord {
    /// Values in `FEATURE_NAMES` order
    pub fn values(&self) -> [f64; 3] {
        [self.year, self.mileage, self.max_power]
    }
}

/// Tabular model input, one row per record
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureTable {
    rows: Array2<f64>,
}

impl FeatureTable {
    /// Build a one-row table from a single record
    pub fn single(record: &FeatureRecord) -> Self {
        let rows = Array2::from_shape_fn((1, FEATURE_NAMES.len()), |(_, col)| {
            record.values()[col]
        });

        Self { rows }
    }

    /// Number of records in the table
    pub fn nrows(&self) -> usize {
        self.rows.nrows()
    }

    /// Feature values of one record
    pub fn row(&self, index: usize) -> ArrayView1<'_, f64> {
        self.rows.row(index)
    }

    /// Underlying `rows x features` matrix
    pub fn as_array(&self) -> &Array2<f64> {
        &self.rows
    }
}
