//! Min-max normalization of feature columns.
//!
//! Each column is rescaled independently to `[0, 1]` using the minimum and
//! maximum observed across the whole catalog. A column whose values are all
//! equal carries no information and maps to 0.

use crate::error::{PipelineError, Result};
use crate::features::FeatureSpace;

/// Per-column minimum and maximum, fitted on a full set of rows.
#[derive(Debug, Clone, PartialEq)]
pub struct MinMaxNormalizer {
    data_min: Vec<f64>,
    data_max: Vec<f64>,
}

impl MinMaxNormalizer {
    /// Compute column ranges over `rows`, all of which must be `dimension` wide.
    pub fn fit(rows: &[Vec<f64>], dimension: usize) -> Result<Self> {
        let mut data_min = vec![f64::INFINITY; dimension];
        let mut data_max = vec![f64::NEG_INFINITY; dimension];

        for row in rows {
            if row.len() != dimension {
                return Err(PipelineError::DimensionMismatch {
                    expected: dimension,
                    found: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                data_min[j] = data_min[j].min(value);
                data_max[j] = data_max[j].max(value);
            }
        }

        if rows.is_empty() {
            data_min.fill(0.0);
            data_max.fill(0.0);
        }

        Ok(Self { data_min, data_max })
    }

    pub fn dimension(&self) -> usize {
        self.data_min.len()
    }

    pub fn data_min(&self) -> &[f64] {
        &self.data_min
    }

    pub fn data_max(&self) -> &[f64] {
        &self.data_max
    }

    /// Rescale one row with the fitted ranges
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>> {
        if row.len() != self.dimension() {
            return Err(PipelineError::DimensionMismatch {
                expected: self.dimension(),
                found: row.len(),
            });
        }

        Ok(row
            .iter()
            .zip(self.data_min.iter().zip(&self.data_max))
            .map(|(&value, (&min, &max))| {
                if max <= min {
                    return 0.0;
                }
                let range = max - min;
                let scaled = if range.is_finite() {
                    (value - min) / range
                } else {
                    // Span wider than f64::MAX; halve every term first
                    (value / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)
                };
                scaled.clamp(0.0, 1.0)
            })
            .collect())
    }
}

/// Feature rows after min-max scaling. Read-only once built.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedMatrix {
    rows: Vec<Vec<f64>>,
    dimension: usize,
}

impl NormalizedMatrix {
    /// Fit a normalizer on `space` and rescale all of its rows
    pub fn from_space(space: &FeatureSpace) -> Result<Self> {
        Self::from_rows(&space.rows, space.dimension())
    }

    pub fn from_rows(rows: &[Vec<f64>], dimension: usize) -> Result<Self> {
        let normalizer = MinMaxNormalizer::fit(rows, dimension)?;
        let rows = rows
            .iter()
            .map(|row| normalizer.transform_row(row))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rows, dimension })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn row(&self, index: usize) -> Result<&[f64]> {
        self.rows
            .get(index)
            .map(Vec::as_slice)
            .ok_or(PipelineError::UnknownMovie {
                index,
                len: self.rows.len(),
            })
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }
}
