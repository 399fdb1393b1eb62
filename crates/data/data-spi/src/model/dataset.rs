//! In-memory dataset table.

use serde::{Deserialize, Serialize};

use crate::error::{DatasetError, Result};

/// Timestamp type of the feature column.
pub type Timestamp = chrono::NaiveDateTime;

/// A time-ordered table with one timestamp column and one numeric target
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    name: String,
    time_column: String,
    value_column: String,
    timestamps: Vec<Timestamp>,
    values: Vec<f64>,
}

impl Dataset {
    /// Build a dataset, sorting rows by timestamp.
    ///
    /// The sort is stable, so rows with equal timestamps keep their source
    /// order. No gap filling is performed.
    pub fn new(
        name: &str,
        time_column: &str,
        value_column: &str,
        timestamps: Vec<Timestamp>,
        values: Vec<f64>,
    ) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(DatasetError::Csv(format!(
                "{} timestamps but {} values",
                timestamps.len(),
                values.len()
            )));
        }
        if timestamps.is_empty() {
            return Err(DatasetError::Empty(name.to_string()));
        }

        let (timestamps, values) = if timestamps.windows(2).all(|w| w[0] <= w[1]) {
            (timestamps, values)
        } else {
            let mut rows: Vec<(Timestamp, f64)> = timestamps.into_iter().zip(values).collect();
            rows.sort_by_key(|(ts, _)| *ts);
            rows.into_iter().unzip()
        };

        Ok(Self {
            name: name.to_string(),
            time_column: time_column.to_string(),
            value_column: value_column.to_string(),
            timestamps,
            values,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn time_column(&self) -> &str {
        &self.time_column
    }

    pub fn value_column(&self) -> &str {
        &self.value_column
    }

    pub fn timestamps(&self) -> &[Timestamp] {
        &self.timestamps
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// First `n` rows (fewer if the dataset is shorter).
    pub fn head(&self, n: usize) -> Vec<(Timestamp, f64)> {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
            .take(n)
            .collect()
    }

    /// Spread between the largest and smallest target value.
    pub fn value_range(&self) -> f64 {
        let (min, max) = self
            .values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            });
        max - min
    }
}
