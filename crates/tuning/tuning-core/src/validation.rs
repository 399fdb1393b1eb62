//! Validation strategy implementations.

use tuning_spi::{Result, TuningError, ValidationSplit, Validator};

/// Forward-chaining time series cross-validator.
///
/// Each fold tests on the next `data_len / (n_splits + 1)` observations and
/// trains on everything before them, so the training window expands from the
/// start of the series.
#[derive(Debug, Clone)]
pub struct TimeSeriesSplit {
    n_splits: usize,
}

impl TimeSeriesSplit {
    pub fn new(n_splits: usize) -> Self {
        Self { n_splits }
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }
}

impl Validator for TimeSeriesSplit {
    fn splits(&self, data_len: usize) -> Result<Vec<ValidationSplit>> {
        if self.n_splits < 2 {
            return Err(TuningError::InvalidConfig("n_splits must be >= 2".into()));
        }

        let test_size = data_len / (self.n_splits + 1);
        if test_size == 0 {
            return Err(TuningError::InsufficientData {
                required: self.n_splits + 1,
                got: data_len,
            });
        }

        let min_train = data_len - test_size * self.n_splits;
        let splits = (0..self.n_splits)
            .map(|i| {
                let train_end = min_train + i * test_size;
                ValidationSplit {
                    train_start: 0,
                    train_end,
                    test_start: train_end,
                    test_end: train_end + test_size,
                }
            })
            .collect();

        Ok(splits)
    }
}
