//! Requests and outcomes of a training run.

mod train;

pub use train::{TrainOutcome, TrainRequest};
