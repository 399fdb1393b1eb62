//! Hyperparameter Tuning Core
//!
//! Seeded random search, forward-chaining cross-validation and the
//! objectives for the additive and ARIMA models.

pub mod objective;
pub mod random_search;
pub mod validation;

pub use objective::*;
pub use random_search::*;
pub use validation::*;

// Re-export SPI types
pub use tuning_spi::{
    Distribution, FailurePolicy, Objective, ParamSpec, Result, SearchResult, SearchSpace, Trial,
    TrialOutcome, TuningError, ValidationSplit, Validator,
};

// Re-export API types
pub use tuning_api::{SearchConfig, SearchConfigBuilder};
