//! Shared model types
//!
//! Values exchanged between the model factory, the hyperparameter search
//! and the evaluator.

mod hyperparameter_set;
mod metrics_report;
mod model_kind;

pub use hyperparameter_set::HyperparameterSet;
pub use metrics_report::MetricsReport;
pub use model_kind::ModelKind;
