//! Records exchanged with tracking backends.

mod run;
mod table;

pub use run::{RunContext, RunStatus};
pub use table::Table;
