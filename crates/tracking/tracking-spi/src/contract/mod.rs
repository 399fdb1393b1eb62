//! Contracts implemented by tracking backends and figures.

mod backend;
mod figure;

pub use backend::TrackingBackend;
pub use figure::Figure;
