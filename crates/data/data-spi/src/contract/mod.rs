//! Contracts implemented by dataset sources.

mod remote_source;

pub use remote_source::RemoteSource;
