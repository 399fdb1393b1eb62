use std::path::Path;

use crate::error::Result;

/// A chart that can be written to an image file.
///
/// The recorder renders a figure into a scoped temporary file and consumes
/// it, so implementations may hold large buffers.
pub trait Figure {
    /// Render to `path`, overwriting any existing file.
    fn render(&self, path: &Path) -> Result<()>;
}
