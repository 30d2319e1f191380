//! The hyperlink inspection seam.

use std::path::Path;
use std::sync::Arc;

use crate::error::InspectError;

/// Something that can open a spreadsheet and tell whether any worksheet
/// carries an embedded hyperlink.
///
/// Implementations are shared across worker threads and may block.
pub trait LinkInspector: Send + Sync {
    /// Returns `true` as soon as one worksheet has at least one hyperlink.
    fn contains_links(&self, path: &Path) -> Result<bool, InspectError>;
}

impl<T: LinkInspector + ?Sized> LinkInspector for Arc<T> {
    fn contains_links(&self, path: &Path) -> Result<bool, InspectError> {
        (**self).contains_links(path)
    }
}

impl<T: LinkInspector + ?Sized> LinkInspector for Box<T> {
    fn contains_links(&self, path: &Path) -> Result<bool, InspectError> {
        (**self).contains_links(path)
    }
}
