//! Spreadsheet hyperlink inspection for filesweep.
//!
//! An xlsx workbook is a zip archive of XML parts. [`XlsxLinkInspector`]
//! reads the worksheet parts directly, so no spreadsheet application is
//! launched per file. [`TimeoutInspector`] runs any inspector on its own
//! thread with an upper bound on how long a single document may take.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::time::Duration;
//!
//! use filesweep_inspect::{LinkInspector, TimeoutInspector, XlsxLinkInspector};
//!
//! let inspector = TimeoutInspector::new(XlsxLinkInspector::new(), Duration::from_secs(30));
//! let linked = inspector.contains_links(Path::new("budget.xlsx")).unwrap_or(false);
//! ```

mod timeout;
mod xlsx;

pub use timeout::TimeoutInspector;
pub use xlsx::XlsxLinkInspector;

pub use filesweep_core::{InspectError, LinkInspector};
