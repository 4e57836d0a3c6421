//! Operations a front end invokes:
//! - [`preview_files`]: scan inputs and build the filtered, selectable listing
//! - [`convert_files`] / [`delete_files`]: run a job until it finishes or is stopped
//! - [`render_event`]: turn the job event stream into printable lines

mod render;
mod run;
mod scan;

pub use render::{render_event, render_stats, render_summary};
pub use run::{convert_files, delete_files, run_to_completion};
pub use scan::{ScanRequest, preview_files, scan_entries};
