// Module declarations in dependency order
pub mod commands;
pub mod core;
pub mod processing;
pub mod utils;

// Public exports for external consumers
pub use crate::core::{
    ConversionConfig, DeletionConfig, FileEntry, JobController, JobEvent, JobKind, JobState, JobSummary, Preview,
};
pub use crate::processing::{FilterSpec, event_channel};
pub use crate::utils::{SweepError, SweepResult};
pub use commands::*;

// The command-line front end lives in main.rs and only goes through this API.
