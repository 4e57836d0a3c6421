pub mod error;
pub mod formats;
pub mod fs;
pub mod size;

pub use error::{PathError, SweepError, SweepResult, ValidationError};
pub use formats::{ExtensionCategory, TARGET_EXTENSION, normalize_extension};
pub use fs::{ScanMode, collect_files, get_extension, get_file_size, output_path_for, scan_directory};
pub use size::{format_signed_size, format_size, reduction_percent};
