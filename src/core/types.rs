//! Core types for job configuration, lifecycle and running statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const MIN_QUALITY: u32 = 1;
pub const MAX_QUALITY: u32 = 100;
pub const DEFAULT_QUALITY: u32 = 85;

/// Which of the two batch jobs an event or error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Conversion,
    Deletion,
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Conversion => write!(f, "conversion"),
            Self::Deletion => write!(f, "deletion"),
        }
    }
}

/// Lifecycle of a job instance.
///
/// `Idle -> Running -> (Stopping ->) Finished`. A stopped job ends in
/// `Finished` like one that ran out of files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum JobState {
    Idle = 0,
    Running = 1,
    Stopping = 2,
    Finished = 3,
}

impl JobState {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Idle,
            1 => Self::Running,
            2 => Self::Stopping,
            _ => Self::Finished,
        }
    }

    /// True while the worker thread may still touch files.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Running | Self::Stopping)
    }
}

/// Settings captured when a conversion starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionConfig {
    /// WebP quality; clamped to 1-100 before use
    pub quality: u32,
    /// Keep the source file next to the converted output
    pub keep_original: bool,
}

impl ConversionConfig {
    pub fn new(quality: u32, keep_original: bool) -> Self {
        Self {
            quality: quality.clamp(MIN_QUALITY, MAX_QUALITY),
            keep_original,
        }
    }

    /// Quality actually handed to the encoder.
    pub fn effective_quality(&self) -> u32 {
        self.quality.clamp(MIN_QUALITY, MAX_QUALITY)
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_QUALITY, false)
    }
}

/// Settings captured when a deletion starts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionConfig {
    /// Move files to the recoverable trash instead of removing them for good
    pub use_trash: bool,
}

impl Default for DeletionConfig {
    fn default() -> Self {
        Self { use_trash: true }
    }
}

/// Running totals of a conversion job. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionStats {
    /// Images successfully written as WebP
    pub converted: usize,
    /// Sum of source sizes of converted images
    pub original_bytes: u64,
    /// Sum of output sizes of converted images
    pub converted_bytes: u64,
}

impl ConversionStats {
    pub(crate) fn record(&mut self, original: u64, converted: u64) {
        self.converted += 1;
        self.original_bytes += original;
        self.converted_bytes += converted;
    }
}

/// Running totals of a deletion job. Only ever grows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionStats {
    /// Files trashed or deleted
    pub removed: usize,
    /// Sum of their sizes
    pub freed_bytes: u64,
}

impl DeletionStats {
    pub(crate) fn record(&mut self, size: u64) {
        self.removed += 1;
        self.freed_bytes += size;
    }
}
