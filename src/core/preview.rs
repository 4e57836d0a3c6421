//! Preview of a filtered listing with per-row inclusion toggles.
//!
//! The filter engine decides what *can* be processed; the preview records
//! what the user still wants processed. Only the selected rows are handed
//! to a job.

use std::path::PathBuf;

use serde::Serialize;

use crate::core::FileEntry;
use crate::processing::{FilterSpec, FilterSummary, filter};
use crate::utils::format_size;

/// One previewed file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewRow {
    pub entry: FileEntry,
    pub selected: bool,
}

impl PreviewRow {
    /// Size column; `?` when the file can no longer be read.
    pub fn size_label(&self) -> String {
        self.entry
            .size()
            .map(format_size)
            .unwrap_or_else(|_| "?".to_string())
    }

    /// Extension column, uppercase with its dot as the listing shows it.
    pub fn extension_label(&self) -> String {
        if self.entry.extension.is_empty() {
            String::new()
        } else {
            format!(".{}", self.entry.extension.to_uppercase())
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Preview {
    rows: Vec<PreviewRow>,
    scanned: usize,
}

impl Preview {
    /// Filters `scanned` with `spec`; every surviving row starts selected.
    pub fn build(scanned: &[FileEntry], spec: &FilterSpec) -> Self {
        let rows = filter(scanned, spec)
            .into_iter()
            .map(|entry| PreviewRow { entry, selected: true })
            .collect();

        Self { rows, scanned: scanned.len() }
    }

    pub fn rows(&self) -> &[PreviewRow] {
        &self.rows
    }

    pub fn summary(&self) -> FilterSummary {
        FilterSummary {
            matched: self.rows.len(),
            scanned: self.scanned,
        }
    }

    pub fn select_all(&mut self) {
        self.rows.iter_mut().for_each(|row| row.selected = true);
    }

    pub fn deselect_all(&mut self) {
        self.rows.iter_mut().for_each(|row| row.selected = false);
    }

    /// Flips row `index`; returns the new value, or `None` when out of range.
    pub fn toggle(&mut self, index: usize) -> Option<bool> {
        self.rows.get_mut(index).map(|row| {
            row.selected = !row.selected;
            row.selected
        })
    }

    pub fn selected_count(&self) -> usize {
        self.rows.iter().filter(|row| row.selected).count()
    }

    /// Snapshot of the selected paths, in listing order, ready to hand to a job.
    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.rows
            .iter()
            .filter(|row| row.selected)
            .map(|row| row.entry.path.clone())
            .collect()
    }

    /// Current combined size of the selected files; unreadable files count as 0.
    pub fn selected_total_size(&self) -> u64 {
        self.rows
            .iter()
            .filter(|row| row.selected)
            .filter_map(|row| row.entry.size().ok())
            .sum()
    }
}
