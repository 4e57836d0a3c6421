//! Narrows a scanned listing by extension and name anchors.

use std::collections::BTreeSet;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::FileEntry;
use crate::utils::{ExtensionCategory, normalize_extension};

/// Criteria captured from the user at the moment a listing is filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    /// Allowed extensions, lowercase without dots. Empty means any extension.
    pub allowed_extensions: BTreeSet<String>,
    /// Required start of the file stem; empty means no constraint
    pub prefix: String,
    /// Required end of the file stem; empty means no constraint
    pub suffix: String,
    /// Treat prefix and suffix as regular expressions instead of literals
    pub use_patterns: bool,
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.allowed_extensions
            .extend(extensions.into_iter().map(|e| normalize_extension(e.as_ref())));
        self
    }

    pub fn with_categories(self, categories: &[ExtensionCategory]) -> Self {
        self.with_extensions(ExtensionCategory::expand(categories))
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn with_patterns(mut self, use_patterns: bool) -> Self {
        self.use_patterns = use_patterns;
        self
    }

    fn compile(&self) -> CompiledFilter<'_> {
        CompiledFilter {
            extensions: &self.allowed_extensions,
            prefix: StemMatcher::prefix(&self.prefix, self.use_patterns),
            suffix: StemMatcher::suffix(&self.suffix, self.use_patterns),
        }
    }
}

/// How many entries survived a filter pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSummary {
    pub matched: usize,
    pub scanned: usize,
}

enum StemMatcher {
    Any,
    StartsWith(String),
    EndsWith(String),
    Pattern(Regex),
}

impl StemMatcher {
    fn prefix(prefix: &str, use_patterns: bool) -> Self {
        if prefix.is_empty() {
            Self::Any
        } else if use_patterns {
            Self::pattern(prefix, format!("^(?:{prefix})"))
        } else {
            Self::StartsWith(prefix.to_string())
        }
    }

    fn suffix(suffix: &str, use_patterns: bool) -> Self {
        if suffix.is_empty() {
            Self::Any
        } else if use_patterns {
            Self::pattern(suffix, format!("(?:{suffix})$"))
        } else {
            Self::EndsWith(suffix.to_string())
        }
    }

    // The raw pattern is validated on its own first: `a)|(b` is only valid once wrapped.
    // An invalid pattern matches everything.
    fn pattern(raw: &str, anchored: String) -> Self {
        match Regex::new(raw).and_then(|_| Regex::new(&anchored)) {
            Ok(re) => Self::Pattern(re),
            Err(e) => {
                warn!("Ignoring invalid name pattern {:?}: {}", raw, e);
                Self::Any
            }
        }
    }

    fn matches(&self, stem: &str) -> bool {
        match self {
            Self::Any => true,
            Self::StartsWith(prefix) => stem.starts_with(prefix.as_str()),
            Self::EndsWith(suffix) => stem.ends_with(suffix.as_str()),
            Self::Pattern(re) => re.is_match(stem),
        }
    }
}

struct CompiledFilter<'a> {
    extensions: &'a BTreeSet<String>,
    prefix: StemMatcher,
    suffix: StemMatcher,
}

impl CompiledFilter<'_> {
    fn accepts(&self, entry: &FileEntry) -> bool {
        (self.extensions.is_empty() || self.extensions.contains(&entry.extension))
            && self.prefix.matches(&entry.stem)
            && self.suffix.matches(&entry.stem)
    }
}

/// Returns the entries matching `spec`, in their original order.
pub fn filter(entries: &[FileEntry], spec: &FilterSpec) -> Vec<FileEntry> {
    let compiled = spec.compile();
    entries
        .iter()
        .filter(|entry| compiled.accepts(entry))
        .cloned()
        .collect()
}

/// Counts matches without materializing them, for the "N of M" label.
pub fn count_matching(entries: &[FileEntry], spec: &FilterSpec) -> FilterSummary {
    let compiled = spec.compile();
    FilterSummary {
        matched: entries.iter().filter(|entry| compiled.accepts(entry)).count(),
        scanned: entries.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(names: &[&str]) -> Vec<FileEntry> {
        FileEntry::from_paths(names.iter().map(|n| format!("/scan/{n}")))
    }

    fn names(entries: &[FileEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn empty_spec_is_identity() {
        let input = entries(&["b.png", "a.jpg", "c"]);
        assert_eq!(filter(&input, &FilterSpec::new()), input);
    }

    #[test]
    fn extension_and_literal_prefix() {
        let input = entries(&["IMG_001.jpg", "photo_old.png", "note.txt"]);
        let spec = FilterSpec::new()
            .with_extensions([".jpg", ".jpeg", ".png"])
            .with_prefix("IMG_");
        assert_eq!(names(&filter(&input, &spec)), vec!["IMG_001.jpg"]);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let input = entries(&["A.JPG", "b.Tif", "c.gif"]);
        let spec = FilterSpec::new().with_categories(&[ExtensionCategory::JPEG, ExtensionCategory::TIFF]);
        assert_eq!(names(&filter(&input, &spec)), vec!["A.JPG", "b.Tif"]);
    }

    #[test]
    fn literal_anchors_are_case_sensitive_and_look_at_the_stem() {
        let input = entries(&["img_1_old.png", "IMG_2_old.png", "IMG_3.old"]);
        let spec = FilterSpec::new().with_prefix("IMG_").with_suffix("_old");
        assert_eq!(names(&filter(&input, &spec)), vec!["IMG_2_old.png"]);
    }

    #[test]
    fn pattern_prefix_is_anchored_at_start_only() {
        let input = entries(&["IMG_123_x.jpg", "xIMG_123.jpg", "IMG_abc.jpg"]);
        let spec = FilterSpec::new().with_prefix(r"IMG_\d+").with_patterns(true);
        assert_eq!(names(&filter(&input, &spec)), vec!["IMG_123_x.jpg"]);
    }

    #[test]
    fn pattern_suffix_must_reach_the_end() {
        let input = entries(&["a_v2.png", "a_v2_final.png", "b_v10.png"]);
        let spec = FilterSpec::new().with_suffix(r"_v\d+").with_patterns(true);
        assert_eq!(names(&filter(&input, &spec)), vec!["a_v2.png", "b_v10.png"]);
    }

    #[test]
    fn pattern_alternation_is_grouped_before_anchoring() {
        let input = entries(&["x_old.png", "bak_x.png", "x_bak.png"]);
        let spec = FilterSpec::new().with_suffix("_old|_bak").with_patterns(true);
        assert_eq!(names(&filter(&input, &spec)), vec!["x_old.png", "x_bak.png"]);
    }

    #[test]
    fn invalid_prefix_pattern_fails_open() {
        let input = entries(&["IMG_1.jpg", "other.jpg"]);
        let broken = FilterSpec::new().with_prefix("(IMG_").with_patterns(true);
        assert_eq!(filter(&input, &broken), filter(&input, &FilterSpec::new()));
    }

    #[test]
    fn invalid_pattern_only_disables_its_own_check() {
        let input = entries(&["a_old.jpg", "b_new.jpg"]);
        let spec = FilterSpec::new()
            .with_prefix("[unclosed")
            .with_suffix("_old")
            .with_patterns(true);
        assert_eq!(names(&filter(&input, &spec)), vec!["a_old.jpg"]);
    }

    #[test]
    fn wrapped_fragment_that_is_invalid_alone_is_rejected() {
        let input = entries(&["zzz.jpg"]);
        let spec = FilterSpec::new().with_prefix("a)|(b").with_patterns(true);
        assert_eq!(filter(&input, &spec).len(), 1);
    }

    #[test]
    fn literal_mode_does_not_interpret_metacharacters() {
        let input = entries(&["a.b.png", "axb.png"]);
        let spec = FilterSpec::new().with_prefix("a.");
        assert_eq!(names(&filter(&input, &spec)), vec!["a.b.png"]);
    }

    #[test]
    fn output_is_an_ordered_subsequence() {
        let input = entries(&["c.png", "a.jpg", "b.png", "d.txt"]);
        let spec = FilterSpec::new().with_extensions(["png"]);
        let out = filter(&input, &spec);
        let mut cursor = input.iter();
        for kept in &out {
            assert!(cursor.any(|e| e == kept));
        }
        assert_eq!(names(&out), vec!["c.png", "b.png"]);
    }

    #[test]
    fn count_reports_matched_of_scanned() {
        let input = entries(&["a.jpg", "b.png", "c.txt"]);
        let spec = FilterSpec::new().with_categories(&ExtensionCategory::CONVERT_DEFAULTS);
        assert_eq!(count_matching(&input, &spec), FilterSummary { matched: 2, scanned: 3 });
    }
}
