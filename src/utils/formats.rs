use std::collections::HashMap;
use std::str::FromStr;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

use crate::utils::{SweepError, ValidationError};

/// Canonical extension of every file the conversion job writes.
pub const TARGET_EXTENSION: &str = "webp";

/// Format groups a user can tick when narrowing a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtensionCategory {
    WebP,
    JPEG,
    PNG,
    BMP,
    TIFF,
    GIF,
}

lazy_static! {
    static ref CATEGORY_BY_EXTENSION: HashMap<&'static str, ExtensionCategory> = {
        let mut map = HashMap::new();
        for category in ExtensionCategory::ALL {
            for ext in category.extensions() {
                map.insert(*ext, category);
            }
        }
        map
    };
}

impl ExtensionCategory {
    pub const ALL: [ExtensionCategory; 6] = [
        Self::WebP,
        Self::JPEG,
        Self::PNG,
        Self::BMP,
        Self::TIFF,
        Self::GIF,
    ];

    /// Categories ticked by default on the conversion side.
    pub const CONVERT_DEFAULTS: [ExtensionCategory; 2] = [Self::JPEG, Self::PNG];

    /// Get file extensions associated with this category
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Self::WebP => &["webp"],
            Self::JPEG => &["jpg", "jpeg"],
            Self::PNG => &["png"],
            Self::BMP => &["bmp"],
            Self::TIFF => &["tiff", "tif"],
            Self::GIF => &["gif"],
        }
    }

    /// Looks up the category an extension belongs to (case-insensitive, dot optional).
    pub fn from_extension(ext: &str) -> Option<Self> {
        CATEGORY_BY_EXTENSION
            .get(normalize_extension(ext).as_str())
            .copied()
    }

    /// Expands a set of categories into the concrete extensions they cover.
    pub fn expand(categories: &[ExtensionCategory]) -> Vec<&'static str> {
        categories
            .iter()
            .flat_map(|c| c.extensions().iter().copied())
            .collect()
    }
}

impl FromStr for ExtensionCategory {
    type Err = SweepError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_lowercase().as_str() {
            "webp" => Ok(Self::WebP),
            "jpg" | "jpeg" => Ok(Self::JPEG),
            "png" => Ok(Self::PNG),
            "bmp" => Ok(Self::BMP),
            "tif" | "tiff" => Ok(Self::TIFF),
            "gif" => Ok(Self::GIF),
            other => Err(ValidationError::settings(format!(
                "Unknown format category: {other}"
            ))
            .into()),
        }
    }
}

/// Lowercases an extension and strips any leading dots, so `.TIF` and `tif` compare equal.
pub fn normalize_extension(ext: &str) -> String {
    ext.trim_start_matches('.').to_lowercase()
}

/// True when `ext` is something the conversion job can decode.
pub fn is_convertible(ext: &str) -> bool {
    matches!(
        ExtensionCategory::from_extension(ext),
        Some(category) if category != ExtensionCategory::WebP
    )
}
