//! Property and category lists offered during review.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ReceiptError, Result};

/// Placeholder offered when no property list exists.
pub const PROPERTY_PLACEHOLDER: &str = "(Add properties.json)";

/// Placeholder offered when no category list exists.
pub const CATEGORY_PLACEHOLDER: &str = "(Add categories.json)";

/// A rental property expenses can be assigned to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(default = "unknown_name")]
    pub name: String,
}

/// An expense category, optionally tied to a reporting line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default = "unknown_name")]
    pub name: String,

    #[serde(default)]
    pub schedule_e_line: String,
}

fn unknown_name() -> String {
    "Unknown".to_string()
}

#[derive(Debug, Default, Deserialize)]
struct PropertiesFile {
    #[serde(default)]
    properties: Vec<Property>,
}

#[derive(Debug, Default, Deserialize)]
struct CategoriesFile {
    #[serde(default)]
    categories: Vec<Category>,
}

/// Selectable options for the review step.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub properties: Vec<Property>,
    pub categories: Vec<Category>,
}

impl ReferenceData {
    /// Load both lists. Missing files yield empty lists; malformed files are errors.
    pub fn load(properties_path: &Path, categories_path: &Path) -> Result<Self> {
        let properties = read_json::<PropertiesFile>(properties_path)?.properties;
        let categories = read_json::<CategoriesFile>(categories_path)?.categories;

        debug!(
            "Loaded {} properties and {} categories",
            properties.len(),
            categories.len()
        );

        Ok(Self {
            properties,
            categories,
        })
    }

    /// Property names, or the placeholder when there are none.
    pub fn property_names(&self) -> Vec<String> {
        if self.properties.is_empty() {
            return vec![PROPERTY_PLACEHOLDER.to_string()];
        }
        self.properties.iter().map(|p| p.name.clone()).collect()
    }

    /// Category names, or the placeholder when there are none.
    pub fn category_names(&self) -> Vec<String> {
        if self.categories.is_empty() {
            return vec![CATEGORY_PLACEHOLDER.to_string()];
        }
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    /// Reporting line pre-associated with a category, or empty.
    pub fn schedule_line_for(&self, category: &str) -> String {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.schedule_e_line.clone())
            .unwrap_or_default()
    }
}

fn read_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    if !path.exists() {
        debug!("Reference file {} not found", path.display());
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| ReceiptError::Config(format!("{}: {}", path.display(), e)))
}
