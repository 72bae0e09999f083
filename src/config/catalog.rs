//! Seed catalog loading from config.toml
//!
//! This module provides functionality to load the starting catalog from a
//! TOML configuration file: the admin user rows are attributed to, plus the
//! categories, tags and ingredients the shop opens with. The file is applied
//! idempotently by the seeder, so it can stay in place across restarts.

use crate::entities::UnitOfMeasure;
use crate::errors::{Error, Result};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct CatalogConfig {
    /// User that seeded rows are attributed to
    pub admin: AdminConfig,
    /// Categories to ensure exist
    #[serde(default)]
    pub categories: Vec<CategorySeed>,
    /// Tags to ensure exist
    #[serde(default)]
    pub tags: Vec<TagSeed>,
    /// Ingredients to ensure exist
    #[serde(default)]
    pub ingredients: Vec<IngredientSeed>,
}

/// The user the seeder registers first and attributes rows to
#[derive(Debug, Deserialize, Clone)]
pub struct AdminConfig {
    /// Unique login-style handle
    pub username: String,
    /// Display name
    pub full_name: String,
}

/// A category to seed
#[derive(Debug, Deserialize, Clone)]
pub struct CategorySeed {
    /// Category name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

/// A tag to seed
#[derive(Debug, Deserialize, Clone)]
pub struct TagSeed {
    /// Tag name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

/// An ingredient to seed
#[derive(Debug, Deserialize, Clone)]
pub struct IngredientSeed {
    /// Ingredient name
    pub name: String,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
    /// Cost per unit of measure
    pub unit_cost: Decimal,
    /// Unit of measure as its short code (e.g. "kg", "u")
    pub unit: UnitOfMeasure,
}

/// Loads the seed catalog from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads the seed catalog from the default location (./config.toml)
pub fn load_default_config() -> Result<CatalogConfig> {
    load_config("config.toml")
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::dec;

    #[test]
    fn test_parse_catalog_config() {
        let toml_str = r#"
            [admin]
            username = "dona"
            full_name = "Dona Benta"

            [[categories]]
            name = "Cakes"
            description = "Layered and iced"

            [[categories]]
            name = "Pies"

            [[tags]]
            name = "Gluten-free"

            [[ingredients]]
            name = "Flour"
            unit_cost = 25.00
            unit = "kg"

            [[ingredients]]
            name = "Eggs"
            description = "Free range"
            unit_cost = 0.80
            unit = "u"
        "#;

        let config: CatalogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.admin.username, "dona");
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[0].description.as_deref(), Some("Layered and iced"));
        assert!(config.categories[1].description.is_none());
        assert_eq!(config.tags.len(), 1);

        assert_eq!(config.ingredients.len(), 2);
        assert_eq!(config.ingredients[0].unit_cost, dec("25.00"));
        assert_eq!(config.ingredients[0].unit, UnitOfMeasure::Kilogram);
        assert_eq!(config.ingredients[1].unit, UnitOfMeasure::Unit);
    }

    #[test]
    fn test_sections_default_to_empty() {
        let toml_str = r#"
            [admin]
            username = "dona"
            full_name = "Dona Benta"
        "#;

        let config: CatalogConfig = toml::from_str(toml_str).unwrap();
        assert!(config.categories.is_empty());
        assert!(config.tags.is_empty());
        assert!(config.ingredients.is_empty());
    }

    #[test]
    fn test_missing_file_is_a_config_error() {
        let err = load_config("does/not/exist.toml").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
