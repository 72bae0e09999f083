//! Ingredient entity - Priced raw material referenced by product recipes.
//!
//! `unit_cost` is the live price used when a sale snapshot is taken; the
//! ledger keeps its own frozen copy so later price edits never rewrite
//! history. The measuring unit is a closed enum stored as its short code.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Ingredient database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ingredients")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique case-insensitively across every lifecycle state
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Current cost of one `unit_of_measure` of this ingredient
    pub unit_cost: Decimal,
    /// Unit the recipe quantities are expressed in
    pub unit_of_measure: UnitOfMeasure,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
    /// Soft-delete stamp; NULL means the ingredient is active
    pub deleted_at: Option<DateTimeUtc>,
    /// User who moved the ingredient to the trash, if any
    pub deleted_by_id: Option<i64>,
}

/// Unit an ingredient is measured in, stored as its short code
#[derive(Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
pub enum UnitOfMeasure {
    /// Grams
    #[sea_orm(string_value = "g")]
    #[serde(rename = "g")]
    Gram,
    /// Kilograms
    #[sea_orm(string_value = "kg")]
    #[serde(rename = "kg")]
    Kilogram,
    /// Milliliters
    #[sea_orm(string_value = "ml")]
    #[serde(rename = "ml")]
    Milliliter,
    /// Liters
    #[sea_orm(string_value = "l")]
    #[serde(rename = "l")]
    Liter,
    /// A single piece (eggs, vanilla pods, ...)
    #[sea_orm(string_value = "u")]
    #[serde(rename = "u")]
    Unit,
    /// Twelve pieces
    #[sea_orm(string_value = "doz")]
    #[serde(rename = "doz")]
    Dozen,
    /// Teaspoons
    #[sea_orm(string_value = "tsp")]
    #[serde(rename = "tsp")]
    Teaspoon,
    /// Tablespoons
    #[sea_orm(string_value = "tbsp")]
    #[serde(rename = "tbsp")]
    Tablespoon,
    /// Cups
    #[sea_orm(string_value = "cup")]
    #[serde(rename = "cup")]
    Cup,
    /// A supplier package
    #[sea_orm(string_value = "pkg")]
    #[serde(rename = "pkg")]
    Package,
}

impl UnitOfMeasure {
    /// Human-readable label; this is the string frozen into sale snapshots.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Gram => "gram",
            Self::Kilogram => "kilogram",
            Self::Milliliter => "milliliter",
            Self::Liter => "liter",
            Self::Unit => "unit",
            Self::Dozen => "dozen",
            Self::Teaspoon => "teaspoon",
            Self::Tablespoon => "tablespoon",
            Self::Cup => "cup",
            Self::Package => "package",
        }
    }
}

impl std::fmt::Display for UnitOfMeasure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Defines relationships between Ingredient and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Recipe rows measuring this ingredient into products
    #[sea_orm(has_many = "super::product_ingredient::Entity")]
    ProductIngredients,
    /// Ledger snapshots that still point back at this ingredient
    #[sea_orm(has_many = "super::sale_ingredient::Entity")]
    SaleIngredients,
    /// User who performed the soft delete
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DeletedById",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    DeletedBy,
}

impl Related<super::product_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductIngredients.def()
    }
}

impl Related<super::sale_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleIngredients.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeletedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
