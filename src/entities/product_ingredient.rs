//! Recipe entry entity - One (product, ingredient, quantity) row.
//!
//! The pair (`product_id`, `ingredient_id`) is unique; quantities are
//! decimals in the ingredient's own unit of measure.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Recipe entry database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_ingredients")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product this recipe row belongs to
    pub product_id: i64,
    /// Ingredient measured into the recipe
    pub ingredient_id: i64,
    /// How much of the ingredient one unit of the product needs
    pub quantity: Decimal,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between recipe entries and their endpoints
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning product; rows go away with it
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Product,
    /// Referenced ingredient; its removal is blocked while rows exist
    #[sea_orm(
        belongs_to = "super::ingredient::Entity",
        from = "Column::IngredientId",
        to = "super::ingredient::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Ingredient,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
