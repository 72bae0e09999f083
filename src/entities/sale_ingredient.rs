//! Sale ingredient entity - Frozen ingredient-cost snapshot for one sale.
//!
//! Every column besides the back-references is a point-in-time copy:
//! name, unit label, unit cost, the quantity consumed by the whole sale and
//! the resulting cost. Nothing here is ever updated.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale ingredient snapshot database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sale_ingredients")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Sale this snapshot belongs to
    pub sale_id: i64,
    /// Ingredient snapshotted, cleared if the ingredient is later purged
    pub ingredient_id: Option<i64>,
    /// Ingredient name frozen at sale time
    pub ingredient_name: String,
    /// Recipe quantity x units sold, frozen at sale time
    pub quantity_used: Decimal,
    /// Cost of one unit of the ingredient frozen at sale time
    pub unit_cost: Decimal,
    /// Unit label frozen at sale time (e.g. `"kilogram"`)
    pub unit_of_measure: String,
    /// `quantity_used` x `unit_cost`, frozen at sale time
    pub total_cost: Decimal,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between snapshots and their endpoints
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning sale; snapshots go away with it
    #[sea_orm(
        belongs_to = "super::sale::Entity",
        from = "Column::SaleId",
        to = "super::sale::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Sale,
    /// Ingredient the snapshot was taken from
    #[sea_orm(
        belongs_to = "super::ingredient::Entity",
        from = "Column::IngredientId",
        to = "super::ingredient::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Ingredient,
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sale.def()
    }
}

impl Related<super::ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Ingredient.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
