//! Sale entity - One append-only row per recorded sale.
//!
//! `product_name`, `unit_price` and `total_amount` are frozen at creation
//! time; the `product_id` back-reference may be cleared later if the product
//! is purged, and the row still reads correctly on its own.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Sale database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "sales")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// When the sale happened
    pub sale_date: DateTimeUtc,
    /// User who recorded the sale; always present
    pub registered_by_id: i64,
    /// Product sold, cleared if the product is later purged
    pub product_id: Option<i64>,
    /// Product name frozen at sale time
    pub product_name: String,
    /// Units sold, at least 1
    pub quantity: i32,
    /// Price per unit frozen at sale time
    pub unit_price: Decimal,
    /// `unit_price` x `quantity`, frozen at sale time
    pub total_amount: Decimal,
    /// Optional free-form note
    pub notes: Option<String>,
    /// Optional customer name for pickup
    pub customer_name: Option<String>,
    /// Optional customer document number
    pub customer_document: Option<String>,
    /// Optional customer phone number
    pub customer_phone: Option<String>,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between Sale and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Product the sale was recorded against
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Product,
    /// User who recorded the sale
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::RegisteredById",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    RegisteredBy,
    /// Ingredient-cost snapshots taken with this sale
    #[sea_orm(has_many = "super::sale_ingredient::Entity")]
    SaleIngredients,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RegisteredBy.def()
    }
}

impl Related<super::sale_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SaleIngredients.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
