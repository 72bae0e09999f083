//! Product entity - The sellable catalog item.
//!
//! A product owns its recipe rows (`product_ingredients`) and tag links
//! (`product_tags`); both are removed with it on purge. Sales keep a frozen
//! copy of the name and price, so purging a product never touches the ledger
//! beyond clearing the back-reference.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Product database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique case-insensitively across every lifecycle state
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// Reference price offered when recording a sale; the ledger stores its own copy
    pub base_price: Option<Decimal>,
    /// Lead time in days needed to prepare one order
    pub preparation_days: Option<i32>,
    /// Where the product photo lives; storage itself is outside this engine
    pub image_url: Option<String>,
    /// Whether the product is offered for browsing
    pub visible: bool,
    /// Category this product is filed under, if any
    pub category_id: Option<i64>,
    /// User who created the product, kept for the audit trail
    pub created_by_id: Option<i64>,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
    /// Soft-delete stamp; NULL means the product is active
    pub deleted_at: Option<DateTimeUtc>,
    /// User who moved the product to the trash, if any
    pub deleted_by_id: Option<i64>,
}

/// Defines relationships between Product and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each product may be filed under one category
    #[sea_orm(
        belongs_to = "super::category::Entity",
        from = "Column::CategoryId",
        to = "super::category::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Category,
    /// User who created the product
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::CreatedById",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    CreatedBy,
    /// User who performed the soft delete
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::DeletedById",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    DeletedBy,
    /// Recipe rows owned by this product
    #[sea_orm(has_many = "super::product_ingredient::Entity")]
    ProductIngredients,
    /// Tag links owned by this product
    #[sea_orm(has_many = "super::product_tag::Entity")]
    ProductTags,
    /// Ledger rows that still point back at this product
    #[sea_orm(has_many = "super::sale::Entity")]
    Sales,
}

impl Related<super::category::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl Related<super::product_ingredient::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductIngredients.def()
    }
}

impl Related<super::product_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductTags.def()
    }
}

impl Related<super::sale::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Sales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
