//! Tag link entity - Connects a product to a tag.
//!
//! The pair (`product_id`, `tag_id`) is unique. Links survive a tag being
//! trashed (listings filter the tag out) but block the tag's purge.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tag link database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "product_tags")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Product carrying the tag
    pub product_id: i64,
    /// Tag attached to the product
    pub tag_id: i64,
    /// When the link was created
    pub created_at: DateTimeUtc,
    /// When the link was last modified
    pub updated_at: DateTimeUtc,
}

/// Defines relationships between tag links and their endpoints
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning product; links go away with it
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Product,
    /// Referenced tag; its removal is blocked while links exist
    #[sea_orm(
        belongs_to = "super::tag::Entity",
        from = "Column::TagId",
        to = "super::tag::Column::Id",
        on_update = "Cascade",
        on_delete = "Restrict"
    )]
    Tag,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tag.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
