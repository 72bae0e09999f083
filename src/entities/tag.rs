//! Tag entity - Free-form labels attached to products through `product_tags`.
//!
//! Same soft-delete lifecycle as the other catalog tables; trashed tags are
//! filtered out of product tag listings but their links are kept.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Tag database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tags")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, unique case-insensitively across every lifecycle state
    pub name: String,
    /// Optional free-form description
    pub description: Option<String>,
    /// When the row was created
    pub created_at: DateTimeUtc,
    /// When the row was last modified
    pub updated_at: DateTimeUtc,
    /// Soft-delete stamp; NULL means the tag is active
    pub deleted_at: Option<DateTimeUtc>,
    /// User who moved the tag to the trash, if any
    pub deleted_by_id: Option<i64>,
}

/// Defines relationships between Tag and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One tag has many product links
    #[sea_orm(has_many = "super::product_tag::Entity")]
    ProductTags,
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

impl Related<super::product_tag::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProductTags.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeletedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
