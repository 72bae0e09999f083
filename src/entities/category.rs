//! Category entity - Groups products for browsing and reporting.
//!
//! Categories are soft-deletable: `deleted_at` doubles as the lifecycle flag
//! (NULL = active, set = trashed), paired with the user who trashed the row.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Category database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
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
    /// Soft-delete stamp; NULL means the category is active
    pub deleted_at: Option<DateTimeUtc>,
    /// User who moved the category to the trash, if any
    pub deleted_by_id: Option<i64>,
}

/// Defines relationships between Category and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// One category has many products
    #[sea_orm(has_many = "super::product::Entity")]
    Products,
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

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DeletedBy.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
