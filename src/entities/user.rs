//! User entity - Referential target for attribution on catalog and ledger rows.
//!
//! The engine never manages accounts; rows exist so `deleted_by`,
//! `created_by` and `registered_by` references always point at a real person.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Login name, unique across the table
    #[sea_orm(unique)]
    pub username: String,
    /// Display name shown in attribution
    pub full_name: String,
    /// When the user row was created
    pub created_at: DateTimeUtc,
}

/// Users are pointed at by other tables; nothing is navigated from here
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
