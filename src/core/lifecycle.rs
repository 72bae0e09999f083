//! Shared lifecycle engine for the four catalog entity types.
//!
//! Categories, tags, ingredients and products all move through the same
//! three states: active, trashed (soft-deleted, restorable) and purged
//! (row physically gone). State is derived from `deleted_at`, never stored.
//! The traits here let the naming rules, state guards, stamping and the
//! standard listings live in one place instead of four copies.

use crate::{
    core::page::{self, Page},
    entities,
    errors::{Error, Result},
};
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{QueryOrder, prelude::*};

/// Where a catalog row is in its life.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    /// Live row, visible in standard listings and referencable
    Active,
    /// Soft-deleted row sitting in the trash, restorable
    Trashed,
    /// Physically removed; a loaded row can never report this state
    Purged,
}

/// Column handles the generic lifecycle operations need from an entity.
pub trait CatalogEntity: EntityTrait {
    /// Noun used in error messages ("category", "product", ...)
    const KIND: &'static str;

    /// Primary key column.
    fn id_column() -> Self::Column;
    /// Unique display-name column.
    fn name_column() -> Self::Column;
    /// Soft-delete stamp column.
    fn deleted_at_column() -> Self::Column;
    /// Acting-user column paired with the stamp.
    fn deleted_by_column() -> Self::Column;
    /// Last-modified column.
    fn updated_at_column() -> Self::Column;
}

/// Row-side accessors for models of a [`CatalogEntity`].
pub trait SoftDeletable {
    /// Primary key of the row.
    fn id(&self) -> i64;
    /// Display name of the row.
    fn name(&self) -> &str;
    /// Soft-delete stamp, if the row is trashed.
    fn deleted_at(&self) -> Option<DateTimeUtc>;

    /// Lifecycle state derived from the stamp.
    fn state(&self) -> LifecycleState {
        if self.deleted_at().is_some() {
            LifecycleState::Trashed
        } else {
            LifecycleState::Active
        }
    }
}

macro_rules! catalog_entity {
    ($entity:ty, $model:ty, $module:ident, $kind:literal) => {
        impl CatalogEntity for $entity {
            const KIND: &'static str = $kind;

            fn id_column() -> Self::Column {
                entities::$module::Column::Id
            }
            fn name_column() -> Self::Column {
                entities::$module::Column::Name
            }
            fn deleted_at_column() -> Self::Column {
                entities::$module::Column::DeletedAt
            }
            fn deleted_by_column() -> Self::Column {
                entities::$module::Column::DeletedById
            }
            fn updated_at_column() -> Self::Column {
                entities::$module::Column::UpdatedAt
            }
        }

        impl SoftDeletable for $model {
            fn id(&self) -> i64 {
                self.id
            }
            fn name(&self) -> &str {
                &self.name
            }
            fn deleted_at(&self) -> Option<DateTimeUtc> {
                self.deleted_at
            }
        }
    };
}

catalog_entity!(entities::Category, entities::CategoryModel, category, "category");
catalog_entity!(entities::Tag, entities::TagModel, tag, "tag");
catalog_entity!(entities::Ingredient, entities::IngredientModel, ingredient, "ingredient");
catalog_entity!(entities::Product, entities::ProductModel, product, "product");

/// Loads a row in any state, failing with `NotFound` for unknown ids.
pub async fn get_any_state<E, C>(db: &C, id: i64) -> Result<E::Model>
where
    E: CatalogEntity,
    C: ConnectionTrait,
{
    E::find()
        .filter(E::id_column().eq(id))
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: E::KIND, id })
}

/// Loads an active row; a trashed row is indistinguishable from a missing one.
pub async fn get_active<E, C>(db: &C, id: i64) -> Result<E::Model>
where
    E: CatalogEntity,
    C: ConnectionTrait,
{
    E::find()
        .filter(E::id_column().eq(id))
        .filter(E::deleted_at_column().is_null())
        .one(db)
        .await?
        .ok_or(Error::NotFound { entity: E::KIND, id })
}

/// Case-insensitive exact-name lookup across every state.
pub async fn find_by_name<E, C>(db: &C, name: &str) -> Result<Option<E::Model>>
where
    E: CatalogEntity,
    C: ConnectionTrait,
{
    E::find()
        .filter(Expr::expr(Func::lower(Expr::col(E::name_column()))).eq(name.trim().to_lowercase()))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Rejects a name that is empty or already held by any row other than `exclude_id`.
///
/// A clash with an active row and a clash with a trashed row are distinct
/// errors; the latter tells the caller how to free the name (restore or purge).
pub async fn ensure_name_available<E, C>(db: &C, name: &str, exclude_id: Option<i64>) -> Result<()>
where
    E: CatalogEntity,
    E::Model: SoftDeletable,
    C: ConnectionTrait,
{
    if name.trim().is_empty() {
        return Err(Error::Validation {
            message: format!("{} name cannot be empty", E::KIND),
        });
    }

    let Some(existing) = find_by_name::<E, _>(db, name).await? else {
        return Ok(());
    };
    if exclude_id == Some(existing.id()) {
        return Ok(());
    }

    match existing.state() {
        LifecycleState::Trashed => Err(Error::NameInTrash {
            entity: E::KIND,
            name: name.trim().to_string(),
        }),
        // loaded rows are never purged, so anything else is an active clash
        LifecycleState::Active | LifecycleState::Purged => Err(Error::NameTaken {
            entity: E::KIND,
            name: name.trim().to_string(),
        }),
    }
}

/// Restore-time guard: only an active row holding the same name blocks.
///
/// On a fresh store the unique name index makes this hit impossible, but
/// databases migrated from the older, laxer naming rules can carry an
/// active/trashed pair.
pub async fn ensure_no_active_name_clash<E, C>(db: &C, name: &str, exclude_id: i64) -> Result<()>
where
    E: CatalogEntity,
    C: ConnectionTrait,
{
    let clash = E::find()
        .filter(Expr::expr(Func::lower(Expr::col(E::name_column()))).eq(name.trim().to_lowercase()))
        .filter(E::deleted_at_column().is_null())
        .filter(E::id_column().ne(exclude_id))
        .one(db)
        .await?;

    if clash.is_some() {
        return Err(Error::NameTaken {
            entity: E::KIND,
            name: name.trim().to_string(),
        });
    }
    Ok(())
}

/// Fails unless the row is sitting in the trash.
pub fn require_trashed(kind: &'static str, row: &impl SoftDeletable) -> Result<()> {
    match row.state() {
        LifecycleState::Trashed => Ok(()),
        // loaded rows are never purged; anything else is the wrong state
        LifecycleState::Active | LifecycleState::Purged => Err(Error::NotTrashed {
            entity: kind,
            id: row.id(),
        }),
    }
}

/// Stamps a row into the trash: sets `deleted_at` and the acting user,
/// touching `updated_at` in the same statement.
pub async fn mark_trashed<E, C>(db: &C, id: i64, deleted_by: i64) -> Result<()>
where
    E: CatalogEntity,
    C: ConnectionTrait,
{
    let now = Utc::now();
    E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(now))
        .col_expr(E::deleted_by_column(), Expr::value(Some(deleted_by)))
        .col_expr(E::updated_at_column(), Expr::value(now))
        .filter(E::id_column().eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Clears both trash stamps, touching `updated_at`.
pub async fn mark_restored<E, C>(db: &C, id: i64) -> Result<()>
where
    E: CatalogEntity,
    C: ConnectionTrait,
{
    E::update_many()
        .col_expr(E::deleted_at_column(), Expr::value(None::<DateTimeUtc>))
        .col_expr(E::deleted_by_column(), Expr::value(None::<i64>))
        .col_expr(E::updated_at_column(), Expr::value(Utc::now()))
        .filter(E::id_column().eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Deletes the row itself. Callers have already checked state and dependents
/// and run this inside the same transaction as any child cleanup.
pub async fn delete_row<E, C>(db: &C, id: i64) -> Result<()>
where
    E: CatalogEntity,
    C: ConnectionTrait,
{
    E::delete_many()
        .filter(E::id_column().eq(id))
        .exec(db)
        .await?;
    Ok(())
}

/// Active rows, name ascending, paginated.
pub async fn list_active<E, C>(db: &C, page: u64, per_page: u64) -> Result<Page<E::Model>>
where
    E: CatalogEntity,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let select = E::find()
        .filter(E::deleted_at_column().is_null())
        .order_by_asc(E::name_column());
    page::fetch_page(db, select, page, per_page).await
}

/// Trashed rows, most recently trashed first, paginated.
pub async fn list_trashed<E, C>(db: &C, page: u64, per_page: u64) -> Result<Page<E::Model>>
where
    E: CatalogEntity,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let select = E::find()
        .filter(E::deleted_at_column().is_not_null())
        .order_by_desc(E::deleted_at_column());
    page::fetch_page(db, select, page, per_page).await
}

/// Case-insensitive name-contains search over active rows, paginated.
pub async fn search_active<E, C>(
    db: &C,
    term: &str,
    page: u64,
    per_page: u64,
) -> Result<Page<E::Model>>
where
    E: CatalogEntity,
    E::Model: Send + Sync,
    C: ConnectionTrait,
{
    let pattern = format!("%{}%", term.trim().to_lowercase());
    let select = E::find()
        .filter(E::deleted_at_column().is_null())
        .filter(Expr::expr(Func::lower(Expr::col(E::name_column()))).like(pattern))
        .order_by_asc(E::name_column());
    page::fetch_page(db, select, page, per_page).await
}
