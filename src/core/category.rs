//! Category business logic - lifecycle and dependent rules for categories.
//!
//! Categories follow the shared lifecycle engine; the rules specific to them
//! are about products: an active product blocks the trash, a product in any
//! state blocks the purge.

use crate::{
    core::{lifecycle, page::Page},
    entities::{Category, Product, category, product},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};

/// Creates a new active category after enforcing the canonical name rules.
pub async fn create_category(
    db: &DatabaseConnection,
    name: String,
    description: Option<String>,
) -> Result<category::Model> {
    let txn = db.begin().await?;

    lifecycle::ensure_name_available::<Category, _>(&txn, &name, None).await?;

    let now = chrono::Utc::now();
    let created = category::ActiveModel {
        name: Set(name.trim().to_string()),
        description: Set(description),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
        deleted_by_id: Set(None),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(created)
}

/// Renames or re-describes an active category.
pub async fn update_category(
    db: &DatabaseConnection,
    id: i64,
    name: String,
    description: Option<String>,
) -> Result<category::Model> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_active::<Category, _>(&txn, id).await?;
    lifecycle::ensure_name_available::<Category, _>(&txn, &name, Some(existing.id)).await?;

    let mut active: category::ActiveModel = existing.into();
    active.name = Set(name.trim().to_string());
    active.description = Set(description);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Moves an active category to the trash.
///
/// Blocked while active products are still filed under it; reassign or trash
/// those first.
pub async fn soft_delete_category(
    db: &DatabaseConnection,
    id: i64,
    deleted_by: i64,
) -> Result<category::Model> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_active::<Category, _>(&txn, id).await?;
    let dependents = count_products(&txn, id, true).await?;
    if dependents > 0 {
        return Err(Error::DependentsExist {
            entity: "category",
            id,
            count: dependents,
            dependents: "active products",
        });
    }

    lifecycle::mark_trashed::<Category, _>(&txn, existing.id, deleted_by).await?;
    let trashed = lifecycle::get_any_state::<Category, _>(&txn, id).await?;

    txn.commit().await?;
    Ok(trashed)
}

/// Brings a trashed category back to active, clearing both trash stamps.
pub async fn restore_category(db: &DatabaseConnection, id: i64) -> Result<category::Model> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_any_state::<Category, _>(&txn, id).await?;
    lifecycle::require_trashed("category", &existing)?;
    lifecycle::ensure_no_active_name_clash::<Category, _>(&txn, &existing.name, existing.id).await?;

    lifecycle::mark_restored::<Category, _>(&txn, existing.id).await?;
    let restored = lifecycle::get_any_state::<Category, _>(&txn, id).await?;

    txn.commit().await?;
    Ok(restored)
}

/// Permanently removes a trashed category.
///
/// Blocked while any product, active or trashed, still references it.
pub async fn purge_category(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_any_state::<Category, _>(&txn, id).await?;
    lifecycle::require_trashed("category", &existing)?;

    let dependents = count_products(&txn, id, false).await?;
    if dependents > 0 {
        return Err(Error::DependentsExist {
            entity: "category",
            id,
            count: dependents,
            dependents: "products",
        });
    }

    lifecycle::delete_row::<Category, _>(&txn, id).await?;
    txn.commit().await?;
    Ok(())
}

/// Single active category or `NotFound`.
pub async fn get_active_category(db: &DatabaseConnection, id: i64) -> Result<category::Model> {
    lifecycle::get_active::<Category, _>(db, id).await
}

/// Active categories, name ascending, paginated.
pub async fn list_active_categories(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<Page<category::Model>> {
    lifecycle::list_active::<Category, _>(db, page, per_page).await
}

/// Trashed categories, most recently trashed first, paginated.
pub async fn list_trashed_categories(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<Page<category::Model>> {
    lifecycle::list_trashed::<Category, _>(db, page, per_page).await
}

/// Case-insensitive name search over active categories, paginated.
pub async fn search_categories(
    db: &DatabaseConnection,
    term: &str,
    page: u64,
    per_page: u64,
) -> Result<Page<category::Model>> {
    lifecycle::search_active::<Category, _>(db, term, page, per_page).await
}

/// How many active products are filed under the category.
pub async fn count_active_products_in_category(db: &DatabaseConnection, id: i64) -> Result<u64> {
    count_products(db, id, true).await
}

async fn count_products<C>(db: &C, category_id: i64, active_only: bool) -> Result<u64>
where
    C: ConnectionTrait,
{
    let mut select = Product::find().filter(product::Column::CategoryId.eq(category_id));
    if active_only {
        select = select.filter(product::Column::DeletedAt.is_null());
    }
    select.count(db).await.map_err(Into::into)
}
