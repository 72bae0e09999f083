//! Tag business logic.
//!
//! Tags are the lightest catalog type: trashing one merely hides it from
//! pickers, so nothing blocks the trash. Purging is still fenced by the
//! product associations that would otherwise dangle.

use crate::{
    core::{lifecycle, page::Page},
    entities::{ProductTag, Tag, product_tag, tag},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};

/// Creates a new active tag after enforcing the canonical name rules.
pub async fn create_tag(
    db: &DatabaseConnection,
    name: String,
    description: Option<String>,
) -> Result<tag::Model> {
    let txn = db.begin().await?;

    lifecycle::ensure_name_available::<Tag, _>(&txn, &name, None).await?;

    let now = chrono::Utc::now();
    let created = tag::ActiveModel {
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

/// Renames or re-describes an active tag.
pub async fn update_tag(
    db: &DatabaseConnection,
    id: i64,
    name: String,
    description: Option<String>,
) -> Result<tag::Model> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_active::<Tag, _>(&txn, id).await?;
    lifecycle::ensure_name_available::<Tag, _>(&txn, &name, Some(existing.id)).await?;

    let mut active: tag::ActiveModel = existing.into();
    active.name = Set(name.trim().to_string());
    active.description = Set(description);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Moves an active tag to the trash. Existing product associations are kept;
/// the tag just stops showing up in active listings and pickers.
pub async fn soft_delete_tag(
    db: &DatabaseConnection,
    id: i64,
    deleted_by: i64,
) -> Result<tag::Model> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_active::<Tag, _>(&txn, id).await?;
    lifecycle::mark_trashed::<Tag, _>(&txn, existing.id, deleted_by).await?;
    let trashed = lifecycle::get_any_state::<Tag, _>(&txn, id).await?;

    txn.commit().await?;
    Ok(trashed)
}

/// Brings a trashed tag back to active.
pub async fn restore_tag(db: &DatabaseConnection, id: i64) -> Result<tag::Model> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_any_state::<Tag, _>(&txn, id).await?;
    lifecycle::require_trashed("tag", &existing)?;
    lifecycle::ensure_no_active_name_clash::<Tag, _>(&txn, &existing.name, existing.id).await?;

    lifecycle::mark_restored::<Tag, _>(&txn, existing.id).await?;
    let restored = lifecycle::get_any_state::<Tag, _>(&txn, id).await?;

    txn.commit().await?;
    Ok(restored)
}

/// Permanently removes a trashed tag.
///
/// Blocked while any product, active or trashed, still carries it.
pub async fn purge_tag(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_any_state::<Tag, _>(&txn, id).await?;
    lifecycle::require_trashed("tag", &existing)?;

    let dependents = count_links(&txn, id).await?;
    if dependents > 0 {
        return Err(Error::DependentsExist {
            entity: "tag",
            id,
            count: dependents,
            dependents: "product associations",
        });
    }

    lifecycle::delete_row::<Tag, _>(&txn, id).await?;
    txn.commit().await?;
    Ok(())
}

/// Single active tag or `NotFound`.
pub async fn get_active_tag(db: &DatabaseConnection, id: i64) -> Result<tag::Model> {
    lifecycle::get_active::<Tag, _>(db, id).await
}

/// Active tags, name ascending, paginated.
pub async fn list_active_tags(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<Page<tag::Model>> {
    lifecycle::list_active::<Tag, _>(db, page, per_page).await
}

/// Trashed tags, most recently trashed first, paginated.
pub async fn list_trashed_tags(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<Page<tag::Model>> {
    lifecycle::list_trashed::<Tag, _>(db, page, per_page).await
}

/// Case-insensitive name search over active tags, paginated.
pub async fn search_tags(
    db: &DatabaseConnection,
    term: &str,
    page: u64,
    per_page: u64,
) -> Result<Page<tag::Model>> {
    lifecycle::search_active::<Tag, _>(db, term, page, per_page).await
}

async fn count_links<C>(db: &C, tag_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    ProductTag::find()
        .filter(product_tag::Column::TagId.eq(tag_id))
        .count(db)
        .await
        .map_err(Into::into)
}
