//! Ingredient business logic.
//!
//! Ingredients carry a unit cost and a unit of measure on top of the shared
//! lifecycle. Recipe entries block both the trash and the purge: an
//! ingredient someone still bakes with cannot quietly disappear. Sale
//! snapshots never block anything; purging only detaches their back-pointer
//! and leaves the frozen numbers alone.

use crate::{
    core::{lifecycle, page::Page},
    entities::{
        Ingredient, ProductIngredient, SaleIngredient, UnitOfMeasure, ingredient,
        product_ingredient, sale_ingredient,
    },
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*, sea_query::Expr};

/// Creates a new active ingredient after enforcing the canonical name rules.
pub async fn create_ingredient(
    db: &DatabaseConnection,
    name: String,
    description: Option<String>,
    unit_cost: Decimal,
    unit_of_measure: UnitOfMeasure,
) -> Result<ingredient::Model> {
    if unit_cost < Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: unit_cost });
    }

    let txn = db.begin().await?;

    lifecycle::ensure_name_available::<Ingredient, _>(&txn, &name, None).await?;

    let now = chrono::Utc::now();
    let created = ingredient::ActiveModel {
        name: Set(name.trim().to_string()),
        description: Set(description),
        unit_cost: Set(unit_cost),
        unit_of_measure: Set(unit_of_measure),
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

/// Updates an active ingredient. A cost change affects future sales only;
/// snapshots taken by earlier sales keep the price they were bought at.
pub async fn update_ingredient(
    db: &DatabaseConnection,
    id: i64,
    name: String,
    description: Option<String>,
    unit_cost: Decimal,
    unit_of_measure: UnitOfMeasure,
) -> Result<ingredient::Model> {
    if unit_cost < Decimal::ZERO {
        return Err(Error::InvalidAmount { amount: unit_cost });
    }

    let txn = db.begin().await?;

    let existing = lifecycle::get_active::<Ingredient, _>(&txn, id).await?;
    lifecycle::ensure_name_available::<Ingredient, _>(&txn, &name, Some(existing.id)).await?;

    let mut active: ingredient::ActiveModel = existing.into();
    active.name = Set(name.trim().to_string());
    active.description = Set(description);
    active.unit_cost = Set(unit_cost);
    active.unit_of_measure = Set(unit_of_measure);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Moves an active ingredient to the trash.
///
/// Blocked while any recipe still lists it, even a trashed product's recipe;
/// remove it from those recipes first.
pub async fn soft_delete_ingredient(
    db: &DatabaseConnection,
    id: i64,
    deleted_by: i64,
) -> Result<ingredient::Model> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_active::<Ingredient, _>(&txn, id).await?;
    let dependents = count_recipe_entries(&txn, id).await?;
    if dependents > 0 {
        return Err(Error::DependentsExist {
            entity: "ingredient",
            id,
            count: dependents,
            dependents: "recipe entries",
        });
    }

    lifecycle::mark_trashed::<Ingredient, _>(&txn, existing.id, deleted_by).await?;
    let trashed = lifecycle::get_any_state::<Ingredient, _>(&txn, id).await?;

    txn.commit().await?;
    Ok(trashed)
}

/// Brings a trashed ingredient back to active.
pub async fn restore_ingredient(db: &DatabaseConnection, id: i64) -> Result<ingredient::Model> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_any_state::<Ingredient, _>(&txn, id).await?;
    lifecycle::require_trashed("ingredient", &existing)?;
    lifecycle::ensure_no_active_name_clash::<Ingredient, _>(&txn, &existing.name, existing.id)
        .await?;

    lifecycle::mark_restored::<Ingredient, _>(&txn, existing.id).await?;
    let restored = lifecycle::get_any_state::<Ingredient, _>(&txn, id).await?;

    txn.commit().await?;
    Ok(restored)
}

/// Permanently removes a trashed ingredient.
///
/// Recipe entries block it just like the trash does. Sale snapshots do not:
/// their `ingredient_id` back-pointer is cleared in the same transaction and
/// the frozen name, cost and quantity stay untouched.
pub async fn purge_ingredient(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_any_state::<Ingredient, _>(&txn, id).await?;
    lifecycle::require_trashed("ingredient", &existing)?;

    let dependents = count_recipe_entries(&txn, id).await?;
    if dependents > 0 {
        return Err(Error::DependentsExist {
            entity: "ingredient",
            id,
            count: dependents,
            dependents: "recipe entries",
        });
    }

    SaleIngredient::update_many()
        .col_expr(sale_ingredient::Column::IngredientId, Expr::value(None::<i64>))
        .filter(sale_ingredient::Column::IngredientId.eq(id))
        .exec(&txn)
        .await?;

    lifecycle::delete_row::<Ingredient, _>(&txn, id).await?;
    txn.commit().await?;
    Ok(())
}

/// Single active ingredient or `NotFound`.
pub async fn get_active_ingredient(db: &DatabaseConnection, id: i64) -> Result<ingredient::Model> {
    lifecycle::get_active::<Ingredient, _>(db, id).await
}

/// Active ingredients, name ascending, paginated.
pub async fn list_active_ingredients(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<Page<ingredient::Model>> {
    lifecycle::list_active::<Ingredient, _>(db, page, per_page).await
}

/// Trashed ingredients, most recently trashed first, paginated.
pub async fn list_trashed_ingredients(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<Page<ingredient::Model>> {
    lifecycle::list_trashed::<Ingredient, _>(db, page, per_page).await
}

/// Case-insensitive name search over active ingredients, paginated.
pub async fn search_ingredients(
    db: &DatabaseConnection,
    term: &str,
    page: u64,
    per_page: u64,
) -> Result<Page<ingredient::Model>> {
    lifecycle::search_active::<Ingredient, _>(db, term, page, per_page).await
}

/// How many recipe entries reference the ingredient, across product states.
pub async fn count_recipe_uses(db: &DatabaseConnection, id: i64) -> Result<u64> {
    count_recipe_entries(db, id).await
}

async fn count_recipe_entries<C>(db: &C, ingredient_id: i64) -> Result<u64>
where
    C: ConnectionTrait,
{
    ProductIngredient::find()
        .filter(product_ingredient::Column::IngredientId.eq(ingredient_id))
        .count(db)
        .await
        .map_err(Into::into)
}
