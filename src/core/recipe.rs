//! Recipe business logic - the ingredient graph behind each product.
//!
//! A recipe is a set of (ingredient, quantity) entries owned by a product.
//! Entries are what pin ingredients in place: an ingredient listed in any
//! recipe can be neither trashed nor purged. Recipe cost is always computed
//! from the live ingredient prices; only sales freeze numbers.

use crate::{
    core::lifecycle,
    entities::{Ingredient, Product, ProductIngredient, ingredient, product_ingredient},
    errors::{Error, Result},
};
use sea_orm::{Set, TransactionTrait, prelude::*};

/// One recipe line joined with its ingredient.
#[derive(Clone, Debug)]
pub struct RecipeItem {
    /// The owning entry with its quantity.
    pub entry: product_ingredient::Model,
    /// The live ingredient the entry points at.
    pub ingredient: ingredient::Model,
}

/// Recipe of an active product, joined with active ingredients only, sorted
/// by ingredient name (case-insensitive).
///
/// Entries whose ingredient sits in the trash are skipped rather than
/// surfaced half-broken; stores migrated from looser software can hold such
/// rows.
pub async fn get_recipe<C>(db: &C, product_id: i64) -> Result<Vec<RecipeItem>>
where
    C: ConnectionTrait,
{
    lifecycle::get_active::<Product, _>(db, product_id).await?;

    let mut items: Vec<RecipeItem> = ProductIngredient::find()
        .filter(product_ingredient::Column::ProductId.eq(product_id))
        .find_also_related(Ingredient)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(entry, ingredient)| {
            ingredient.map(|ingredient| RecipeItem { entry, ingredient })
        })
        .filter(|item| item.ingredient.deleted_at.is_none())
        .collect();
    items.sort_by_key(|item| item.ingredient.name.to_lowercase());
    Ok(items)
}

/// Adds an ingredient to an active product's recipe.
///
/// # Errors
/// Returns an error if:
/// - The quantity is zero or negative
/// - The product or ingredient is missing or trashed
/// - The ingredient is already in the recipe
/// - The database operation fails
pub async fn add_recipe_entry(
    db: &DatabaseConnection,
    product_id: i64,
    ingredient_id: i64,
    quantity: Decimal,
) -> Result<product_ingredient::Model> {
    if quantity <= Decimal::ZERO {
        return Err(Error::InvalidQuantity { quantity });
    }

    let txn = db.begin().await?;

    lifecycle::get_active::<Product, _>(&txn, product_id).await?;
    lifecycle::get_active::<Ingredient, _>(&txn, ingredient_id).await?;

    let existing = find_entry(&txn, product_id, ingredient_id).await?;
    if existing.is_some() {
        return Err(Error::AlreadyInRecipe {
            product_id,
            ingredient_id,
        });
    }

    let now = chrono::Utc::now();
    let entry = product_ingredient::ActiveModel {
        product_id: Set(product_id),
        ingredient_id: Set(ingredient_id),
        quantity: Set(quantity),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(entry)
}

/// Changes the quantity of an existing recipe entry.
pub async fn update_recipe_quantity(
    db: &DatabaseConnection,
    product_id: i64,
    ingredient_id: i64,
    quantity: Decimal,
) -> Result<product_ingredient::Model> {
    if quantity <= Decimal::ZERO {
        return Err(Error::InvalidQuantity { quantity });
    }

    let txn = db.begin().await?;

    lifecycle::get_active::<Product, _>(&txn, product_id).await?;
    let entry = find_entry(&txn, product_id, ingredient_id)
        .await?
        .ok_or(Error::NotInRecipe {
            product_id,
            ingredient_id,
        })?;

    let mut active: product_ingredient::ActiveModel = entry.into();
    active.quantity = Set(quantity);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Takes an ingredient out of an active product's recipe. Works regardless
/// of the ingredient's own state; this is how a stuck ingredient gets freed
/// for the trash.
pub async fn remove_recipe_entry(
    db: &DatabaseConnection,
    product_id: i64,
    ingredient_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;

    lifecycle::get_active::<Product, _>(&txn, product_id).await?;
    let entry = find_entry(&txn, product_id, ingredient_id)
        .await?
        .ok_or(Error::NotInRecipe {
            product_id,
            ingredient_id,
        })?;

    ProductIngredient::delete_many()
        .filter(product_ingredient::Column::Id.eq(entry.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(())
}

/// Active ingredients not yet in the recipe, name ascending. Picker helper.
pub async fn available_ingredients(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<ingredient::Model>> {
    lifecycle::get_active::<Product, _>(db, product_id).await?;

    let used: Vec<i64> = ProductIngredient::find()
        .filter(product_ingredient::Column::ProductId.eq(product_id))
        .all(db)
        .await?
        .into_iter()
        .map(|entry| entry.ingredient_id)
        .collect();

    let mut ingredients = Ingredient::find()
        .filter(ingredient::Column::DeletedAt.is_null())
        .filter(ingredient::Column::Id.is_not_in(used))
        .all(db)
        .await?;
    ingredients.sort_by_key(|row| row.name.to_lowercase());
    Ok(ingredients)
}

/// Production cost of one unit of the product at today's ingredient prices:
/// the sum of `unit_cost` times `quantity` over the live recipe. Computed on
/// demand, never stored.
pub async fn recipe_cost<C>(db: &C, product_id: i64) -> Result<Decimal>
where
    C: ConnectionTrait,
{
    let items = get_recipe(db, product_id).await?;
    Ok(items
        .iter()
        .map(|item| item.ingredient.unit_cost * item.entry.quantity)
        .sum())
}

async fn find_entry<C>(
    db: &C,
    product_id: i64,
    ingredient_id: i64,
) -> Result<Option<product_ingredient::Model>>
where
    C: ConnectionTrait,
{
    ProductIngredient::find()
        .filter(product_ingredient::Column::ProductId.eq(product_id))
        .filter(product_ingredient::Column::IngredientId.eq(ingredient_id))
        .one(db)
        .await
        .map_err(Into::into)
}
