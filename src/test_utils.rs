//! Shared test utilities.
//!
//! Helpers for spinning up an in-memory database and stocking it with
//! catalog rows at sensible defaults.

#![allow(clippy::expect_used)]

use crate::{
    core::{
        category, ingredient,
        product::{self, ProductDraft},
        recipe,
        sale::SaleDraft,
    },
    entities,
    errors::Result,
};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

/// Creates an in-memory `SQLite` database with all tables and indexes,
/// the starting point of every integration test.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    crate::config::database::create_indexes(&db).await?;
    Ok(db)
}

/// Parses a decimal literal. Panics on malformed test input.
pub fn dec(s: &str) -> Decimal {
    s.parse().expect("malformed decimal literal in test")
}

/// Inserts a user row directly; user management has no core operations.
pub async fn create_test_user(
    db: &DatabaseConnection,
    username: &str,
) -> Result<entities::user::Model> {
    entities::user::ActiveModel {
        username: Set(username.to_string()),
        full_name: Set(format!("{username} (test)")),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
    .map_err(Into::into)
}

/// Creates a test category with no description.
pub async fn create_test_category(
    db: &DatabaseConnection,
    name: &str,
) -> Result<entities::category::Model> {
    category::create_category(db, name.to_string(), None).await
}

/// Creates a test ingredient with sensible defaults.
///
/// # Arguments
/// * `db` - Database connection
/// * `name` - Ingredient name
/// * `unit_cost` - Cost per unit as a decimal literal
///
/// # Defaults
/// * `unit_of_measure`: kilogram
pub async fn create_test_ingredient(
    db: &DatabaseConnection,
    name: &str,
    unit_cost: &str,
) -> Result<entities::ingredient::Model> {
    ingredient::create_ingredient(
        db,
        name.to_string(),
        None,
        dec(unit_cost),
        entities::UnitOfMeasure::Kilogram,
    )
    .await
}

/// Creates a visible test product with sensible defaults.
///
/// # Defaults
/// * `base_price`: 450.00
/// * no category, no recipe, no tags
pub async fn create_test_product(
    db: &DatabaseConnection,
    name: &str,
    created_by: i64,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        ProductDraft {
            name: name.to_string(),
            base_price: Some(dec("450.00")),
            visible: true,
            ..Default::default()
        },
        created_by,
    )
    .await
}

/// Creates a test product filed under the given category.
pub async fn create_test_product_in_category(
    db: &DatabaseConnection,
    name: &str,
    category_id: i64,
    created_by: i64,
) -> Result<entities::product::Model> {
    product::create_product(
        db,
        ProductDraft {
            name: name.to_string(),
            base_price: Some(dec("450.00")),
            visible: true,
            category_id: Some(category_id),
            ..Default::default()
        },
        created_by,
    )
    .await
}

/// Builds a sale draft at the default test price of 450.00 per unit.
pub fn draft_sale(product_id: i64, quantity: i32) -> SaleDraft {
    SaleDraft {
        product_id,
        quantity,
        unit_price: dec("450.00"),
        ..Default::default()
    }
}

/// Sets up a complete test environment with a registered user.
/// Returns (db, user) for common test scenarios.
pub async fn setup_with_user() -> Result<(DatabaseConnection, entities::user::Model)> {
    let db = setup_test_db().await?;
    let user = create_test_user(&db, "staff").await?;
    Ok((db, user))
}

/// Sets up a "Chocolate Cake" product whose recipe uses 2 kg of "Flour" at
/// 25.00 per kilogram. Returns (product, ingredient) for snapshot tests.
pub async fn setup_recipe_product(
    db: &DatabaseConnection,
    created_by: i64,
) -> Result<(entities::product::Model, entities::ingredient::Model)> {
    let flour = create_test_ingredient(db, "Flour", "25.00").await?;
    let cake = create_test_product(db, "Chocolate Cake", created_by).await?;
    recipe::add_recipe_entry(db, cake.id, flour.id, dec("2")).await?;
    Ok((cake, flour))
}
