//! Database configuration module.
//!
//! This module handles `SQLite` database connection, table creation and index
//! creation using `SeaORM`. Tables are generated from the entity definitions
//! via `Schema::create_table_from_entity`, so the schema always matches the
//! Rust structs without hand-written DDL. The name-uniqueness indexes need a
//! `COLLATE NOCASE` clause that the schema builder cannot express, so those
//! are issued as raw statements.

use crate::entities::{
    Category, Ingredient, Product, ProductIngredient, ProductTag, Sale, SaleIngredient, Tag, User,
};
use crate::errors::Result;
use sea_orm::sea_query::Index;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema, Statement};

/// Gets the database URL from the environment or returns the default
/// `SQLite` path. `mode=rwc` lets the first run create the file.
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL")
        .unwrap_or_else(|_| "sqlite://data/backoffice.sqlite?mode=rwc".to_string())
}

/// Establishes a connection to the `SQLite` database using `DATABASE_URL`,
/// falling back to a local file under `data/`.
pub async fn create_connection() -> Result<DatabaseConnection> {
    Database::connect(get_database_url()).await.map_err(Into::into)
}

async fn create_table<E>(db: &DatabaseConnection, entity: E) -> Result<()>
where
    E: sea_orm::EntityTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);
    let mut statement = schema.create_table_from_entity(entity);
    statement.if_not_exists();
    db.execute(builder.build(&statement)).await?;
    Ok(())
}

/// Creates all tables from the entity definitions, parents before children
/// so the foreign keys resolve.
pub async fn create_tables(db: &DatabaseConnection) -> Result<()> {
    create_table(db, User).await?;
    create_table(db, Category).await?;
    create_table(db, Tag).await?;
    create_table(db, Ingredient).await?;
    create_table(db, Product).await?;
    create_table(db, ProductIngredient).await?;
    create_table(db, ProductTag).await?;
    create_table(db, Sale).await?;
    create_table(db, SaleIngredient).await?;
    Ok(())
}

/// Creates the uniqueness indexes the catalog rules lean on.
///
/// Each lifecycle entity gets a case-insensitive unique index over `name`
/// spanning every state, which is what makes the naming rules hold even if
/// rows are inserted behind the engine's back. The link tables get plain
/// unique pair indexes.
pub async fn create_indexes(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();

    // COLLATE NOCASE has no schema-builder equivalent
    for (index, table) in [
        ("idx_categories_name_nocase", "categories"),
        ("idx_tags_name_nocase", "tags"),
        ("idx_ingredients_name_nocase", "ingredients"),
        ("idx_products_name_nocase", "products"),
    ] {
        let sql =
            format!("CREATE UNIQUE INDEX IF NOT EXISTS {index} ON {table} (name COLLATE NOCASE)");
        db.execute(Statement::from_string(builder, sql)).await?;
    }

    let mut recipe_pair = Index::create();
    recipe_pair
        .name("idx_product_ingredients_pair")
        .table(ProductIngredient)
        .col(crate::entities::product_ingredient::Column::ProductId)
        .col(crate::entities::product_ingredient::Column::IngredientId)
        .unique()
        .if_not_exists();
    db.execute(builder.build(&recipe_pair)).await?;

    let mut tag_pair = Index::create();
    tag_pair
        .name("idx_product_tags_pair")
        .table(ProductTag)
        .col(crate::entities::product_tag::Column::ProductId)
        .col(crate::entities::product_tag::Column::TagId)
        .unique()
        .if_not_exists();
    db.execute(builder.build(&tag_pair)).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::entities::{category, ingredient, product_ingredient};
    use sea_orm::{ActiveModelTrait, EntityTrait, QuerySelect, Set};

    async fn setup() -> Result<DatabaseConnection> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_indexes(&db).await?;
        Ok(db)
    }

    fn category_row(name: &str) -> category::ActiveModel {
        let now = chrono::Utc::now();
        category::ActiveModel {
            name: Set(name.to_string()),
            description: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            deleted_by_id: Set(None),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = setup().await?;
        // A second bootstrap over the same store must be a no-op
        create_tables(&db).await?;
        create_indexes(&db).await?;

        let _ = Category::find().limit(1).all(&db).await?;
        let _ = Tag::find().limit(1).all(&db).await?;
        let _ = Ingredient::find().limit(1).all(&db).await?;
        let _ = Product::find().limit(1).all(&db).await?;
        let _ = ProductIngredient::find().limit(1).all(&db).await?;
        let _ = ProductTag::find().limit(1).all(&db).await?;
        let _ = Sale::find().limit(1).all(&db).await?;
        let _ = SaleIngredient::find().limit(1).all(&db).await?;
        let _ = User::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_name_index_ignores_case() -> Result<()> {
        let db = setup().await?;

        category_row("Cakes").insert(&db).await?;
        // The index catches rows inserted behind the engine's back
        let duplicate = category_row("CAKES").insert(&db).await;
        assert!(duplicate.is_err());

        Ok(())
    }

    #[tokio::test]
    async fn test_recipe_pair_index_rejects_duplicates() -> Result<()> {
        let db = setup().await?;
        let now = chrono::Utc::now();

        let flour = ingredient::ActiveModel {
            name: Set("Flour".to_string()),
            description: Set(None),
            unit_cost: Set("25".parse().unwrap()),
            unit_of_measure: Set(crate::entities::UnitOfMeasure::Kilogram),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            deleted_by_id: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;
        let cake = crate::entities::product::ActiveModel {
            name: Set("Cake".to_string()),
            description: Set(None),
            base_price: Set(None),
            preparation_days: Set(None),
            image_url: Set(None),
            visible: Set(true),
            category_id: Set(None),
            created_by_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            deleted_at: Set(None),
            deleted_by_id: Set(None),
            ..Default::default()
        }
        .insert(&db)
        .await?;

        let entry = |qty: &str| product_ingredient::ActiveModel {
            product_id: Set(cake.id),
            ingredient_id: Set(flour.id),
            quantity: Set(qty.parse().unwrap()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        entry("2").insert(&db).await?;
        let duplicate = entry("3").insert(&db).await;
        assert!(duplicate.is_err());

        Ok(())
    }
}
