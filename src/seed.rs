//! Idempotent seeding of the starting catalog.
//!
//! Applies a [`CatalogConfig`] to the database, creating only what is
//! missing. Rows are matched by name in any lifecycle state, so an item the
//! staff trashed after seeding stays trashed across restarts instead of
//! being resurrected or duplicated.

use crate::{
    config::catalog::CatalogConfig,
    core::{category, ingredient, lifecycle, tag},
    entities::{Category, Ingredient, Tag, User, user},
    errors::Result,
};
use sea_orm::{ActiveModelTrait, Set, prelude::*};
use tracing::info;

/// What one seeding pass actually created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeedSummary {
    /// Admin users inserted (0 or 1).
    pub users: usize,
    /// Categories created.
    pub categories: usize,
    /// Tags created.
    pub tags: usize,
    /// Ingredients created.
    pub ingredients: usize,
}

impl SeedSummary {
    /// True when the pass created nothing at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users == 0 && self.categories == 0 && self.tags == 0 && self.ingredients == 0
    }
}

/// Applies the seed catalog, creating only what is missing.
///
/// # Errors
/// Returns an error if a seeded value is invalid (e.g. a negative ingredient
/// cost) or a database operation fails. Partially applied seeds are safe:
/// the next run picks up where this one stopped.
pub async fn apply(db: &DatabaseConnection, config: &CatalogConfig) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    let admin = User::find()
        .filter(user::Column::Username.eq(&config.admin.username))
        .one(db)
        .await?;
    if admin.is_none() {
        user::ActiveModel {
            username: Set(config.admin.username.clone()),
            full_name: Set(config.admin.full_name.clone()),
            created_at: Set(chrono::Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        info!("Registered admin user '{}'", config.admin.username);
        summary.users += 1;
    }

    for seed in &config.categories {
        if lifecycle::find_by_name::<Category, _>(db, &seed.name)
            .await?
            .is_none()
        {
            category::create_category(db, seed.name.clone(), seed.description.clone()).await?;
            info!("Seeded category '{}'", seed.name);
            summary.categories += 1;
        }
    }

    for seed in &config.tags {
        if lifecycle::find_by_name::<Tag, _>(db, &seed.name)
            .await?
            .is_none()
        {
            tag::create_tag(db, seed.name.clone(), seed.description.clone()).await?;
            info!("Seeded tag '{}'", seed.name);
            summary.tags += 1;
        }
    }

    for seed in &config.ingredients {
        if lifecycle::find_by_name::<Ingredient, _>(db, &seed.name)
            .await?
            .is_none()
        {
            ingredient::create_ingredient(
                db,
                seed.name.clone(),
                seed.description.clone(),
                seed.unit_cost,
                seed.unit,
            )
            .await?;
            info!("Seeded ingredient '{}' at {}/{}", seed.name, seed.unit_cost, seed.unit);
            summary.ingredients += 1;
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::config::catalog::{AdminConfig, CategorySeed, IngredientSeed, TagSeed};
    use crate::core::lifecycle::{LifecycleState, SoftDeletable};
    use crate::entities::UnitOfMeasure;
    use crate::test_utils::*;

    fn sample_config() -> CatalogConfig {
        CatalogConfig {
            admin: AdminConfig {
                username: "dona".to_string(),
                full_name: "Dona Benta".to_string(),
            },
            categories: vec![
                CategorySeed {
                    name: "Cakes".to_string(),
                    description: Some("Layered and iced".to_string()),
                },
                CategorySeed {
                    name: "Pies".to_string(),
                    description: None,
                },
            ],
            tags: vec![TagSeed {
                name: "Gluten-free".to_string(),
                description: None,
            }],
            ingredients: vec![
                IngredientSeed {
                    name: "Flour".to_string(),
                    description: None,
                    unit_cost: dec("25.00"),
                    unit: UnitOfMeasure::Kilogram,
                },
                IngredientSeed {
                    name: "Eggs".to_string(),
                    description: Some("Free range".to_string()),
                    unit_cost: dec("0.80"),
                    unit: UnitOfMeasure::Unit,
                },
            ],
        }
    }

    #[tokio::test]
    async fn test_seed_creates_then_skips() -> Result<()> {
        let db = setup_test_db().await?;
        let config = sample_config();

        let first = apply(&db, &config).await?;
        assert_eq!(first.users, 1);
        assert_eq!(first.categories, 2);
        assert_eq!(first.tags, 1);
        assert_eq!(first.ingredients, 2);

        let flour = lifecycle::find_by_name::<Ingredient, _>(&db, "Flour")
            .await?
            .unwrap();
        assert_eq!(flour.unit_cost, dec("25.00"));
        assert_eq!(flour.unit_of_measure, UnitOfMeasure::Kilogram);

        // The second pass finds everything in place
        let second = apply(&db, &config).await?;
        assert!(second.is_empty());
        assert_eq!(Category::find().count(&db).await?, 2);
        assert_eq!(Ingredient::find().count(&db).await?, 2);
        assert_eq!(User::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_matches_names_case_insensitively() -> Result<()> {
        let db = setup_test_db().await?;
        apply(&db, &sample_config()).await?;

        let mut shouty = sample_config();
        shouty.categories[0].name = "CAKES".to_string();
        shouty.ingredients[0].name = "flour".to_string();

        let rerun = apply(&db, &shouty).await?;
        assert!(rerun.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_seed_leaves_trashed_rows_in_the_trash() -> Result<()> {
        let db = setup_test_db().await?;
        apply(&db, &sample_config()).await?;

        let admin = User::find()
            .filter(user::Column::Username.eq("dona"))
            .one(&db)
            .await?
            .unwrap();
        let pies = lifecycle::find_by_name::<Category, _>(&db, "Pies")
            .await?
            .unwrap();
        category::soft_delete_category(&db, pies.id, admin.id).await?;

        let rerun = apply(&db, &sample_config()).await?;
        assert!(rerun.is_empty());

        let pies = lifecycle::find_by_name::<Category, _>(&db, "Pies")
            .await?
            .unwrap();
        assert_eq!(pies.state(), LifecycleState::Trashed);

        Ok(())
    }
}
