//! Sale ledger - append-only records with frozen cost snapshots.
//!
//! A sale is written once and never edited or deleted. At creation time it
//! freezes the product name, the price charged and, per active recipe entry,
//! an ingredient snapshot with the cost of the moment. Later catalog edits
//! change nothing here; the ledger is the shop's history, not a view over
//! the catalog.

use crate::{
    core::{
        lifecycle,
        page::{self, Page},
        recipe,
    },
    entities::{Product, Sale, SaleIngredient, sale, sale_ingredient},
    errors::{Error, Result},
};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{QueryOrder, QuerySelect, Set, TransactionTrait, prelude::*};

/// Caller-supplied fields for a new sale.
#[derive(Clone, Debug, Default)]
pub struct SaleDraft {
    /// Product being sold; must be active at creation time.
    pub product_id: i64,
    /// Units sold, at least 1.
    pub quantity: i32,
    /// Price charged per unit; may differ from the product's base price.
    pub unit_price: Decimal,
    /// When the sale happened; defaults to now.
    pub sale_date: Option<DateTimeUtc>,
    /// Free-form order notes.
    pub notes: Option<String>,
    /// Customer fields, all optional; the shop often sells walk-ins.
    pub customer_name: Option<String>,
    /// Customer document number.
    pub customer_document: Option<String>,
    /// Customer phone number.
    pub customer_phone: Option<String>,
}

/// Combinable listing filters; a default filter matches every sale.
#[derive(Clone, Debug, Default)]
pub struct SaleFilter {
    /// Case-insensitive substring of the frozen product name.
    pub product_name: Option<String>,
    /// Inclusive sale-date range.
    pub date_range: Option<(DateTimeUtc, DateTimeUtc)>,
}

/// Aggregates over whatever a [`SaleFilter`] matches.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaleTotals {
    /// Matching sale count.
    pub count: u64,
    /// Sum of `total_amount` over the matches; zero when nothing matches.
    pub revenue: Decimal,
}

/// One sale with its snapshots and derived cost figures.
#[derive(Clone, Debug)]
pub struct SaleDetail {
    /// The ledger row itself.
    pub sale: sale::Model,
    /// Frozen ingredient snapshots, name ascending.
    pub ingredients: Vec<sale_ingredient::Model>,
    /// Sum of the snapshots' `total_cost`.
    pub ingredient_cost: Decimal,
    /// `total_amount` minus `ingredient_cost`.
    pub margin: Decimal,
}

/// Records a sale and freezes its cost snapshots, all in one transaction.
///
/// `total_amount` is `unit_price × quantity` at 2 decimal places. Each
/// active recipe entry of the product becomes one snapshot row carrying the
/// ingredient's name, unit label and unit cost as of this moment, with
/// `quantity_used = entry quantity × units sold` and
/// `total_cost = quantity_used × unit cost`, both at 4 decimal places.
///
/// # Errors
/// Returns an error if:
/// - The quantity is below 1 or the unit price is negative
/// - The product is missing or trashed
/// - Any insert fails; the transaction rolls back and no rows remain
pub async fn create_sale(
    db: &DatabaseConnection,
    draft: SaleDraft,
    registered_by: i64,
) -> Result<sale::Model> {
    if draft.quantity < 1 {
        return Err(Error::InvalidQuantity {
            quantity: Decimal::from(draft.quantity),
        });
    }
    if draft.unit_price < Decimal::ZERO {
        return Err(Error::InvalidAmount {
            amount: draft.unit_price,
        });
    }

    let txn = db.begin().await?;

    let product = lifecycle::get_active::<Product, _>(&txn, draft.product_id).await?;
    let items = recipe::get_recipe(&txn, product.id).await?;

    let quantity = Decimal::from(draft.quantity);
    let total_amount = (draft.unit_price * quantity).round_dp(2);
    let now = chrono::Utc::now();

    let created = sale::ActiveModel {
        sale_date: Set(draft.sale_date.unwrap_or(now)),
        registered_by_id: Set(registered_by),
        product_id: Set(Some(product.id)),
        product_name: Set(product.name),
        quantity: Set(draft.quantity),
        unit_price: Set(draft.unit_price),
        total_amount: Set(total_amount),
        notes: Set(draft.notes),
        customer_name: Set(draft.customer_name),
        customer_document: Set(draft.customer_document),
        customer_phone: Set(draft.customer_phone),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    for item in items {
        let quantity_used = (item.entry.quantity * quantity).round_dp(4);
        let total_cost = (quantity_used * item.ingredient.unit_cost).round_dp(4);
        sale_ingredient::ActiveModel {
            sale_id: Set(created.id),
            ingredient_id: Set(Some(item.ingredient.id)),
            ingredient_name: Set(item.ingredient.name),
            quantity_used: Set(quantity_used),
            unit_cost: Set(item.ingredient.unit_cost),
            unit_of_measure: Set(item.ingredient.unit_of_measure.label().to_string()),
            total_cost: Set(total_cost),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
    }

    txn.commit().await?;
    Ok(created)
}

/// Paginated ledger listing, newest sale date first, under the filter.
pub async fn list_sales(
    db: &DatabaseConnection,
    filter: &SaleFilter,
    page: u64,
    per_page: u64,
) -> Result<Page<sale::Model>> {
    let select = filtered(filter)
        .order_by_desc(sale::Column::SaleDate)
        .order_by_desc(sale::Column::Id);
    page::fetch_page(db, select, page, per_page).await
}

/// Count and summed revenue under the filter. An empty match reports zero
/// revenue rather than a missing one.
pub async fn sale_totals(db: &DatabaseConnection, filter: &SaleFilter) -> Result<SaleTotals> {
    let count = filtered(filter).count(db).await?;
    let revenue = filtered(filter)
        .select_only()
        .column_as(sale::Column::TotalAmount.sum(), "revenue")
        .into_tuple::<Option<Decimal>>()
        .one(db)
        .await?
        .flatten()
        .unwrap_or(Decimal::ZERO);
    Ok(SaleTotals { count, revenue })
}

/// How many ledger rows point at the product, whatever its state. The count
/// keys on the id, so it survives renames and the trash.
pub async fn count_sales_for_product(db: &DatabaseConnection, product_id: i64) -> Result<u64> {
    Sale::find()
        .filter(sale::Column::ProductId.eq(product_id))
        .count(db)
        .await
        .map_err(Into::into)
}

/// One sale with its snapshots and the derived cost figures.
///
/// # Errors
/// Returns an error if the sale does not exist or the database query fails.
pub async fn get_sale_detail(db: &DatabaseConnection, sale_id: i64) -> Result<SaleDetail> {
    let sale = Sale::find()
        .filter(sale::Column::Id.eq(sale_id))
        .one(db)
        .await?
        .ok_or(Error::NotFound {
            entity: "sale",
            id: sale_id,
        })?;

    let mut ingredients = SaleIngredient::find()
        .filter(sale_ingredient::Column::SaleId.eq(sale_id))
        .all(db)
        .await?;
    ingredients.sort_by_key(|row| row.ingredient_name.to_lowercase());

    let ingredient_cost: Decimal = ingredients.iter().map(|row| row.total_cost).sum();
    let margin = sale.total_amount - ingredient_cost;

    Ok(SaleDetail {
        sale,
        ingredients,
        ingredient_cost,
        margin,
    })
}

fn filtered(filter: &SaleFilter) -> Select<Sale> {
    let mut select = Sale::find();
    if let Some(name) = &filter.product_name {
        let pattern = format!("%{}%", name.trim().to_lowercase());
        select = select
            .filter(Expr::expr(Func::lower(Expr::col(sale::Column::ProductName))).like(pattern));
    }
    if let Some((from, until)) = filter.date_range {
        select = select.filter(sale::Column::SaleDate.between(from, until));
    }
    select
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::{
        ingredient::update_ingredient,
        product::{ProductDraft, soft_delete_product, update_product},
        recipe::{add_recipe_entry, remove_recipe_entry},
    };
    use crate::entities::UnitOfMeasure;
    use crate::test_utils::*;
    use chrono::TimeZone;
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn day(d: u32) -> DateTimeUtc {
        chrono::Utc.with_ymd_and_hms(2024, 3, d, 12, 0, 0).unwrap()
    }

    fn dated_sale(product_id: i64, quantity: i32, unit_price: &str, d: u32) -> SaleDraft {
        SaleDraft {
            product_id,
            quantity,
            unit_price: dec(unit_price),
            sale_date: Some(day(d)),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_sale_freezes_the_moment() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let flour = create_test_ingredient(&db, "Flour", "25.00").await?;
        let cake = create_test_product(&db, "Chocolate Cake", user.id).await?;
        add_recipe_entry(&db, cake.id, flour.id, dec("2")).await?;

        let sale = create_sale(&db, draft_sale(cake.id, 3), user.id).await?;
        assert_eq!(sale.product_name, "Chocolate Cake");
        assert_eq!(sale.quantity, 3);
        assert_eq!(sale.unit_price, dec("450.00"));
        assert_eq!(sale.total_amount, dec("1350.00"));
        assert_eq!(sale.registered_by_id, user.id);

        let detail = get_sale_detail(&db, sale.id).await?;
        assert_eq!(detail.ingredients.len(), 1);
        let snapshot = &detail.ingredients[0];
        assert_eq!(snapshot.ingredient_id, Some(flour.id));
        assert_eq!(snapshot.ingredient_name, "Flour");
        assert_eq!(snapshot.quantity_used, dec("6"));
        assert_eq!(snapshot.unit_cost, dec("25.00"));
        assert_eq!(snapshot.total_cost, dec("150.00"));
        assert_eq!(snapshot.unit_of_measure, "kilogram");
        assert_eq!(detail.ingredient_cost, dec("150.00"));
        assert_eq!(detail.margin, dec("1200.00"));

        Ok(())
    }

    #[tokio::test]
    async fn test_ledger_ignores_later_catalog_edits() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let flour = create_test_ingredient(&db, "Flour", "25.00").await?;
        let cake = create_test_product(&db, "Chocolate Cake", user.id).await?;
        add_recipe_entry(&db, cake.id, flour.id, dec("2")).await?;
        let sale = create_sale(&db, draft_sale(cake.id, 3), user.id).await?;

        // Rework the catalog after the fact
        update_ingredient(
            &db,
            flour.id,
            "Bread Flour".to_string(),
            None,
            dec("30.00"),
            UnitOfMeasure::Gram,
        )
        .await?;
        update_product(
            &db,
            cake.id,
            ProductDraft {
                name: "Gateau".to_string(),
                base_price: Some(dec("500.00")),
                visible: true,
                ..Default::default()
            },
        )
        .await?;
        remove_recipe_entry(&db, cake.id, flour.id).await?;

        // None of it reached the ledger
        let detail = get_sale_detail(&db, sale.id).await?;
        assert_eq!(detail.sale.product_name, "Chocolate Cake");
        assert_eq!(detail.sale.total_amount, dec("1350.00"));
        let snapshot = &detail.ingredients[0];
        assert_eq!(snapshot.ingredient_name, "Flour");
        assert_eq!(snapshot.unit_cost, dec("25.00"));
        assert_eq!(snapshot.quantity_used, dec("6"));
        assert_eq!(snapshot.unit_of_measure, "kilogram");

        // Cost round-trip: stored totals match an independent recompute
        let recomputed: Decimal = detail
            .ingredients
            .iter()
            .map(|s| s.quantity_used * s.unit_cost)
            .sum();
        assert_eq!(detail.ingredient_cost, recomputed);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_sale_rejects_bad_input_before_any_query() -> Result<()> {
        // A mock connection with no prepared results proves the gates fire
        // before the transaction opens
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let err = create_sale(&db, draft_sale(1, 0), 1).await.unwrap_err();
        assert!(matches!(err, Error::InvalidQuantity { .. }));

        let err = create_sale(&db, draft_sale(1, -3), 1).await.unwrap_err();
        assert!(matches!(err, Error::InvalidQuantity { .. }));

        let mut negative = draft_sale(1, 1);
        negative.unit_price = dec("-5");
        let err = create_sale(&db, negative, 1).await.unwrap_err();
        assert!(matches!(err, Error::InvalidAmount { .. }));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_sale_requires_an_active_product() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let (product, _flour) = setup_recipe_product(&db, user.id).await?;

        let err = create_sale(&db, draft_sale(999, 1), user.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "product", .. }));

        // A trashed product can no longer be sold
        soft_delete_product(&db, product.id, user.id).await?;
        let err = create_sale(&db, draft_sale(product.id, 1), user.id)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "product", .. }));

        // None of the failed attempts left anything behind
        assert_eq!(Sale::find().count(&db).await?, 0);
        assert_eq!(SaleIngredient::find().count(&db).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_failed_sale_leaves_no_rows() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let (product, _flour) = setup_recipe_product(&db, user.id).await?;

        // A nonexistent acting user trips the ledger's required foreign key
        // mid-transaction, after validation has already passed
        let result = create_sale(&db, draft_sale(product.id, 1), 9999).await;
        assert!(matches!(result.unwrap_err(), Error::Database(_)));

        assert_eq!(Sale::find().count(&db).await?, 0);
        assert_eq!(SaleIngredient::find().count(&db).await?, 0);

        // The same draft goes through cleanly with a real user
        let sale = create_sale(&db, draft_sale(product.id, 1), user.id).await?;
        assert_eq!(Sale::find().count(&db).await?, 1);
        assert_eq!(
            SaleIngredient::find()
                .filter(sale_ingredient::Column::SaleId.eq(sale.id))
                .count(&db)
                .await?,
            1
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_without_recipe_has_no_snapshots() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let brioche = create_test_product(&db, "Brioche", user.id).await?;

        let sale = create_sale(&db, draft_sale(brioche.id, 2), user.id).await?;
        // No recipe, no snapshots; the date defaulted to the insert moment
        assert_eq!(sale.sale_date, sale.created_at);

        let detail = get_sale_detail(&db, sale.id).await?;
        assert!(detail.ingredients.is_empty());
        assert_eq!(detail.ingredient_cost, Decimal::ZERO);
        assert_eq!(detail.margin, sale.total_amount);

        Ok(())
    }

    #[tokio::test]
    async fn test_filters_combine_and_agree_with_totals() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let cake = create_test_product(&db, "Chocolate Cake", user.id).await?;
        let brioche = create_test_product(&db, "Brioche", user.id).await?;

        create_sale(&db, dated_sale(cake.id, 1, "450.00", 1), user.id).await?;
        create_sale(&db, dated_sale(cake.id, 2, "450.00", 5), user.id).await?;
        create_sale(&db, dated_sale(brioche.id, 3, "40.00", 10), user.id).await?;

        // Neither filter
        let all = list_sales(&db, &SaleFilter::default(), 0, 10).await?;
        assert_eq!(all.total_items, 3);
        // Newest sale date first
        assert_eq!(all.items[0].product_name, "Brioche");
        let totals = sale_totals(&db, &SaleFilter::default()).await?;
        assert_eq!(totals.count, 3);
        assert_eq!(totals.revenue, dec("1470.00"));

        // Name only, case-insensitive substring
        let by_name = SaleFilter {
            product_name: Some("CAKE".to_string()),
            ..Default::default()
        };
        let hits = list_sales(&db, &by_name, 0, 10).await?;
        assert_eq!(hits.total_items, 2);
        let totals = sale_totals(&db, &by_name).await?;
        assert_eq!(totals.count, 2);
        assert_eq!(totals.revenue, dec("1350.00"));

        // Range only, inclusive on both edges
        let by_range = SaleFilter {
            date_range: Some((day(1), day(5))),
            ..Default::default()
        };
        let hits = list_sales(&db, &by_range, 0, 10).await?;
        assert_eq!(hits.total_items, 2);
        let totals = sale_totals(&db, &by_range).await?;
        assert_eq!(totals.revenue, dec("1350.00"));

        // Both combined
        let both = SaleFilter {
            product_name: Some("brio".to_string()),
            date_range: Some((day(2), day(12))),
        };
        let hits = list_sales(&db, &both, 0, 10).await?;
        assert_eq!(hits.total_items, 1);
        assert_eq!(hits.items[0].product_name, "Brioche");

        // A filter matching nothing reports zero revenue, not an absence
        let nothing = SaleFilter {
            product_name: Some("cake".to_string()),
            date_range: Some((day(6), day(12))),
        };
        assert!(list_sales(&db, &nothing, 0, 10).await?.is_empty());
        let totals = sale_totals(&db, &nothing).await?;
        assert_eq!(totals.count, 0);
        assert_eq!(totals.revenue, Decimal::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_pagination() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let cake = create_test_product(&db, "Chocolate Cake", user.id).await?;
        for d in 1..=5 {
            create_sale(&db, dated_sale(cake.id, 1, "450.00", d), user.id).await?;
        }

        let first = list_sales(&db, &SaleFilter::default(), 0, 2).await?;
        assert_eq!(first.total_items, 5);
        assert_eq!(first.total_pages, 3);
        assert_eq!(first.items.len(), 2);
        assert_eq!(first.items[0].sale_date, day(5));

        let last = list_sales(&db, &SaleFilter::default(), 2, 2).await?;
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].sale_date, day(1));

        Ok(())
    }

    #[tokio::test]
    async fn test_count_sales_for_product_survives_the_trash() -> Result<()> {
        let (db, user) = setup_with_user().await?;
        let cake = create_test_product(&db, "Chocolate Cake", user.id).await?;
        let brioche = create_test_product(&db, "Brioche", user.id).await?;

        create_sale(&db, draft_sale(cake.id, 1), user.id).await?;
        create_sale(&db, draft_sale(cake.id, 2), user.id).await?;
        create_sale(&db, draft_sale(brioche.id, 1), user.id).await?;

        assert_eq!(count_sales_for_product(&db, cake.id).await?, 2);
        assert_eq!(count_sales_for_product(&db, brioche.id).await?, 1);

        soft_delete_product(&db, cake.id, user.id).await?;
        assert_eq!(count_sales_for_product(&db, cake.id).await?, 2);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_sale_detail_missing() -> Result<()> {
        let db = setup_test_db().await?;
        let err = get_sale_detail(&db, 42).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { entity: "sale", id: 42 }));
        Ok(())
    }
}
