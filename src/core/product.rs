//! Product business logic.
//!
//! Products are the hub of the catalog: they sit in a category, carry a
//! recipe and tag associations, and are what sales point back to. Nothing
//! blocks trashing a product. Purging one sweeps up its owned rows in the
//! same transaction: recipe entries and tag links are deleted outright,
//! while past sales only lose their back-pointer and keep every frozen
//! figure.

use crate::{
    core::{
        lifecycle,
        page::{self, Page},
    },
    entities::{
        Category, Product, ProductIngredient, ProductTag, Sale, Tag, product, product_ingredient,
        product_tag, sale, tag,
    },
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};

/// Caller-supplied product fields, shared by create and update.
#[derive(Clone, Debug, Default)]
pub struct ProductDraft {
    /// Display name, unique across the catalog in any state.
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Suggested sale price; sales may override it per order.
    pub base_price: Option<Decimal>,
    /// Lead time in days for made-to-order items.
    pub preparation_days: Option<i32>,
    /// Catalog photo location.
    pub image_url: Option<String>,
    /// Whether the product shows up on outward-facing listings.
    pub visible: bool,
    /// Category the product is filed under, if any.
    pub category_id: Option<i64>,
}

fn validate_draft(draft: &ProductDraft) -> Result<()> {
    if let Some(price) = draft.base_price
        && price < Decimal::ZERO
    {
        return Err(Error::InvalidAmount { amount: price });
    }
    if let Some(days) = draft.preparation_days
        && days < 0
    {
        return Err(Error::Validation {
            message: format!("preparation days cannot be negative: {days}"),
        });
    }
    Ok(())
}

/// Creates a new active product from a draft, attributed to `created_by`.
///
/// # Errors
/// Returns an error if:
/// - The name is empty or held by another product in any state
/// - The base price or preparation days are negative
/// - The referenced category is missing or trashed
/// - The database operation fails
pub async fn create_product(
    db: &DatabaseConnection,
    draft: ProductDraft,
    created_by: i64,
) -> Result<product::Model> {
    validate_draft(&draft)?;

    let txn = db.begin().await?;

    lifecycle::ensure_name_available::<Product, _>(&txn, &draft.name, None).await?;
    if let Some(category_id) = draft.category_id {
        lifecycle::get_active::<Category, _>(&txn, category_id).await?;
    }

    let now = chrono::Utc::now();
    let created = product::ActiveModel {
        name: Set(draft.name.trim().to_string()),
        description: Set(draft.description),
        base_price: Set(draft.base_price),
        preparation_days: Set(draft.preparation_days),
        image_url: Set(draft.image_url),
        visible: Set(draft.visible),
        category_id: Set(draft.category_id),
        created_by_id: Set(Some(created_by)),
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

/// Replaces the editable fields of an active product with the draft's.
///
/// # Errors
/// Returns the same errors as [`create_product`], plus `NotFound` when the
/// product itself is missing or trashed.
pub async fn update_product(
    db: &DatabaseConnection,
    id: i64,
    draft: ProductDraft,
) -> Result<product::Model> {
    validate_draft(&draft)?;

    let txn = db.begin().await?;

    let existing = lifecycle::get_active::<Product, _>(&txn, id).await?;
    lifecycle::ensure_name_available::<Product, _>(&txn, &draft.name, Some(existing.id)).await?;
    if let Some(category_id) = draft.category_id {
        lifecycle::get_active::<Category, _>(&txn, category_id).await?;
    }

    let mut active: product::ActiveModel = existing.into();
    active.name = Set(draft.name.trim().to_string());
    active.description = Set(draft.description);
    active.base_price = Set(draft.base_price);
    active.preparation_days = Set(draft.preparation_days);
    active.image_url = Set(draft.image_url);
    active.visible = Set(draft.visible);
    active.category_id = Set(draft.category_id);
    active.updated_at = Set(chrono::Utc::now());
    let updated = active.update(&txn).await?;

    txn.commit().await?;
    Ok(updated)
}

/// Moves an active product to the trash. Its recipe, tag links and sales all
/// stay put; only visibility changes.
pub async fn soft_delete_product(
    db: &DatabaseConnection,
    id: i64,
    deleted_by: i64,
) -> Result<product::Model> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_active::<Product, _>(&txn, id).await?;
    lifecycle::mark_trashed::<Product, _>(&txn, existing.id, deleted_by).await?;
    let trashed = lifecycle::get_any_state::<Product, _>(&txn, id).await?;

    txn.commit().await?;
    Ok(trashed)
}

/// Brings a trashed product back to active.
pub async fn restore_product(db: &DatabaseConnection, id: i64) -> Result<product::Model> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_any_state::<Product, _>(&txn, id).await?;
    lifecycle::require_trashed("product", &existing)?;
    lifecycle::ensure_no_active_name_clash::<Product, _>(&txn, &existing.name, existing.id).await?;

    lifecycle::mark_restored::<Product, _>(&txn, existing.id).await?;
    let restored = lifecycle::get_any_state::<Product, _>(&txn, id).await?;

    txn.commit().await?;
    Ok(restored)
}

/// Permanently removes a trashed product along with the rows it owns.
///
/// Recipe entries and tag links are deleted; sales survive with
/// `product_id` cleared and their frozen name and amounts intact.
///
/// # Errors
/// Returns an error if the product is missing, not in the trash, or the
/// database operation fails.
pub async fn purge_product(db: &DatabaseConnection, id: i64) -> Result<()> {
    let txn = db.begin().await?;

    let existing = lifecycle::get_any_state::<Product, _>(&txn, id).await?;
    lifecycle::require_trashed("product", &existing)?;

    ProductIngredient::delete_many()
        .filter(product_ingredient::Column::ProductId.eq(id))
        .exec(&txn)
        .await?;
    ProductTag::delete_many()
        .filter(product_tag::Column::ProductId.eq(id))
        .exec(&txn)
        .await?;
    Sale::update_many()
        .col_expr(sale::Column::ProductId, Expr::value(None::<i64>))
        .filter(sale::Column::ProductId.eq(id))
        .exec(&txn)
        .await?;

    lifecycle::delete_row::<Product, _>(&txn, id).await?;
    txn.commit().await?;
    Ok(())
}

/// Single active product or `NotFound`.
pub async fn get_active_product(db: &DatabaseConnection, id: i64) -> Result<product::Model> {
    lifecycle::get_active::<Product, _>(db, id).await
}

/// Active products, name ascending, paginated.
pub async fn list_active_products(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<Page<product::Model>> {
    lifecycle::list_active::<Product, _>(db, page, per_page).await
}

/// Trashed products, most recently trashed first, paginated.
pub async fn list_trashed_products(
    db: &DatabaseConnection,
    page: u64,
    per_page: u64,
) -> Result<Page<product::Model>> {
    lifecycle::list_trashed::<Product, _>(db, page, per_page).await
}

/// Case-insensitive name search over active products, paginated.
pub async fn search_products(
    db: &DatabaseConnection,
    term: &str,
    page: u64,
    per_page: u64,
) -> Result<Page<product::Model>> {
    lifecycle::search_active::<Product, _>(db, term, page, per_page).await
}

/// Active products filed under an active category, name ascending, paginated.
pub async fn list_products_in_category(
    db: &DatabaseConnection,
    category_id: i64,
    page: u64,
    per_page: u64,
) -> Result<Page<product::Model>> {
    lifecycle::get_active::<Category, _>(db, category_id).await?;

    let select = Product::find()
        .filter(product::Column::CategoryId.eq(category_id))
        .filter(product::Column::DeletedAt.is_null())
        .order_by_asc(product::Column::Name);
    page::fetch_page(db, select, page, per_page).await
}

/// Links an active tag to an active product.
///
/// # Errors
/// Returns an error if either side is missing or trashed, if the link
/// already exists, or if the database operation fails.
pub async fn add_tag_to_product(
    db: &DatabaseConnection,
    product_id: i64,
    tag_id: i64,
) -> Result<product_tag::Model> {
    let txn = db.begin().await?;

    lifecycle::get_active::<Product, _>(&txn, product_id).await?;
    lifecycle::get_active::<Tag, _>(&txn, tag_id).await?;

    let existing = find_link(&txn, product_id, tag_id).await?;
    if existing.is_some() {
        return Err(Error::AlreadyTagged { product_id, tag_id });
    }

    let now = chrono::Utc::now();
    let link = product_tag::ActiveModel {
        product_id: Set(product_id),
        tag_id: Set(tag_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(link)
}

/// Unlinks a tag from an active product. The tag itself may be in any state;
/// clearing links is how a trashed tag becomes purgeable.
pub async fn remove_tag_from_product(
    db: &DatabaseConnection,
    product_id: i64,
    tag_id: i64,
) -> Result<()> {
    let txn = db.begin().await?;

    lifecycle::get_active::<Product, _>(&txn, product_id).await?;
    let link = find_link(&txn, product_id, tag_id)
        .await?
        .ok_or(Error::NotTagged { product_id, tag_id })?;

    ProductTag::delete_many()
        .filter(product_tag::Column::Id.eq(link.id))
        .exec(&txn)
        .await?;

    txn.commit().await?;
    Ok(())
}

/// Active tags linked to an active product, name ascending.
pub async fn get_product_tags(db: &DatabaseConnection, product_id: i64) -> Result<Vec<tag::Model>> {
    lifecycle::get_active::<Product, _>(db, product_id).await?;

    let mut tags: Vec<tag::Model> = ProductTag::find()
        .filter(product_tag::Column::ProductId.eq(product_id))
        .find_also_related(Tag)
        .all(db)
        .await?
        .into_iter()
        .filter_map(|(_, tag)| tag)
        .filter(|tag| tag.deleted_at.is_none())
        .collect();
    tags.sort_by_key(|tag| tag.name.to_lowercase());
    Ok(tags)
}

/// Active tags not yet linked to the product, name ascending. Picker helper.
pub async fn get_available_tags(
    db: &DatabaseConnection,
    product_id: i64,
) -> Result<Vec<tag::Model>> {
    lifecycle::get_active::<Product, _>(db, product_id).await?;

    let linked: Vec<i64> = ProductTag::find()
        .filter(product_tag::Column::ProductId.eq(product_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.tag_id)
        .collect();

    let mut tags = Tag::find()
        .filter(tag::Column::DeletedAt.is_null())
        .filter(tag::Column::Id.is_not_in(linked))
        .all(db)
        .await?;
    tags.sort_by_key(|tag| tag.name.to_lowercase());
    Ok(tags)
}

/// Active products carrying an active tag, name ascending, paginated.
pub async fn list_products_by_tag(
    db: &DatabaseConnection,
    tag_id: i64,
    page: u64,
    per_page: u64,
) -> Result<Page<product::Model>> {
    lifecycle::get_active::<Tag, _>(db, tag_id).await?;

    let select = tagged_products(db, tag_id).await?;
    page::fetch_page(db, select, page, per_page).await
}

/// How many active products carry an active tag.
pub async fn count_products_by_tag(db: &DatabaseConnection, tag_id: i64) -> Result<u64> {
    lifecycle::get_active::<Tag, _>(db, tag_id).await?;

    let select = tagged_products(db, tag_id).await?;
    select.count(db).await.map_err(Into::into)
}

async fn tagged_products<C>(db: &C, tag_id: i64) -> Result<Select<Product>>
where
    C: ConnectionTrait,
{
    let linked: Vec<i64> = ProductTag::find()
        .filter(product_tag::Column::TagId.eq(tag_id))
        .all(db)
        .await?
        .into_iter()
        .map(|link| link.product_id)
        .collect();

    Ok(Product::find()
        .filter(product::Column::Id.is_in(linked))
        .filter(product::Column::DeletedAt.is_null())
        .order_by_asc(product::Column::Name))
}

async fn find_link<C>(db: &C, product_id: i64, tag_id: i64) -> Result<Option<product_tag::Model>>
where
    C: ConnectionTrait,
{
    ProductTag::find()
        .filter(product_tag::Column::ProductId.eq(product_id))
        .filter(product_tag::Column::TagId.eq(tag_id))
        .one(db)
        .await
        .map_err(Into::into)
}
