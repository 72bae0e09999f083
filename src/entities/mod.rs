//! Entity module - SeaORM entity definitions for the catalog and ledger
//! tables. Each entity has a Model struct for data and an Entity struct for
//! operations; catalog tables additionally carry the trash-state columns.

pub mod category;
pub mod ingredient;
pub mod product;
pub mod product_ingredient;
pub mod product_tag;
pub mod sale;
pub mod sale_ingredient;
pub mod tag;
pub mod user;

// Re-export specific types to avoid conflicts
pub use category::{Column as CategoryColumn, Entity as Category, Model as CategoryModel};
pub use ingredient::{
    Column as IngredientColumn, Entity as Ingredient, Model as IngredientModel, UnitOfMeasure,
};
pub use product::{Column as ProductColumn, Entity as Product, Model as ProductModel};
pub use product_ingredient::{
    Column as ProductIngredientColumn, Entity as ProductIngredient, Model as ProductIngredientModel,
};
pub use product_tag::{Column as ProductTagColumn, Entity as ProductTag, Model as ProductTagModel};
pub use sale::{Column as SaleColumn, Entity as Sale, Model as SaleModel};
pub use sale_ingredient::{
    Column as SaleIngredientColumn, Entity as SaleIngredient, Model as SaleIngredientModel,
};
pub use tag::{Column as TagColumn, Entity as Tag, Model as TagModel};
pub use user::{Column as UserColumn, Entity as User, Model as UserModel};
