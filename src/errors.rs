//! Crate-wide error type and the category grouping presentation layers key on.

use rust_decimal::Decimal;
use thiserror::Error;

/// Everything that can go wrong inside the engine.
#[derive(Debug, Error)]
pub enum Error {
    /// No row with this id, or the row is trashed where an active one is required
    #[error("{entity} not found with id {id}")]
    NotFound {
        /// Entity noun for the message ("category", "product", ...)
        entity: &'static str,
        /// Id that failed to resolve
        id: i64,
    },

    /// An active row already holds this name (case-insensitive)
    #[error("an active {entity} named '{name}' already exists")]
    NameTaken {
        /// Entity noun for the message
        entity: &'static str,
        /// Conflicting name as the caller supplied it
        name: String,
    },

    /// A trashed row holds this name; it must be restored or purged first
    #[error("a {entity} named '{name}' is in the trash; restore it or purge it before reusing the name")]
    NameInTrash {
        /// Entity noun for the message
        entity: &'static str,
        /// Conflicting name as the caller supplied it
        name: String,
    },

    /// Restore/purge asked of a row that is not in the trash
    #[error("{entity} with id {id} is not in the trash")]
    NotTrashed {
        /// Entity noun for the message
        entity: &'static str,
        /// Id of the row in the wrong state
        id: i64,
    },

    /// Removal blocked because other rows still reference this one
    #[error("cannot remove {entity} with id {id}: {count} {dependents} still reference it")]
    DependentsExist {
        /// Entity noun for the message
        entity: &'static str,
        /// Id of the blocked row
        id: i64,
        /// How many dependents were found
        count: u64,
        /// What the dependents are ("active products", "recipe entries", ...)
        dependents: &'static str,
    },

    /// Quantity outside its allowed range (recipe quantities > 0, sale units >= 1)
    #[error("quantity must be greater than zero, got {quantity}")]
    InvalidQuantity {
        /// Rejected quantity
        quantity: Decimal,
    },

    /// Negative money where only zero or more makes sense
    #[error("amount must not be negative, got {amount}")]
    InvalidAmount {
        /// Rejected amount
        amount: Decimal,
    },

    /// Recipe row expected but not present
    #[error("product {product_id} does not have ingredient {ingredient_id} in its recipe")]
    NotInRecipe {
        /// Product whose recipe was checked
        product_id: i64,
        /// Ingredient that was not found in it
        ingredient_id: i64,
    },

    /// Recipe row already present where a new one was being added
    #[error("product {product_id} already has ingredient {ingredient_id} in its recipe")]
    AlreadyInRecipe {
        /// Product whose recipe was checked
        product_id: i64,
        /// Ingredient that is already in it
        ingredient_id: i64,
    },

    /// Tag link expected but not present
    #[error("product {product_id} does not carry tag {tag_id}")]
    NotTagged {
        /// Product whose links were checked
        product_id: i64,
        /// Tag that was not linked
        tag_id: i64,
    },

    /// Tag link already present where a new one was being added
    #[error("product {product_id} already carries tag {tag_id}")]
    AlreadyTagged {
        /// Product whose links were checked
        product_id: i64,
        /// Tag that is already linked
        tag_id: i64,
    },

    /// Malformed input caught before any write (empty name, negative lead time)
    #[error("validation failed: {message}")]
    Validation {
        /// What was wrong
        message: String,
    },

    /// Bad or missing configuration (seed file, environment)
    #[error("configuration error: {message}")]
    Config {
        /// What was wrong
        message: String,
    },

    /// Anything the database driver reports
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Filesystem problems while reading configuration
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse grouping of [`Error`] variants for presentation layers.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Target row does not exist (or is trashed where active was required)
    NotFound,
    /// The operation clashes with current state (names, lifecycle, duplicates)
    Conflict,
    /// Removal blocked by rows that still reference the target
    DependentsExist,
    /// Caller-supplied value rejected before any write
    InvalidInput,
    /// Infrastructure trouble; nothing the caller can fix by retrying with other input
    Internal,
}

impl Error {
    /// Which [`ErrorCategory`] this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::NotFound { .. } | Error::NotInRecipe { .. } | Error::NotTagged { .. } => {
                ErrorCategory::NotFound
            }
            Error::NameTaken { .. }
            | Error::NameInTrash { .. }
            | Error::NotTrashed { .. }
            | Error::AlreadyInRecipe { .. }
            | Error::AlreadyTagged { .. } => ErrorCategory::Conflict,
            Error::DependentsExist { .. } => ErrorCategory::DependentsExist,
            Error::InvalidQuantity { .. }
            | Error::InvalidAmount { .. }
            | Error::Validation { .. } => ErrorCategory::InvalidInput,
            Error::Config { .. } | Error::Database(_) | Error::Io(_) => ErrorCategory::Internal,
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
