//! Core business logic for the catalog and the sale ledger.
//!
//! Everything here is framework-agnostic: plain async functions over a
//! database connection, no presentation concerns. The lifecycle module
//! carries the shared three-state machinery; the per-entity modules add
//! their own dependent rules on top of it.

/// Category operations - lifecycle plus product-dependent rules
pub mod category;
/// Ingredient operations - costs, units, recipe-dependent rules
pub mod ingredient;
/// Shared three-state lifecycle engine for the catalog entity types
pub mod lifecycle;
/// Pagination envelope and the shared page fetcher
pub mod page;
/// Product operations - drafts, tag associations, owned-row purge
pub mod product;
/// Recipe graph - ingredient entries, availability, cost roll-up
pub mod recipe;
/// Append-only sale ledger with frozen cost snapshots
pub mod sale;
/// Tag operations - lifecycle plus association-dependent purge rules
pub mod tag;
