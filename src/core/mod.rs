//! Core business logic - framework-agnostic expense operations and summaries.

/// Expense validation and CRUD operations
pub mod expense;
/// Trailing monthly totals and display helpers
pub mod summary;
