//! Entity module - Contains the SeaORM entity definition for the database.
//! The entity has a Model struct for data and an Entity struct for operations.

pub mod expense;

pub use expense::{Category, Entity as Expense};
