//! Expense entity - A single recorded farm expenditure.
//!
//! Each expense has a category from a closed set, a positive amount in currency
//! units (stored rounded to cents), the calendar date it was incurred, and a free-text
//! description. The `id` is assigned by the store and never changes.

use sea_orm::Iterable;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Closed set of expense classifications.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum Category {
    /// Seed stock and planting material
    #[sea_orm(string_value = "Seeds")]
    Seeds,
    /// Wages and hired help
    #[sea_orm(string_value = "Labor")]
    Labor,
    /// Equipment purchase, rental and repair
    #[sea_orm(string_value = "Machinery")]
    Machinery,
    /// Fertilizer and soil amendments
    #[sea_orm(string_value = "Fertilizer")]
    Fertilizer,
    /// Pesticides, herbicides and fungicides
    #[sea_orm(string_value = "Pesticides")]
    Pesticides,
    /// Diesel, petrol and other fuel
    #[sea_orm(string_value = "Fuel")]
    Fuel,
    /// Anything else
    #[sea_orm(string_value = "Other")]
    Other,
}

impl Category {
    /// Display name, identical to the stored value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seeds => "Seeds",
            Self::Labor => "Labor",
            Self::Machinery => "Machinery",
            Self::Fertilizer => "Fertilizer",
            Self::Pesticides => "Pesticides",
            Self::Fuel => "Fuel",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    /// Parses a category name, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let known: Vec<&str> = Self::iter().map(Self::as_str).collect();
                format!(
                    "Unknown category '{wanted}'. Expected one of: {}.",
                    known.join(", ")
                )
            })
    }
}

/// Expense database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    /// Unique identifier assigned by the store
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Expense classification
    pub category: Category,
    /// Amount spent, rounded to cents
    pub amount: f64,
    /// Calendar date of the expenditure
    pub date: Date,
    /// Free-text note, may be empty
    pub description: String,
}

/// `Expense` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
