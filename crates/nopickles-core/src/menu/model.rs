//! Menu domain model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Menu category for grouping and display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Burgers,
    Sides,
    Drinks,
    Desserts,
}

impl Category {
    /// Display label used in menu text.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Burgers => "BURGERS",
            Category::Sides => "SIDES",
            Category::Drinks => "DRINKS",
            Category::Desserts => "DESSERTS",
        }
    }
}

/// A single orderable item.
///
/// Items are immutable once loaded; the catalog is read-only for the
/// lifetime of the process. Prices use exact decimal arithmetic with
/// two-decimal precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Unique item identifier
    pub id: String,
    /// Display name (e.g. "Large Coke")
    pub name: String,
    /// Menu category
    pub category: Category,
    /// Unit price, non-negative, scale 2
    pub price: Decimal,
    /// Short customer-facing description
    pub description: String,
    /// Common alternative names used for lookup (e.g. "coke")
    #[serde(default)]
    pub aliases: Vec<String>,
}
