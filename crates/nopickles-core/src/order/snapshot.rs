//! Serializable order views for the serving boundary.

use super::model::Stage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One line of an [`OrderSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItemSnapshot {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

/// A point-in-time view of an order, shaped for the HTTP layer that wraps
/// the core (`POST /api/chat`, `GET /api/orders/{session_id}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSnapshot {
    pub line_items: Vec<LineItemSnapshot>,
    pub total: Decimal,
    pub stage: Stage,
}
