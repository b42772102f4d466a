//! Structured meaning extracted from a customer utterance.

use serde::{Deserialize, Serialize};

/// One requested item inside an [`Intent`].
///
/// Carries the customer's wording, not a catalog id: resolving the name
/// against the menu is the orchestrator's job so that unresolved names can
/// be reported back in the reply instead of being silently dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRequest {
    /// The item as the customer said it (e.g. "large coke")
    pub name: String,
    /// Requested quantity, always >= 1
    pub quantity: u32,
}

impl ItemRequest {
    pub fn new(name: impl Into<String>, quantity: u32) -> Self {
        Self {
            name: name.into(),
            quantity: quantity.max(1),
        }
    }
}

/// The order-affecting meaning of a single utterance.
///
/// A closed tagged variant: every case the transition table handles is a
/// variant here, so matching on an `Intent` is exhaustively checkable.
/// Produced by the interpreter, consumed exactly once by the orchestrator.
///
/// The serde representation doubles as the wire shape the language-model
/// backend is asked to produce, e.g.
/// `{"intent": "add_items", "data": [{"name": "coke", "quantity": 2}]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", content = "data", rename_all = "snake_case")]
pub enum Intent {
    /// The customer greeted us or wants to start ordering.
    Greet,
    /// Add the listed items to the order.
    AddItems(Vec<ItemRequest>),
    /// Remove the listed items from the order.
    RemoveItems(Vec<ItemRequest>),
    /// The customer asked for the running total.
    QueryTotal,
    /// The customer is done ordering.
    Finish,
    /// Nothing order-affecting could be extracted; carries the original text.
    Unrecognized(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape_round_trip() {
        let intent = Intent::AddItems(vec![ItemRequest::new("large coke", 2)]);
        let json = serde_json::to_string(&intent).unwrap();
        assert!(json.contains("\"intent\":\"add_items\""));
        let back: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, intent);
    }

    #[test]
    fn test_unit_variant_wire_shape() {
        let json = serde_json::to_string(&Intent::Finish).unwrap();
        let back: Intent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Intent::Finish);
    }

    #[test]
    fn test_item_request_quantity_floor() {
        assert_eq!(ItemRequest::new("coke", 0).quantity, 1);
    }
}
