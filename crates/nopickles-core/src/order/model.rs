//! Order session domain model.
//!
//! This module contains the core `OrderSession` entity: accumulated line
//! items, conversation stage, and turn history for one customer session.

use super::snapshot::{LineItemSnapshot, OrderSnapshot};
use crate::menu::MenuItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The current phase of a session's conversation.
///
/// `Greeting` is the initial stage; `Completed` is terminal and no
/// transition leaves it. `Confirming` is an ordering-equivalent stage
/// reserved for a two-step confirmation flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Greeting,
    Ordering,
    Confirming,
    Completed,
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    Customer,
    Assistant,
}

/// A single turn in a session's conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who spoke
    pub speaker: Speaker,
    /// What was said
    pub text: String,
    /// Timestamp when the turn was recorded (ISO 8601 format)
    pub timestamp: String,
}

/// One distinct menu item and quantity within an order.
///
/// The unit price is snapshotted at add time, decoupling the line from any
/// later catalog change. Quantity is never zero: a fully removed item is
/// deleted from the order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Referenced menu item id (non-owning)
    pub menu_item_id: String,
    /// Display name at add time
    pub name: String,
    /// Quantity, always >= 1
    pub quantity: u32,
    /// Unit price at add time
    pub unit_price: Decimal,
}

impl OrderLineItem {
    /// Line subtotal: unit price x quantity.
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// One customer's continuous ordering conversation.
///
/// Created on the first utterance for a new session id, mutated only by
/// the orchestrator, and never deleted within the process lifetime.
/// The running total is always derived from the line items, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSession {
    /// Opaque caller-supplied session identifier
    pub id: String,
    /// Line items in insertion order
    pub line_items: Vec<OrderLineItem>,
    /// Current conversation stage
    pub stage: Stage,
    /// Append-only conversation history
    pub turns: Vec<ConversationTurn>,
    /// Timestamp when the session was created (ISO 8601 format)
    pub created_at: String,
    /// Timestamp when the order was completed, if it was
    pub completed_at: Option<String>,
}

impl OrderSession {
    /// Creates a fresh session in the `Greeting` stage.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            line_items: Vec::new(),
            stage: Stage::Greeting,
            turns: Vec::new(),
            created_at: chrono::Utc::now().to_rfc3339(),
            completed_at: None,
        }
    }

    /// Adds `quantity` of a menu item, merging on the menu item id: if the
    /// item is already on the order its quantity is incremented rather than
    /// creating a duplicate line.
    pub fn add_item(&mut self, item: &MenuItem, quantity: u32) {
        let quantity = quantity.max(1);
        if let Some(line) = self
            .line_items
            .iter_mut()
            .find(|line| line.menu_item_id == item.id)
        {
            line.quantity += quantity;
            return;
        }
        self.line_items.push(OrderLineItem {
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            quantity,
            unit_price: item.price,
        });
    }

    /// Removes `quantity` of a menu item. Removing at least the current
    /// quantity deletes the line entirely. Returns `false` when the item is
    /// not on the order; the caller notes that in the reply, it is not an
    /// error.
    pub fn remove_item(&mut self, menu_item_id: &str, quantity: u32) -> bool {
        let Some(index) = self
            .line_items
            .iter()
            .position(|line| line.menu_item_id == menu_item_id)
        else {
            return false;
        };

        if quantity >= self.line_items[index].quantity {
            self.line_items.remove(index);
        } else {
            self.line_items[index].quantity -= quantity;
        }
        true
    }

    /// The running total: sum of unit price x quantity over all line items.
    /// Always recomputed to prevent drift.
    pub fn total(&self) -> Decimal {
        self.line_items
            .iter()
            .map(OrderLineItem::subtotal)
            .sum::<Decimal>()
            .round_dp(2)
    }

    /// Appends a turn to the conversation history.
    pub fn push_turn(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.turns.push(ConversationTurn {
            speaker,
            text: text.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        });
    }

    /// Returns up to the last `count` turns, oldest first.
    pub fn recent_turns(&self, count: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(count);
        &self.turns[start..]
    }

    /// Marks the order completed and stamps the completion time.
    pub fn complete(&mut self) {
        self.stage = Stage::Completed;
        self.completed_at = Some(chrono::Utc::now().to_rfc3339());
    }

    /// Whether the session has reached its terminal stage.
    pub fn is_completed(&self) -> bool {
        self.stage == Stage::Completed
    }

    /// A serializable view of the order for the serving boundary.
    pub fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            line_items: self
                .line_items
                .iter()
                .map(|line| LineItemSnapshot {
                    name: line.name.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
            total: self.total(),
            stage: self.stage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::MenuCatalog;

    fn catalog() -> MenuCatalog {
        MenuCatalog::preset()
    }

    #[test]
    fn test_add_item_merges_on_id() {
        let catalog = catalog();
        let coke = catalog.find_by_id("drink3").unwrap();
        let mut session = OrderSession::new("s1");

        session.add_item(coke, 1);
        session.add_item(coke, 2);

        assert_eq!(session.line_items.len(), 1);
        assert_eq!(session.line_items[0].quantity, 3);
    }

    #[test]
    fn test_total_is_exact_over_repeated_merges() {
        let catalog = catalog();
        let fries = catalog.find_by_id("side1").unwrap();
        let mut session = OrderSession::new("s1");

        // 100 x $3.49 must be exactly $349.00, no float drift.
        for _ in 0..100 {
            session.add_item(fries, 1);
        }
        assert_eq!(session.total(), Decimal::new(34900, 2));
    }

    #[test]
    fn test_remove_smaller_quantity_decrements() {
        let catalog = catalog();
        let burger = catalog.find_by_id("burger2").unwrap();
        let mut session = OrderSession::new("s1");

        session.add_item(burger, 3);
        assert!(session.remove_item("burger2", 1));
        assert_eq!(session.line_items[0].quantity, 2);
    }

    #[test]
    fn test_remove_full_quantity_deletes_line() {
        let catalog = catalog();
        let burger = catalog.find_by_id("burger2").unwrap();
        let mut session = OrderSession::new("s1");

        session.add_item(burger, 2);
        // Removing more than is on the order still clears the line.
        assert!(session.remove_item("burger2", 5));
        assert!(session.line_items.is_empty());
        assert_eq!(session.total(), Decimal::ZERO);
    }

    #[test]
    fn test_remove_absent_item_is_signalled_not_fatal() {
        let mut session = OrderSession::new("s1");
        assert!(!session.remove_item("burger2", 1));
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let catalog = catalog();
        let mut session = OrderSession::new("s1");
        session.add_item(catalog.find_by_id("drink3").unwrap(), 1);
        session.add_item(catalog.find_by_id("burger2").unwrap(), 1);

        let names: Vec<&str> = session
            .line_items
            .iter()
            .map(|line| line.name.as_str())
            .collect();
        assert_eq!(names, vec!["Large Coke", "Cheeseburger"]);
    }

    #[test]
    fn test_snapshot_reflects_order() {
        let catalog = catalog();
        let mut session = OrderSession::new("s1");
        session.add_item(catalog.find_by_id("burger2").unwrap(), 1);
        session.add_item(catalog.find_by_id("drink3").unwrap(), 1);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.line_items.len(), 2);
        assert_eq!(snapshot.total, Decimal::new(1198, 2));
        assert_eq!(snapshot.stage, Stage::Greeting);
    }

    #[test]
    fn test_recent_turns_window() {
        let mut session = OrderSession::new("s1");
        for i in 0..10 {
            session.push_turn(Speaker::Customer, format!("turn {i}"));
        }
        let recent = session.recent_turns(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].text, "turn 7");
    }
}
