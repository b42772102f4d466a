//! Natural-language reply synthesis.
//!
//! All customer-facing strings live here so the orchestrator stays a pure
//! transition table.

use nopickles_core::order::OrderSession;
use rust_decimal::Decimal;
use std::fmt::Write as _;

pub fn money(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

pub fn welcome() -> String {
    "Hello! Welcome to NoPickles. I'm here to help you order. What would you like today?"
        .to_string()
}

pub fn anything_else() -> String {
    "What else can I get you?".to_string()
}

pub fn clarification() -> String {
    "I'm not sure I understood that. You can tell me what you'd like to order, \
     ask for your total, or let me know when you're done."
        .to_string()
}

pub fn already_completed() -> String {
    "This order is already completed. Thank you for ordering with NoPickles!".to_string()
}

pub fn total_only(total: Decimal) -> String {
    format!("Your current total is {}.", money(total))
}

pub fn nothing_ordered_yet() -> String {
    "You haven't ordered anything yet. What would you like?".to_string()
}

pub fn couldnt_find(names: &[String]) -> String {
    let list = names
        .iter()
        .map(|name| format!("\"{name}\""))
        .collect::<Vec<_>>()
        .join(", ");
    format!("Sorry, I couldn't find {list} on our menu.")
}

/// Confirmation for added items, with couldn't-find notes and the running
/// total. `added` carries (name, quantity, line subtotal).
pub fn added(added: &[(String, u32, Decimal)], missing: &[String], total: Decimal) -> String {
    let mut reply = String::new();

    if !added.is_empty() {
        let items = added
            .iter()
            .map(|(name, quantity, subtotal)| {
                format!("{quantity}x {name} ({})", money(*subtotal))
            })
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(reply, "Great! I've added {items} to your order.");
    }

    if !missing.is_empty() {
        if !reply.is_empty() {
            reply.push(' ');
        }
        reply.push_str(&couldnt_find(missing));
    }

    if !added.is_empty() {
        let _ = write!(
            reply,
            " Your current total is {}. Would you like anything else?",
            money(total)
        );
    }

    reply
}

/// Confirmation for removed items. `not_on_order` resolved to the menu but
/// were not on the order; `missing` could not be resolved at all.
pub fn removed(
    removed: &[String],
    not_on_order: &[String],
    missing: &[String],
    total: Decimal,
) -> String {
    let mut parts = Vec::new();

    if !removed.is_empty() {
        parts.push(format!("I've taken {} off your order.", removed.join(", ")));
    }
    for name in not_on_order {
        parts.push(format!("You don't have {name} on your order."));
    }
    if !missing.is_empty() {
        parts.push(couldnt_find(missing));
    }
    parts.push(format!("Your current total is {}.", money(total)));

    parts.join(" ")
}

/// Final order summary for a completed order.
pub fn order_summary(session: &OrderSession) -> String {
    let mut summary = String::from("Perfect! Your order is complete.\nOrder Summary:\n");
    for line in &session.line_items {
        let _ = writeln!(
            summary,
            "  - {}x {}: {}",
            line.quantity,
            line.name,
            money(line.subtotal())
        );
    }
    let _ = write!(
        summary,
        "\nTotal: {}\n\nThank you for ordering with NoPickles!",
        money(session.total())
    );
    summary
}
