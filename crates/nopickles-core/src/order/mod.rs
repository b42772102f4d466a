//! Order session: one customer's in-progress order and conversation.

mod model;
mod snapshot;

pub use model::{ConversationTurn, OrderLineItem, OrderSession, Speaker, Stage};
pub use snapshot::{LineItemSnapshot, OrderSnapshot};
