pub mod error;
pub mod intent;
pub mod menu;
pub mod order;

// Re-export common error type
pub use error::NoPicklesError;
pub use intent::{Intent, ItemRequest};
pub use menu::{Category, MenuCatalog, MenuItem};
pub use order::{OrderLineItem, OrderSession, OrderSnapshot, Stage};
