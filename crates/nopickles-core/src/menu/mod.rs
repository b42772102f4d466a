//! Menu catalog: the immutable set of orderable items.

mod catalog;
mod model;
mod preset;

pub use catalog::MenuCatalog;
pub use model::{Category, MenuItem};
pub use preset::preset_items;
