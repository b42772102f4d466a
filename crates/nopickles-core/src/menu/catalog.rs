//! Read-only menu catalog with name lookup.

use super::model::{Category, MenuItem};
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Immutable catalog of menu items.
///
/// Lookups never fail: absence is a normal `None` result, not an error.
/// Iteration order is the insertion order of the items, which is the
/// order used for display and for lookup tie-breaking.
#[derive(Debug, Clone)]
pub struct MenuCatalog {
    items: Vec<MenuItem>,
}

impl MenuCatalog {
    /// Creates a catalog from a fixed set of items.
    pub fn new(items: Vec<MenuItem>) -> Self {
        Self { items }
    }

    /// Creates the default fast-food menu.
    pub fn preset() -> Self {
        Self::new(super::preset::preset_items())
    }

    /// Returns all items in stable catalog order.
    pub fn list(&self) -> &[MenuItem] {
        &self.items
    }

    /// Looks up an item by its unique id.
    pub fn find_by_id(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Returns all items in a category, in catalog order.
    pub fn by_category(&self, category: Category) -> Vec<&MenuItem> {
        self.items
            .iter()
            .filter(|item| item.category == category)
            .collect()
    }

    /// Finds the best-matching item for free-form text.
    ///
    /// Matching order:
    /// 1. case-insensitive exact name match
    /// 2. alias match, then substring / token-overlap match against the name
    ///
    /// Ties are broken by shortest name, then catalog order. Returns `None`
    /// when nothing plausibly matches; the caller must treat that as
    /// "could not resolve", not as a failure.
    pub fn find_by_name(&self, text: &str) -> Option<&MenuItem> {
        let query = text.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }

        if let Some(item) = self
            .items
            .iter()
            .find(|item| item.name.to_lowercase() == query)
        {
            return Some(item);
        }

        let query_tokens: Vec<&str> = query.split_whitespace().collect();
        self.items
            .iter()
            .filter(|item| Self::loose_match(item, &query, &query_tokens))
            .min_by_key(|item| item.name.len())
    }

    fn loose_match(item: &MenuItem, query: &str, query_tokens: &[&str]) -> bool {
        if item
            .aliases
            .iter()
            .any(|alias| alias.to_lowercase() == *query)
        {
            return true;
        }

        let name = item.name.to_lowercase();
        let name_tokens: Vec<&str> = name.split_whitespace().collect();

        // Every query token must appear as a whole token of the name,
        // e.g. "coke" matches "Large Coke".
        if !query_tokens.is_empty()
            && query_tokens
                .iter()
                .all(|token| name_tokens.contains(token))
        {
            return true;
        }

        // Single-word queries also match inside a compound name,
        // e.g. "burger" matches "Cheeseburger". Short fragments are too
        // noisy to trust.
        query_tokens.len() == 1 && query.len() >= 4 && name.contains(query)
    }

    /// Formats the full menu grouped by category, for replies and as
    /// context for the language-model backend.
    pub fn menu_text(&self) -> String {
        let mut by_category: BTreeMap<Category, Vec<&MenuItem>> = BTreeMap::new();
        for item in &self.items {
            by_category.entry(item.category).or_default().push(item);
        }

        let mut text = String::from("\n=== MENU ===\n");
        for (category, items) in by_category {
            let _ = write!(text, "\n{}:\n", category.label());
            for item in items {
                let _ = write!(text, "  - {}: ${:.2}\n", item.name, item.price);
            }
        }
        text
    }
}
