//! Deterministic rule-based utterance parser.
//!
//! This is the model-free interpretation path. It is a first-class code
//! path, not an error handler: the system must be fully testable offline,
//! and any backend failure degrades here.

use nopickles_core::menu::MenuCatalog;
use nopickles_core::{Intent, ItemRequest};
use std::sync::Arc;

const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "howdy", "order"];
const GREETING_PHRASES: &[&str] = &["good morning", "good afternoon", "good evening"];

const FINISH_WORDS: &[&str] = &["no", "done", "finish", "finished", "complete", "nothing"];
const FINISH_PHRASES: &[&str] = &[
    "that's it",
    "that's all",
    "that'll be all",
    "i'm done",
    "nothing else",
    "no thanks",
];

const TOTAL_PHRASES: &[&str] = &["total", "how much"];

const NEGATION_WORDS: &[&str] = &["remove", "without", "cancel", "minus", "no"];
const NEGATION_PHRASES: &[&str] = &["take off"];

// Articles, verbs and filler that never start an item phrase.
const STOP_WORDS: &[&str] = &[
    "a", "an", "the", "and", "i", "me", "my", "we", "you", "it", "that", "this", "to", "of",
    "for", "with", "have", "get", "like", "want", "give", "can", "could", "would", "please",
    "also", "too", "some",
];

/// A detected menu-item mention inside an utterance.
#[derive(Debug)]
struct Mention {
    position: usize,
    request: ItemRequest,
}

/// Deterministic, catalog-driven fallback parser.
///
/// Recognition rules, in order:
/// 1. menu-item mentions (catalog fuzzy match over token windows, plus
///    bare "quantity + noun" phrases) combined with negation cues
///    => `AddItems` / `RemoveItems`
/// 2. ending phrases => `Finish`
/// 3. "total" / "how much" => `QueryTotal`
/// 4. greeting phrases => `Greet`
/// 5. anything else => `Unrecognized`
///
/// Mentions are checked first so that "no cheeseburger" removes an item
/// instead of finishing the order.
pub struct FallbackParser {
    catalog: Arc<MenuCatalog>,
}

impl FallbackParser {
    pub fn new(catalog: Arc<MenuCatalog>) -> Self {
        Self { catalog }
    }

    /// Parses one utterance. Never fails: the worst case is
    /// `Unrecognized` carrying the original text.
    pub fn parse(&self, utterance: &str) -> Intent {
        let lower = utterance.to_lowercase();
        let tokens: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .collect();

        let mentions = self.scan_mentions(&tokens);
        if !mentions.is_empty() {
            let requests: Vec<ItemRequest> =
                mentions.into_iter().map(|m| m.request).collect();
            return if has_negation(&lower, &tokens) {
                Intent::RemoveItems(requests)
            } else {
                Intent::AddItems(requests)
            };
        }

        if matches_any(&lower, &tokens, FINISH_WORDS, FINISH_PHRASES) {
            return Intent::Finish;
        }
        if TOTAL_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
            return Intent::QueryTotal;
        }
        if matches_any(&lower, &tokens, GREETING_WORDS, GREETING_PHRASES) {
            return Intent::Greet;
        }

        Intent::Unrecognized(utterance.to_string())
    }

    /// Scans token windows (longest first) for catalog matches, then picks
    /// up bare "two <thing>" phrases whose noun is not on the menu so the
    /// orchestrator can report it as unresolvable.
    fn scan_mentions(&self, tokens: &[&str]) -> Vec<Mention> {
        let mut consumed = vec![false; tokens.len()];
        let mut mentions = Vec::new();

        for window in (1..=3).rev() {
            if window > tokens.len() {
                continue;
            }
            for start in 0..=tokens.len() - window {
                if consumed[start..start + window].iter().any(|c| *c) {
                    continue;
                }
                let slice = &tokens[start..start + window];
                if window == 1 && (slice[0].len() < 3 || STOP_WORDS.contains(&slice[0])) {
                    continue;
                }
                let Some(phrase) = self.catalog_phrase(slice) else {
                    continue;
                };

                consumed[start..start + window].fill(true);
                let quantity = take_leading_quantity(tokens, &mut consumed, start);
                mentions.push(Mention {
                    position: start,
                    request: ItemRequest::new(phrase, quantity),
                });
            }
        }

        // "two fries" with no such item: the quantity word still signals an
        // order attempt, so surface the noun as an unresolved request.
        for (index, token) in tokens.iter().enumerate() {
            if consumed[index] {
                continue;
            }
            let Some(quantity) = numeric_quantity(token) else {
                continue;
            };
            let mut phrase_tokens = Vec::new();
            let mut cursor = index + 1;
            while cursor < tokens.len()
                && !consumed[cursor]
                && phrase_tokens.len() < 2
                && !STOP_WORDS.contains(&tokens[cursor])
                && numeric_quantity(tokens[cursor]).is_none()
            {
                phrase_tokens.push(tokens[cursor]);
                cursor += 1;
            }
            if phrase_tokens.is_empty() {
                continue;
            }
            consumed[index..cursor].fill(true);
            mentions.push(Mention {
                position: index,
                request: ItemRequest::new(phrase_tokens.join(" "), quantity),
            });
        }

        mentions.sort_by_key(|m| m.position);
        mentions
    }

    /// Returns the phrase if it plausibly names a catalog item, trying a
    /// naive singular form for plurals ("cokes" -> "coke").
    fn catalog_phrase(&self, slice: &[&str]) -> Option<String> {
        let phrase = slice.join(" ");
        if self.catalog.find_by_name(&phrase).is_some() {
            return Some(phrase);
        }

        let last = slice.last()?;
        if last.len() > 3 && last.ends_with('s') {
            let mut singular = slice.to_vec();
            let trimmed = &last[..last.len() - 1];
            *singular.last_mut()? = trimmed;
            let singular_phrase = singular.join(" ");
            if self.catalog.find_by_name(&singular_phrase).is_some() {
                return Some(singular_phrase);
            }
        }
        None
    }
}

/// Quantity for a mention starting at `start`: the word immediately before
/// it, if it is a quantity word ("two", "2", "a"). Defaults to 1.
fn take_leading_quantity(tokens: &[&str], consumed: &mut [bool], start: usize) -> u32 {
    if start == 0 || consumed[start - 1] {
        return 1;
    }
    let token = tokens[start - 1];
    if let Some(quantity) = numeric_quantity(token) {
        consumed[start - 1] = true;
        return quantity;
    }
    if token == "a" || token == "an" {
        consumed[start - 1] = true;
    }
    1
}

fn numeric_quantity(token: &str) -> Option<u32> {
    if let Ok(n) = token.parse::<u32>() {
        return (n >= 1).then_some(n);
    }
    let n = match token {
        "one" => 1,
        "two" | "couple" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        _ => return None,
    };
    Some(n)
}

fn matches_any(lower: &str, tokens: &[&str], words: &[&str], phrases: &[&str]) -> bool {
    tokens.iter().any(|token| words.contains(token))
        || phrases.iter().any(|phrase| lower.contains(phrase))
}

fn has_negation(lower: &str, tokens: &[&str]) -> bool {
    tokens.iter().any(|token| NEGATION_WORDS.contains(token))
        || NEGATION_PHRASES.iter().any(|phrase| lower.contains(phrase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use nopickles_core::menu::{Category, MenuItem};
    use rust_decimal::Decimal;

    fn parser() -> FallbackParser {
        FallbackParser::new(Arc::new(MenuCatalog::preset()))
    }

    #[test]
    fn test_greetings() {
        let parser = parser();
        assert_eq!(parser.parse("hi"), Intent::Greet);
        assert_eq!(parser.parse("Hello there!"), Intent::Greet);
        assert_eq!(parser.parse("good morning"), Intent::Greet);
        assert_eq!(parser.parse("I'd like to order"), Intent::Greet);
    }

    #[test]
    fn test_finish_phrases() {
        let parser = parser();
        assert_eq!(parser.parse("no, that's it"), Intent::Finish);
        assert_eq!(parser.parse("that's all, thanks"), Intent::Finish);
        assert_eq!(parser.parse("I'm done"), Intent::Finish);
        assert_eq!(parser.parse("finish"), Intent::Finish);
    }

    #[test]
    fn test_query_total() {
        let parser = parser();
        assert_eq!(parser.parse("what's my total?"), Intent::QueryTotal);
        assert_eq!(parser.parse("how much is that so far"), Intent::QueryTotal);
    }

    #[test]
    fn test_add_items_with_quantities() {
        let parser = parser();
        assert_eq!(
            parser.parse("I'll have a cheeseburger and a large coke"),
            Intent::AddItems(vec![
                ItemRequest::new("cheeseburger", 1),
                ItemRequest::new("large coke", 1),
            ])
        );
        assert_eq!(
            parser.parse("two milkshakes please"),
            Intent::AddItems(vec![ItemRequest::new("milkshake", 2)])
        );
        assert_eq!(
            parser.parse("3 onion rings"),
            Intent::AddItems(vec![ItemRequest::new("onion rings", 3)])
        );
    }

    #[test]
    fn test_unknown_item_with_quantity_still_surfaces() {
        // Catalog without any fries-like item.
        let catalog = MenuCatalog::new(vec![MenuItem {
            id: "burger2".to_string(),
            name: "Cheeseburger".to_string(),
            category: Category::Burgers,
            price: Decimal::new(899, 2),
            description: String::new(),
            aliases: vec![],
        }]);
        let parser = FallbackParser::new(Arc::new(catalog));

        assert_eq!(
            parser.parse("two fries"),
            Intent::AddItems(vec![ItemRequest::new("fries", 2)])
        );
    }

    #[test]
    fn test_negation_yields_remove() {
        let parser = parser();
        assert_eq!(
            parser.parse("remove the cheeseburger"),
            Intent::RemoveItems(vec![ItemRequest::new("cheeseburger", 1)])
        );
        assert_eq!(
            parser.parse("no large coke for me"),
            Intent::RemoveItems(vec![ItemRequest::new("large coke", 1)])
        );
        assert_eq!(
            parser.parse("take off two fries"),
            Intent::RemoveItems(vec![ItemRequest::new("fries", 2)])
        );
    }

    #[test]
    fn test_no_mentions_is_unrecognized() {
        let parser = parser();
        assert_eq!(
            parser.parse("do you validate parking?"),
            Intent::Unrecognized("do you validate parking?".to_string())
        );
    }

    #[test]
    fn test_mention_order_is_utterance_order() {
        let parser = parser();
        let Intent::AddItems(requests) =
            parser.parse("a large coke and a veggie burger")
        else {
            panic!("expected AddItems");
        };
        assert_eq!(requests[0].name, "large coke");
        assert_eq!(requests[1].name, "veggie burger");
    }
}
