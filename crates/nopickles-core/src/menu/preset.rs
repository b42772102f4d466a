//! Default menu definition.
//!
//! Loaded once at process start; how a deployment authors its own menu is
//! a boundary concern outside this crate.

use super::model::{Category, MenuItem};
use rust_decimal::Decimal;

fn item(
    id: &str,
    name: &str,
    category: Category,
    price_cents: i64,
    description: &str,
    aliases: &[&str],
) -> MenuItem {
    MenuItem {
        id: id.to_string(),
        name: name.to_string(),
        category,
        price: Decimal::new(price_cents, 2),
        description: description.to_string(),
        aliases: aliases.iter().map(|alias| alias.to_string()).collect(),
    }
}

/// The default fast-food menu.
pub fn preset_items() -> Vec<MenuItem> {
    vec![
        item(
            "burger1",
            "Classic Burger",
            Category::Burgers,
            699,
            "Beef patty with lettuce, tomato, and special sauce",
            &["hamburger"],
        ),
        item(
            "burger2",
            "Cheeseburger",
            Category::Burgers,
            899,
            "Classic burger with melted cheese",
            &[],
        ),
        item(
            "burger3",
            "Double Burger",
            Category::Burgers,
            1099,
            "Two beef patties with all the fixings",
            &[],
        ),
        item(
            "burger4",
            "Veggie Burger",
            Category::Burgers,
            799,
            "Plant-based patty with fresh vegetables",
            &[],
        ),
        item(
            "side1",
            "French Fries",
            Category::Sides,
            349,
            "Crispy golden fries",
            &["fries"],
        ),
        item(
            "side2",
            "Onion Rings",
            Category::Sides,
            449,
            "Beer-battered onion rings",
            &["rings"],
        ),
        item(
            "side3",
            "Side Salad",
            Category::Sides,
            499,
            "Fresh mixed greens with dressing",
            &["salad"],
        ),
        item(
            "drink1",
            "Small Coke",
            Category::Drinks,
            199,
            "Coca-Cola (16oz)",
            &[],
        ),
        item(
            "drink2",
            "Medium Coke",
            Category::Drinks,
            249,
            "Coca-Cola (22oz)",
            &[],
        ),
        item(
            "drink3",
            "Large Coke",
            Category::Drinks,
            299,
            "Coca-Cola (32oz)",
            &[],
        ),
        item(
            "drink4",
            "Bottled Water",
            Category::Drinks,
            149,
            "Pure spring water",
            &["water"],
        ),
        item(
            "drink5",
            "Milkshake",
            Category::Drinks,
            499,
            "Chocolate, vanilla, or strawberry",
            &["shake"],
        ),
        item(
            "dessert1",
            "Apple Pie",
            Category::Desserts,
            299,
            "Warm apple pie",
            &["pie"],
        ),
        item(
            "dessert2",
            "Ice Cream Cone",
            Category::Desserts,
            249,
            "Soft serve vanilla ice cream",
            &["ice cream"],
        ),
    ]
}
