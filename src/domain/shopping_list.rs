//! Consolidation of cart recipes into a single list of ingredients to buy.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

/// One ingredient line of a recipe that sits in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub recipe_id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

/// Total quantity of one ingredient across every recipe in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total_amount: i64,
}

/// Group `lines` by `(name, unit)` and sum their amounts.
///
/// The result is ordered by name, then unit, regardless of input order.
pub fn aggregate<I>(lines: I) -> Vec<ShoppingListItem>
where
    I: IntoIterator<Item = CartLine>,
{
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for line in lines {
        *totals
            .entry((line.name, line.measurement_unit))
            .or_default() += i64::from(line.amount);
    }

    totals
        .into_iter()
        .map(|((name, measurement_unit), total_amount)| ShoppingListItem {
            name,
            measurement_unit,
            total_amount,
        })
        .collect()
}

/// Plain-text rendering offered as a downloadable file.
pub fn render_text(items: &[ShoppingListItem]) -> String {
    let mut text = String::from("Shopping list:\n\n");
    for item in items {
        // Writing into a String cannot fail.
        let _ = writeln!(
            text,
            "{} ({}) - {}",
            item.name, item.measurement_unit, item.total_amount
        );
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(recipe_id: i32, name: &str, unit: &str, amount: i32) -> CartLine {
        CartLine {
            recipe_id,
            name: name.to_string(),
            measurement_unit: unit.to_string(),
            amount,
        }
    }

    #[test]
    fn sums_shared_ingredients_across_recipes() {
        let items = aggregate(vec![
            line(1, "flour", "g", 200),
            line(2, "flour", "g", 300),
            line(2, "egg", "pcs", 2),
        ]);

        assert_eq!(
            items,
            vec![
                ShoppingListItem {
                    name: "egg".into(),
                    measurement_unit: "pcs".into(),
                    total_amount: 2,
                },
                ShoppingListItem {
                    name: "flour".into(),
                    measurement_unit: "g".into(),
                    total_amount: 500,
                },
            ]
        );
    }

    #[test]
    fn keeps_units_apart() {
        let items = aggregate(vec![
            line(1, "milk", "ml", 200),
            line(2, "milk", "cup", 1),
        ]);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].measurement_unit, "cup");
        assert_eq!(items[1].measurement_unit, "ml");
    }

    #[test]
    fn order_does_not_depend_on_input_order() {
        let forward = aggregate(vec![line(1, "salt", "g", 5), line(2, "apple", "pcs", 3)]);
        let backward = aggregate(vec![line(2, "apple", "pcs", 3), line(1, "salt", "g", 5)]);

        assert_eq!(forward, backward);
    }

    #[test]
    fn empty_cart_yields_empty_list() {
        assert!(aggregate(Vec::new()).is_empty());
    }

    #[test]
    fn renders_one_line_per_item() {
        let items = aggregate(vec![line(1, "flour", "g", 500)]);

        assert_eq!(render_text(&items), "Shopping list:\n\nflour (g) - 500\n");
    }

    #[test]
    fn large_totals_do_not_overflow() {
        let items = aggregate(vec![
            line(1, "rice", "g", i32::MAX),
            line(2, "rice", "g", i32::MAX),
        ]);

        assert_eq!(items[0].total_amount, 2 * i64::from(i32::MAX));
    }
}
