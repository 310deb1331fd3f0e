//! Shopping list records: [`Item`] and the closed [`Category`] / [`Unit`]
//! enumerations it is classified with.
//!
//! Both enumerations carry an `Unlisted` variant so that text written to the
//! spreadsheet by hand (or by an older release) survives a load/save cycle
//! untouched instead of being rejected.

use std::{cmp::Ordering, collections::HashMap, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ResultEngine;

/// In-memory row identifier.
///
/// Assigned when a row is decoded and never written back, so it is only
/// stable for the lifetime of one loaded table.
pub type ItemId = Uuid;

/// Product category, in display order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Vegetables,
    Fruits,
    Meat,
    Pantry,
    Cleaning,
    Other,
    Unlisted(String),
}

impl Category {
    /// The six known categories, in display order.
    pub const ALL: [Category; 6] = [
        Category::Vegetables,
        Category::Fruits,
        Category::Meat,
        Category::Pantry,
        Category::Cleaning,
        Category::Other,
    ];

    /// Text stored in the spreadsheet and shown to the user.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Category::Vegetables => "🥦 Verduras",
            Category::Fruits => "🍓 Frutas",
            Category::Meat => "🥩 Carnes",
            Category::Pantry => "🛒 Abarrotes",
            Category::Cleaning => "🧼 Limpieza",
            Category::Other => "📦 Otros",
            Category::Unlisted(text) => text,
        }
    }

    /// Position in the display order; unlisted values come after the known ones.
    #[must_use]
    pub fn position(&self) -> usize {
        match self {
            Category::Vegetables => 0,
            Category::Fruits => 1,
            Category::Meat => 2,
            Category::Pantry => 3,
            Category::Cleaning => 4,
            Category::Other => 5,
            Category::Unlisted(_) => Category::ALL.len(),
        }
    }

    /// Maps stored text back to a category. Never fails.
    #[must_use]
    pub fn from_label(text: &str) -> Self {
        Category::ALL
            .into_iter()
            .find(|category| category.label() == text)
            .unwrap_or_else(|| Category::Unlisted(text.to_string()))
    }

    /// Next known category, wrapping around. Used by select-style editors.
    #[must_use]
    pub fn cycle_next(&self) -> Self {
        let len = Category::ALL.len();
        let next = match self {
            Category::Unlisted(_) => 0,
            known => (known.position() + 1) % len,
        };
        Category::ALL[next].clone()
    }

    /// Previous known category, wrapping around.
    #[must_use]
    pub fn cycle_prev(&self) -> Self {
        let len = Category::ALL.len();
        let prev = match self {
            Category::Unlisted(_) => 0,
            known => (known.position() + len - 1) % len,
        };
        Category::ALL[prev].clone()
    }
}

impl Ord for Category {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Category::Unlisted(a), Category::Unlisted(b)) => a.cmp(b),
            _ => self.position().cmp(&other.position()),
        }
    }
}

impl PartialOrd for Category {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Unit of measure for an item quantity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    #[default]
    Piece,
    Kilogram,
    Gram,
    Pound,
    Liter,
    Milliliter,
    Unlisted(String),
}

impl Unit {
    pub const ALL: [Unit; 6] = [
        Unit::Piece,
        Unit::Kilogram,
        Unit::Gram,
        Unit::Pound,
        Unit::Liter,
        Unit::Milliliter,
    ];

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Unit::Piece => "U (Unidad)",
            Unit::Kilogram => "kg",
            Unit::Gram => "g",
            Unit::Pound => "lb (Libra)",
            Unit::Liter => "L (Litro)",
            Unit::Milliliter => "ml",
            Unit::Unlisted(text) => text,
        }
    }

    #[must_use]
    pub fn from_label(text: &str) -> Self {
        Unit::ALL
            .into_iter()
            .find(|unit| unit.label() == text)
            .unwrap_or_else(|| Unit::Unlisted(text.to_string()))
    }

    /// Next known unit, wrapping around. An unlisted unit cycles to the first one.
    #[must_use]
    pub fn cycle_next(&self) -> Self {
        let next = match Unit::ALL.iter().position(|unit| unit == self) {
            Some(idx) => (idx + 1) % Unit::ALL.len(),
            None => 0,
        };
        Unit::ALL[next].clone()
    }

    #[must_use]
    pub fn cycle_prev(&self) -> Self {
        let len = Unit::ALL.len();
        let prev = match Unit::ALL.iter().position(|unit| unit == self) {
            Some(idx) => (idx + len - 1) % len,
            None => 0,
        };
        Unit::ALL[prev].clone()
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of a shopping list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(skip, default = "Uuid::new_v4")]
    pub id: ItemId,
    pub category: Category,
    pub name: String,
    pub quantity: f64,
    pub unit: Unit,
    pub price: f64,
    pub is_checked: bool,
}

impl Item {
    /// Creates an unchecked, zero-priced item with a fresh row id.
    #[must_use]
    pub fn new(category: Category, name: impl Into<String>, quantity: f64, unit: Unit) -> Self {
        Self {
            id: Uuid::new_v4(),
            category,
            name: name.into(),
            quantity,
            unit,
            price: 0.0,
            is_checked: false,
        }
    }

    /// Builder-style price setter, mostly for seeds and tests.
    #[must_use]
    pub fn with_price(mut self, price: f64) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn checked(mut self, is_checked: bool) -> Self {
        self.is_checked = is_checked;
        self
    }

    /// Drops purchase state, used when a list is copied into a new one.
    pub fn reset_purchase(&mut self) {
        self.price = 0.0;
        self.is_checked = false;
    }

    /// Compares everything except the in-memory row id.
    #[must_use]
    pub fn same_record(&self, other: &Item) -> bool {
        self.category == other.category
            && self.name == other.name
            && self.quantity == other.quantity
            && self.unit == other.unit
            && self.price == other.price
            && self.is_checked == other.is_checked
    }
}

/// Display order: category position, then name ascending.
pub fn sort_items(items: &mut [Item]) {
    items.sort_by(|a, b| a.category.cmp(&b.category).then_with(|| a.name.cmp(&b.name)));
}

/// Input of the quick-add forms.
#[derive(Clone, Debug, PartialEq)]
pub struct NewItem {
    pub name: String,
    pub category: Category,
    pub quantity: f64,
    pub unit: Unit,
}

impl NewItem {
    /// Validates the form input and turns it into a zero-priced, unchecked item.
    pub fn into_item(self) -> ResultEngine<Item> {
        let name = crate::util::normalize_required_name(&self.name, "item")?;
        let quantity = crate::util::checked_non_negative(self.quantity, "quantity")?;
        Ok(Item::new(self.category, name, quantity, self.unit))
    }
}

/// A single editable field, used by the by-name update command.
#[derive(Clone, Debug, PartialEq)]
pub enum ItemField {
    Category(Category),
    Quantity(f64),
    Unit(Unit),
    Price(f64),
    Checked(bool),
}

impl ItemField {
    pub(crate) fn validate(self) -> ResultEngine<Self> {
        match self {
            ItemField::Quantity(value) => {
                crate::util::checked_non_negative(value, "quantity").map(ItemField::Quantity)
            }
            ItemField::Price(value) => {
                crate::util::checked_non_negative(value, "price").map(ItemField::Price)
            }
            other => Ok(other),
        }
    }

    pub(crate) fn apply(&self, item: &mut Item) {
        match self {
            ItemField::Category(category) => item.category = category.clone(),
            ItemField::Quantity(quantity) => item.quantity = *quantity,
            ItemField::Unit(unit) => item.unit = unit.clone(),
            ItemField::Price(price) => item.price = *price,
            ItemField::Checked(checked) => item.is_checked = *checked,
        }
    }
}

/// Pairs rows of `before` with identical records in `after`, e.g. across a
/// reload where every row gets a fresh id. Each row of `after` is used once.
pub(crate) fn carry_ids(before: &[Item], after: &[Item]) -> HashMap<ItemId, ItemId> {
    let mut taken = vec![false; after.len()];
    let mut ids = HashMap::new();
    for old in before {
        let found = after
            .iter()
            .enumerate()
            .find(|(idx, new)| !taken[*idx] && new.same_record(old));
        if let Some((idx, new)) = found {
            taken[idx] = true;
            ids.insert(old.id, new.id);
        }
    }
    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip() {
        for category in Category::ALL {
            assert_eq!(Category::from_label(category.label()), category);
        }
        for unit in Unit::ALL {
            assert_eq!(Unit::from_label(unit.label()), unit);
        }
        assert_eq!(
            Category::from_label("Bebidas"),
            Category::Unlisted("Bebidas".to_string())
        );
    }

    #[test]
    fn unlisted_categories_sort_last() {
        let mut categories = vec![
            Category::Unlisted("Bebidas".to_string()),
            Category::Other,
            Category::Unlisted("Alcohol".to_string()),
            Category::Vegetables,
        ];
        categories.sort();
        assert_eq!(
            categories,
            vec![
                Category::Vegetables,
                Category::Other,
                Category::Unlisted("Alcohol".to_string()),
                Category::Unlisted("Bebidas".to_string()),
            ]
        );
    }

    #[test]
    fn sort_by_category_then_name() {
        let mut items = vec![
            Item::new(Category::Fruits, "Pera", 1.0, Unit::Piece),
            Item::new(Category::Vegetables, "Tomates", 1.0, Unit::Kilogram),
            Item::new(Category::Fruits, "Manzana", 1.0, Unit::Piece),
            Item::new(Category::Unlisted("X".into()), "Agua", 1.0, Unit::Liter),
        ];
        sort_items(&mut items);
        let names: Vec<_> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Tomates", "Manzana", "Pera", "Agua"]);
    }

    #[test]
    fn cycling_wraps() {
        assert_eq!(Category::Other.cycle_next(), Category::Vegetables);
        assert_eq!(Category::Vegetables.cycle_prev(), Category::Other);
        assert_eq!(Unit::Milliliter.cycle_next(), Unit::Piece);
        assert_eq!(Unit::Unlisted("caja".into()).cycle_next(), Unit::Piece);
    }

    #[test]
    fn new_item_requires_name() {
        let input = NewItem {
            name: "   ".to_string(),
            category: Category::Pantry,
            quantity: 1.0,
            unit: Unit::Piece,
        };
        assert!(matches!(
            input.into_item(),
            Err(crate::EngineError::InvalidName(_))
        ));
    }

    #[test]
    fn carry_ids_pairs_identical_records_once() {
        let before = vec![
            Item::new(Category::Pantry, "Arroz", 1.0, Unit::Kilogram),
            Item::new(Category::Pantry, "Arroz", 1.0, Unit::Kilogram),
        ];
        let mut after: Vec<Item> = before
            .iter()
            .map(|item| Item {
                id: Uuid::new_v4(),
                ..item.clone()
            })
            .collect();
        after.push(Item::new(Category::Fruits, "Kiwi", 3.0, Unit::Piece));

        let ids = carry_ids(&before, &after);
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[&before[0].id], ids[&before[1].id]);
        assert!(!ids.values().any(|id| *id == after[2].id));
    }
}
