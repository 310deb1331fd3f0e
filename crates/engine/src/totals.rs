//! Spending summary over purchased (checked) items.

use serde::Serialize;

use crate::item::{Category, Item};

/// What to do with categories whose checked items add up to zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ZeroGroups {
    /// Keep them: the category has purchases, just no prices entered yet.
    #[default]
    Keep,
    /// Drop them from the per-category breakdown (the grand total is unaffected).
    Hide,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: f64,
    /// Number of checked items contributing to `total`.
    pub items: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Totals {
    pub by_category: Vec<CategoryTotal>,
    pub grand_total: f64,
}

/// Sums prices of checked items per category, in display order.
///
/// Returns `None` when nothing is checked, so callers show "no total" rather
/// than a table of zeros.
#[must_use]
pub fn summarize(items: &[Item], zero_groups: ZeroGroups) -> Option<Totals> {
    let mut checked: Vec<&Item> = items.iter().filter(|item| item.is_checked).collect();
    if checked.is_empty() {
        return None;
    }
    checked.sort_by(|a, b| a.category.cmp(&b.category));

    let grand_total = checked.iter().map(|item| item.price).sum();

    let mut by_category: Vec<CategoryTotal> = Vec::new();
    for item in checked {
        match by_category.last_mut() {
            Some(group) if group.category == item.category => {
                group.total += item.price;
                group.items += 1;
            }
            _ => by_category.push(CategoryTotal {
                category: item.category.clone(),
                total: item.price,
                items: 1,
            }),
        }
    }

    if zero_groups == ZeroGroups::Hide {
        by_category.retain(|group| group.total > 0.0);
    }

    Some(Totals {
        by_category,
        grand_total,
    })
}
