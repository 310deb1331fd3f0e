//! Conversion between the spreadsheet's plain-text grid and typed [`Item`]s.
//!
//! The sheet is written by people as well as by this program, so decoding is
//! lenient: missing columns are synthesized, unparseable numbers become `0.0`
//! and unknown flags become `false`. Nothing in here returns an error.
//!
//! Numbers are stored with a comma as decimal separator (`0,5`), flags as
//! `TRUE` / `FALSE`.

use std::collections::HashMap;

use crate::item::{Category, Item, Unit};

/// Rectangular (or ragged) grid of cell texts, first row is the header.
pub type Grid = Vec<Vec<String>>;

/// Column set of a list tab, in the order they are written.
pub const COLUMNS: [&str; 6] = ["category", "name", "quantity", "unit", "price", "is_checked"];

const TRUE_TEXT: &str = "TRUE";
const FALSE_TEXT: &str = "FALSE";

/// Decodes a tab into items, in sheet order.
///
/// Rows without a name are dropped, which also removes all-empty rows.
#[must_use]
pub fn decode(grid: &[Vec<String>]) -> Vec<Item> {
    let Some((header, records)) = grid.split_first() else {
        return Vec::new();
    };

    let mut index: HashMap<&str, usize> = HashMap::new();
    for (pos, title) in header.iter().enumerate() {
        index.entry(title.trim()).or_insert(pos);
    }
    let cell = |row: &[String], column: &str| -> String {
        index
            .get(column)
            .and_then(|pos| row.get(*pos))
            .map(|text| text.trim().to_string())
            .unwrap_or_default()
    };

    records
        .iter()
        .filter_map(|row| {
            let name = cell(row, "name");
            if name.is_empty() {
                return None;
            }
            let mut item = Item::new(
                Category::from_label(&cell(row, "category")),
                name,
                parse_decimal(&cell(row, "quantity")),
                Unit::from_label(&cell(row, "unit")),
            );
            item.price = parse_decimal(&cell(row, "price"));
            item.is_checked = parse_flag(&cell(row, "is_checked"));
            Some(item)
        })
        .collect()
}

/// Encodes items as header row plus one row per item.
#[must_use]
pub fn encode(items: &[Item]) -> Grid {
    let mut grid = Vec::with_capacity(items.len() + 1);
    grid.push(COLUMNS.iter().map(ToString::to_string).collect());
    for item in items {
        grid.push(vec![
            item.category.label().to_string(),
            item.name.clone(),
            format_decimal(item.quantity),
            item.unit.label().to_string(),
            format_decimal(item.price),
            format_flag(item.is_checked),
        ]);
    }
    grid
}

/// Parses a locale decimal (`1,5` or `1.5`). Empty, invalid or non-finite
/// text yields `0.0`.
#[must_use]
pub fn parse_decimal(text: &str) -> f64 {
    let normalized = text.trim().replace(',', ".");
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => 0.0,
    }
}

/// Shortest decimal text that reads back to the same value, with a comma
/// separator: `0.5` → `0,5`, `1.0` → `1`.
#[must_use]
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    // `-0.0` would otherwise render as "-0".
    let value = if value == 0.0 { 0.0 } else { value };
    value.to_string().replace('.', ",")
}

/// `TRUE` is the only text read as checked. Case-sensitive.
#[must_use]
pub fn parse_flag(text: &str) -> bool {
    match text.trim() {
        TRUE_TEXT => true,
        FALSE_TEXT => false,
        _ => false,
    }
}

#[must_use]
pub fn format_flag(value: bool) -> String {
    let text = if value { TRUE_TEXT } else { FALSE_TEXT };
    text.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: &[&[&str]]) -> Grid {
        rows.iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect()
    }

    #[test]
    fn decimals_accept_comma_and_coerce_garbage() {
        assert_eq!(parse_decimal("1,5"), 1.5);
        assert_eq!(parse_decimal("2.25"), 2.25);
        assert_eq!(parse_decimal(" 3 "), 3.0);
        assert_eq!(parse_decimal(""), 0.0);
        assert_eq!(parse_decimal("abc"), 0.0);
        assert_eq!(parse_decimal("NaN"), 0.0);
        assert_eq!(parse_decimal("inf"), 0.0);
    }

    #[test]
    fn decimals_render_compact_with_comma() {
        assert_eq!(format_decimal(0.5), "0,5");
        assert_eq!(format_decimal(1.0), "1");
        assert_eq!(format_decimal(12.0), "12");
        assert_eq!(format_decimal(12.75), "12,75");
        assert_eq!(format_decimal(-0.0), "0");
    }

    #[test]
    fn flags_are_case_sensitive() {
        assert!(parse_flag("TRUE"));
        assert!(!parse_flag("FALSE"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("true"));
        assert!(!parse_flag("yes"));
    }

    #[test]
    fn empty_grid_decodes_to_empty_table() {
        assert!(decode(&[]).is_empty());
        assert!(decode(&grid(&[&COLUMNS])).is_empty());
    }

    #[test]
    fn missing_columns_are_synthesized() {
        let rows = grid(&[&["name", "category"], &["Arroz", "🛒 Abarrotes"]]);
        let items = decode(&rows);
        assert_eq!(items.len(), 1);
        let item = &items[0];
        assert_eq!(item.name, "Arroz");
        assert_eq!(item.category, Category::Pantry);
        assert_eq!(item.quantity, 0.0);
        assert_eq!(item.price, 0.0);
        assert_eq!(item.unit, Unit::Unlisted(String::new()));
        assert!(!item.is_checked);
    }

    #[test]
    fn rows_without_name_and_ragged_rows() {
        let rows = grid(&[
            &COLUMNS,
            &["🍓 Frutas", "", "1", "kg", "2", "TRUE"],
            &["", "", "", "", "", ""],
            &["🍓 Frutas", "Pera"],
        ]);
        let items = decode(&rows);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Pera");
        assert_eq!(items[0].quantity, 0.0);
    }

    #[test]
    fn unknown_category_round_trips_as_text() {
        let rows = grid(&[
            &COLUMNS,
            &["Bebidas", "Jugo", "2", "L (Litro)", "7,5", "FALSE"],
        ]);
        let encoded = encode(&decode(&rows));
        assert_eq!(encoded, rows);
    }

    #[test]
    fn round_trip_preserves_records() {
        let rows = grid(&[
            &COLUMNS,
            &["🥦 Verduras", "Zapallo", "0,5", "kg", "5", "FALSE"],
            &["🥩 Carnes", "Pollo", "2", "U (Unidad)", "90,25", "TRUE"],
        ]);
        let decoded = decode(&rows);
        let again = decode(&encode(&decoded));
        assert_eq!(decoded.len(), again.len());
        for (a, b) in decoded.iter().zip(&again) {
            assert!(a.same_record(b));
        }
        assert_eq!(decoded[1].price, 90.25);
        assert!(decoded[1].is_checked);
    }

    #[test]
    fn columns_are_looked_up_by_header() {
        let rows = grid(&[
            &["is_checked", "price", "name", "unit", "quantity", "category", "note"],
            &["TRUE", "3,5", "Leche", "L (Litro)", "2", "🛒 Abarrotes", "light"],
        ]);
        let item = &decode(&rows)[0];
        assert!(item.is_checked);
        assert_eq!(item.price, 3.5);
        assert_eq!(item.unit, Unit::Liter);
        assert_eq!(item.quantity, 2.0);
        assert_eq!(encode(&[item.clone()])[0], COLUMNS.map(String::from).to_vec());
    }
}
