//! Hard-coded seed used when a new list is created from the default template.

use crate::item::{
    Category::{self, Cleaning, Fruits, Meat, Other, Pantry, Vegetables},
    Item,
    Unit::{self, Kilogram, Liter, Piece, Pound},
};

/// (category, name, quantity, unit, price)
const DEFAULT_TEMPLATE: [(Category, &str, f64, Unit, f64); 48] = [
    (Vegetables, "Tomates", 1.0, Kilogram, 0.0),
    (Vegetables, "Cebollas", 3.0, Pound, 0.0),
    (Vegetables, "Papa harinosa", 6.0, Pound, 12.0),
    (Vegetables, "Papa holadesa", 3.0, Pound, 6.0),
    (Vegetables, "Platano", 6.0, Piece, 10.0),
    (Vegetables, "Zapallo", 0.5, Kilogram, 5.0),
    (Vegetables, "lechuga carola", 2.0, Piece, 13.0),
    (Vegetables, "Brocoli", 1.0, Piece, 8.0),
    (Vegetables, "Espinaca", 2.0, Piece, 8.0),
    (Vegetables, "choclo", 6.0, Piece, 20.0),
    (Fruits, "Guineo", 6.0, Piece, 6.0),
    (Fruits, "Manzana", 4.0, Piece, 10.0),
    (Fruits, "Pera", 3.0, Piece, 10.0),
    (Fruits, "Limon cambita", 10.0, Piece, 10.0),
    (Fruits, "Limon de licuar", 10.0, Piece, 10.0),
    (Fruits, "Piña", 1.0, Piece, 8.0),
    (Fruits, "Arandanos", 1.0, Piece, 18.0),
    (Fruits, "Frutillas", 1.0, Piece, 15.0),
    (Meat, "Pollo", 2.0, Piece, 90.0),
    (Meat, "Pollo (Pechuga)", 1.0, Piece, 26.0),
    (Meat, "Bollo chico", 1.0, Kilogram, 70.0),
    (Pantry, "Arroz", 1.0, Kilogram, 0.0),
    (Pantry, "Huevo Maple", 1.0, Piece, 24.0),
    (Pantry, "Quezo", 0.5, Kilogram, 22.0),
    (Pantry, "Fideo codito", 1.0, Kilogram, 8.0),
    (Pantry, "Fideo espiral", 1.0, Kilogram, 8.0),
    (Pantry, "Papel higuineco 24", 1.0, Piece, 26.0),
    (Pantry, "Servilleta mesa", 1.0, Piece, 15.0),
    (Pantry, "Servilleta cocina", 1.0, Piece, 15.0),
    (Pantry, "Ajo cabeza", 1.0, Piece, 2.0),
    (Pantry, "Quinua", 0.5, Kilogram, 10.0),
    (Pantry, "Azucar Morena", 1.0, Kilogram, 8.0),
    (Pantry, "Azucar Blanca", 1.0, Kilogram, 6.0),
    (Pantry, "Té frutas Pack", 1.0, Piece, 25.0),
    (Pantry, "Té canela Pack", 1.0, Piece, 12.0),
    (Pantry, "Té manzanilla Pack", 1.0, Piece, 12.0),
    (Pantry, "Agua bebe", 3.0, Liter, 11.0),
    (Cleaning, "Detergente ropa adultos", 1.0, Piece, 36.0),
    (Cleaning, "Detergente ropa bebe", 1.0, Piece, 35.0),
    (Cleaning, "Detergente ropa platos", 1.0, Piece, 25.0),
    (Cleaning, "Lavandina", 1.0, Piece, 20.0),
    (Cleaning, "Trapo de piso", 1.0, Piece, 6.0),
    (Cleaning, "jaboncillo adulto", 1.0, Piece, 20.0),
    (Cleaning, "jaboncillo bebe", 1.0, Piece, 20.0),
    (Cleaning, "Pañal bebe pack", 1.0, Piece, 90.0),
    (Cleaning, "Bolsa de basura Grande pack", 1.0, Piece, 10.0),
    (Other, "Agua bebe", 3.0, Liter, 11.0),
    (Other, "Pan Frances", 5.0, Piece, 5.0),
];

/// Items of the default template, unchecked and with their usual prices.
#[must_use]
pub fn default_template() -> Vec<Item> {
    DEFAULT_TEMPLATE
        .into_iter()
        .map(|(category, name, quantity, unit, price)| {
            Item::new(category, name, quantity, unit).with_price(price)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_is_unchecked_and_uses_known_values() {
        let items = default_template();
        assert_eq!(items.len(), 48);
        assert!(items.iter().all(|item| !item.is_checked));
        assert!(
            items
                .iter()
                .all(|item| !matches!(item.category, Category::Unlisted(_)))
        );
        assert!(items.iter().all(|item| !matches!(item.unit, Unit::Unlisted(_))));
    }

    #[test]
    fn template_row_ids_are_distinct() {
        let items = default_template();
        let mut ids: Vec<_> = items.iter().map(|item| item.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), items.len());
    }
}
