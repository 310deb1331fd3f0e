//! Planning view: edit what goes on the list.
//!
//! The grid holds one [`PlanRow`] per item, keyed so edits survive
//! re-sorting. Price and checkbox are not editable here; saving keeps the
//! stored values of every loaded row.

use crate::{
    Category, Engine, Item, ItemField, ItemId, NewItem, ResultEngine, Unit,
    item::carry_ids,
    store::SheetStore,
};

/// Key of a grid row. Loaded rows reuse the item id; inserted rows get a
/// fresh one.
pub type RowKey = ItemId;

#[derive(Clone, Debug, PartialEq)]
pub struct PlanRow {
    pub key: RowKey,
    pub name: String,
    pub category: Category,
    pub quantity: f64,
    pub unit: Unit,
}

impl PlanRow {
    fn blank() -> Self {
        Self {
            key: uuid::Uuid::new_v4(),
            name: String::new(),
            category: Category::Other,
            quantity: 1.0,
            unit: Unit::Piece,
        }
    }
}

impl From<&Item> for PlanRow {
    fn from(item: &Item) -> Self {
        Self {
            key: item.id,
            name: item.name.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            unit: item.unit.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct PlanningView {
    list: String,
    loaded: Vec<Item>,
    rows: Vec<PlanRow>,
}

impl PlanningView {
    pub async fn load<S: SheetStore>(engine: &Engine<S>, list: &str) -> ResultEngine<Self> {
        let loaded = engine.list_items(list).await?;
        Ok(Self::from_items(list.trim(), loaded))
    }

    fn from_items(list: &str, loaded: Vec<Item>) -> Self {
        let rows = loaded.iter().map(PlanRow::from).collect();
        Self {
            list: list.to_string(),
            loaded,
            rows,
        }
    }

    #[must_use]
    pub fn list(&self) -> &str {
        &self.list
    }

    #[must_use]
    pub fn rows(&self) -> &[PlanRow] {
        &self.rows
    }

    #[must_use]
    pub fn loaded(&self) -> &[Item] {
        &self.loaded
    }

    /// `true` when the grid differs from what was loaded.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.rows.len() != self.loaded.len()
            || self
                .rows
                .iter()
                .zip(&self.loaded)
                .any(|(row, item)| *row != PlanRow::from(item))
    }

    /// Appends an empty row and returns its key. Rows left without a name
    /// are not saved.
    pub fn insert_row(&mut self) -> RowKey {
        let row = PlanRow::blank();
        let key = row.key;
        self.rows.push(row);
        key
    }

    pub fn remove_row(&mut self, key: RowKey) -> bool {
        let before = self.rows.len();
        self.rows.retain(|row| row.key != key);
        self.rows.len() != before
    }

    pub fn set_name(&mut self, key: RowKey, name: &str) -> bool {
        self.edit(key, |row| row.name = name.to_string())
    }

    pub fn set_category(&mut self, key: RowKey, category: Category) -> bool {
        self.edit(key, |row| row.category = category)
    }

    /// Negative or non-finite quantities are rejected and leave the row as is.
    pub fn set_quantity(&mut self, key: RowKey, quantity: f64) -> ResultEngine<bool> {
        let quantity = crate::util::checked_non_negative(quantity, "quantity")?;
        Ok(self.edit(key, |row| row.quantity = quantity))
    }

    pub fn set_unit(&mut self, key: RowKey, unit: Unit) -> bool {
        self.edit(key, |row| row.unit = unit)
    }

    /// Drops every grid edit.
    pub fn discard(&mut self) {
        self.rows = self.loaded.iter().map(PlanRow::from).collect();
    }

    /// The table the grid describes: unnamed rows dropped, price and checkbox
    /// carried over from the loaded row with the same key (0 and unchecked
    /// for inserted rows), negative or non-finite quantities stored as 0.
    #[must_use]
    pub fn items_to_save(&self) -> Vec<Item> {
        self.rows
            .iter()
            .filter_map(|row| {
                let name = row.name.trim();
                if name.is_empty() {
                    return None;
                }
                let quantity = if row.quantity.is_finite() && row.quantity >= 0.0 {
                    row.quantity
                } else {
                    0.0
                };
                let mut item = Item::new(row.category.clone(), name, quantity, row.unit.clone());
                item.id = row.key;
                if let Some(stored) = self.loaded.iter().find(|item| item.id == row.key) {
                    item.price = stored.price;
                    item.is_checked = stored.is_checked;
                }
                Some(item)
            })
            .collect()
    }

    /// Writes the grid back, then reloads so the view shows what was stored.
    /// On failure the grid keeps its edits.
    pub async fn save<S: SheetStore>(&mut self, engine: &Engine<S>) -> ResultEngine<()> {
        engine.save_list(&self.list, &self.items_to_save()).await?;
        let reloaded = engine.list_items(&self.list).await?;
        *self = Self::from_items(&self.list, reloaded);
        Ok(())
    }

    /// Adds an item through the store and reloads. Grid edits on the other
    /// rows are kept.
    pub async fn quick_add<S: SheetStore>(
        &mut self,
        engine: &Engine<S>,
        new_item: NewItem,
    ) -> ResultEngine<Item> {
        let added = engine.add_item(&self.list, new_item).await?;
        let reloaded = engine.list_items(&self.list).await?;
        let ids = carry_ids(&self.loaded, &reloaded);

        let mut rows: Vec<PlanRow> = Vec::with_capacity(self.rows.len() + 1);
        for row in &self.rows {
            let was_loaded = self.loaded.iter().any(|item| item.id == row.key);
            match ids.get(&row.key) {
                Some(new_key) => rows.push(PlanRow {
                    key: *new_key,
                    ..row.clone()
                }),
                None if !was_loaded => rows.push(row.clone()),
                None => {}
            }
        }
        let known: Vec<RowKey> = rows.iter().map(|row| row.key).collect();
        let removed: Vec<RowKey> = self
            .loaded
            .iter()
            .filter(|item| !self.rows.iter().any(|row| row.key == item.id))
            .filter_map(|item| ids.get(&item.id).copied())
            .collect();
        rows.extend(
            reloaded
                .iter()
                .filter(|item| !known.contains(&item.id) && !removed.contains(&item.id))
                .map(PlanRow::from),
        );

        self.loaded = reloaded;
        self.rows = rows;
        Ok(added)
    }

    /// Sets `field` on the stored items named like the loaded row `key` right
    /// away, then reloads. Used by the instant editing style.
    pub async fn apply_now<S: SheetStore>(
        &mut self,
        engine: &Engine<S>,
        key: RowKey,
        field: ItemField,
    ) -> ResultEngine<usize> {
        let Some(name) = self.stored_name(key) else {
            return Ok(0);
        };
        let matched = engine.update_item_field(&self.list, &name, field).await?;
        self.reload(engine).await?;
        Ok(matched)
    }

    /// Deletes the stored items named like the loaded row `key` right away,
    /// then reloads. Unsaved rows are just dropped from the grid.
    pub async fn remove_now<S: SheetStore>(
        &mut self,
        engine: &Engine<S>,
        key: RowKey,
    ) -> ResultEngine<usize> {
        let Some(name) = self.stored_name(key) else {
            self.remove_row(key);
            return Ok(0);
        };
        let removed = engine.remove_items_named(&self.list, &name).await?;
        self.reload(engine).await?;
        Ok(removed)
    }

    async fn reload<S: SheetStore>(&mut self, engine: &Engine<S>) -> ResultEngine<()> {
        let reloaded = engine.list_items(&self.list).await?;
        *self = Self::from_items(&self.list, reloaded);
        Ok(())
    }

    fn stored_name(&self, key: RowKey) -> Option<String> {
        self.loaded
            .iter()
            .find(|item| item.id == key)
            .map(|item| item.name.clone())
    }

    fn edit(&mut self, key: RowKey, change: impl FnOnce(&mut PlanRow)) -> bool {
        match self.rows.iter_mut().find(|row| row.key == key) {
            Some(row) => {
                change(row);
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{EngineError, MemoryStore, Seed};

    use super::*;

    async fn engine_with(items: &[Item]) -> Engine<MemoryStore> {
        let engine = Engine::in_memory();
        engine.new_list("Lista", Seed::Empty).await.unwrap();
        engine.save_list("Lista", items).await.unwrap();
        engine
    }

    fn key_of(view: &PlanningView, name: &str) -> RowKey {
        view.rows()
            .iter()
            .find(|row| row.name == name)
            .map(|row| row.key)
            .unwrap()
    }

    #[tokio::test]
    async fn unnamed_rows_are_not_saved() {
        let engine = engine_with(&[]).await;
        let mut view = PlanningView::load(&engine, "Lista").await.unwrap();
        view.insert_row();
        let key = view.insert_row();
        view.set_name(key, "  Pan ");
        view.rows[1].quantity = f64::INFINITY;

        let items = view.items_to_save();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Pan");
        assert_eq!(items[0].quantity, 0.0);
        assert_eq!(items[0].price, 0.0);
        assert!(!items[0].is_checked);
    }

    #[tokio::test]
    async fn grid_save_keeps_price_and_checkbox() {
        let stored = vec![
            Item::new(Category::Meat, "Pollo", 1.0, Unit::Kilogram)
                .with_price(8.5)
                .checked(true),
            Item::new(Category::Fruits, "Uvas", 1.0, Unit::Kilogram),
        ];
        let engine = engine_with(&stored).await;
        let mut view = PlanningView::load(&engine, "Lista").await.unwrap();
        let pollo = key_of(&view, "Pollo");
        view.set_quantity(pollo, 2.0).unwrap();
        view.set_unit(pollo, Unit::Pound);
        view.remove_row(key_of(&view, "Uvas"));
        assert!(view.is_dirty());

        view.save(&engine).await.unwrap();
        assert!(!view.is_dirty());
        let items = engine.list_items("Lista").await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].quantity, 2.0);
        assert_eq!(items[0].unit, Unit::Pound);
        assert_eq!(items[0].price, 8.5);
        assert!(items[0].is_checked);
    }

    #[tokio::test]
    async fn failed_save_keeps_the_grid() {
        let engine = engine_with(&[Item::new(Category::Other, "Velas", 4.0, Unit::Piece)]).await;
        let mut view = PlanningView::load(&engine, "Lista").await.unwrap();
        view.set_quantity(key_of(&view, "Velas"), 6.0).unwrap();

        engine.store().set_offline(true);
        assert!(view.save(&engine).await.is_err());
        assert!(view.is_dirty());
        assert_eq!(view.rows()[0].quantity, 6.0);
    }

    #[tokio::test]
    async fn quick_add_keeps_grid_edits() {
        let engine = engine_with(&[
            Item::new(Category::Pantry, "Arroz", 1.0, Unit::Kilogram),
            Item::new(Category::Pantry, "Sal", 1.0, Unit::Piece),
        ])
        .await;
        let mut view = PlanningView::load(&engine, "Lista").await.unwrap();
        view.set_quantity(key_of(&view, "Arroz"), 3.0).unwrap();
        view.remove_row(key_of(&view, "Sal"));
        let draft = view.insert_row();
        view.set_name(draft, "Fideos");

        view.quick_add(
            &engine,
            NewItem {
                name: "Aceite".to_string(),
                category: Category::Pantry,
                quantity: 1.0,
                unit: Unit::Liter,
            },
        )
        .await
        .unwrap();

        let names: Vec<_> = view.rows().iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, ["Arroz", "Fideos", "Aceite"]);
        assert_eq!(view.rows()[0].quantity, 3.0);
        assert_eq!(view.loaded().len(), 3);
    }

    #[tokio::test]
    async fn instant_edits_write_by_name() {
        let engine = engine_with(&[
            Item::new(Category::Pantry, "Huevos", 12.0, Unit::Piece),
            Item::new(Category::Pantry, "Huevos", 6.0, Unit::Piece),
        ])
        .await;
        let mut view = PlanningView::load(&engine, "Lista").await.unwrap();
        let key = view.rows()[0].key;

        let matched = view
            .apply_now(&engine, key, ItemField::Quantity(30.0))
            .await
            .unwrap();
        assert_eq!(matched, 2);
        assert!(view.rows().iter().all(|row| row.quantity == 30.0));

        let key = view.rows()[0].key;
        assert_eq!(view.remove_now(&engine, key).await.unwrap(), 2);
        assert!(view.rows().is_empty());
        assert!(engine.list_items("Lista").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn negative_quantities_never_reach_the_sheet() {
        let engine =
            engine_with(&[Item::new(Category::Pantry, "Arroz", 1.0, Unit::Kilogram)]).await;
        let mut view = PlanningView::load(&engine, "Lista").await.unwrap();
        let key = key_of(&view, "Arroz");

        assert!(matches!(
            view.set_quantity(key, -3.0),
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(view.set_quantity(key, f64::NAN).is_err());
        assert_eq!(view.rows()[0].quantity, 1.0);
        assert!(!view.is_dirty());

        view.rows[0].quantity = -3.0;
        assert_eq!(view.items_to_save()[0].quantity, 0.0);
        view.save(&engine).await.unwrap();
        let items = engine.list_items("Lista").await.unwrap();
        assert_eq!(items[0].quantity, 0.0);
    }
}
