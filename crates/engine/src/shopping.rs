//! Shopping view: check items off and enter what they cost.
//!
//! Edits are buffered per row until [`ShoppingView::save`] writes the whole
//! list back. Running totals always reflect the buffered edits.

use std::collections::HashMap;

use crate::{
    Category, Engine, Item, ItemId, NewItem, ResultEngine,
    item::carry_ids,
    store::SheetStore,
    totals::{Totals, ZeroGroups, summarize},
    util::checked_non_negative,
};

#[derive(Clone, Copy, Debug, Default, PartialEq)]
struct Edit {
    is_checked: Option<bool>,
    price: Option<f64>,
}

/// Items of one category as shown in the shopping view.
#[derive(Clone, Debug, PartialEq)]
pub struct Section {
    pub category: Category,
    pub items: Vec<Item>,
    pub checked: usize,
}

impl Section {
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// `"2/5"`, the header counter.
    #[must_use]
    pub fn progress(&self) -> String {
        format!("{}/{}", self.checked, self.total())
    }
}

#[derive(Clone, Debug)]
pub struct ShoppingView {
    list: String,
    loaded: Vec<Item>,
    edits: HashMap<ItemId, Edit>,
}

impl ShoppingView {
    pub async fn load<S: SheetStore>(engine: &Engine<S>, list: &str) -> ResultEngine<Self> {
        let loaded = engine.list_items(list).await?;
        Ok(Self {
            list: list.trim().to_string(),
            loaded,
            edits: HashMap::new(),
        })
    }

    #[must_use]
    pub fn list(&self) -> &str {
        &self.list
    }

    /// Items as last read from the store, in display order.
    #[must_use]
    pub fn loaded(&self) -> &[Item] {
        &self.loaded
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Flips the checkbox of a row. Returns the new state, `None` for an unknown id.
    pub fn toggle(&mut self, id: ItemId) -> Option<bool> {
        let checked = !self.effective(id)?.is_checked;
        self.set_checked(id, checked);
        Some(checked)
    }

    /// Returns `false` for an unknown id.
    pub fn set_checked(&mut self, id: ItemId, checked: bool) -> bool {
        let Some(original) = self.original(id).map(|item| item.is_checked) else {
            return false;
        };
        let edit = self.edits.entry(id).or_default();
        edit.is_checked = (checked != original).then_some(checked);
        self.drop_noop(id);
        true
    }

    /// Rejects negative or non-finite prices. Returns `false` for an unknown id.
    pub fn set_price(&mut self, id: ItemId, price: f64) -> ResultEngine<bool> {
        let price = checked_non_negative(price, "price")?;
        let Some(original) = self.original(id).map(|item| item.price) else {
            return Ok(false);
        };
        let edit = self.edits.entry(id).or_default();
        edit.price = (price != original).then_some(price);
        self.drop_noop(id);
        Ok(true)
    }

    /// Drops every buffered edit.
    pub fn discard(&mut self) {
        self.edits.clear();
    }

    /// Loaded items with the buffered edits applied.
    #[must_use]
    pub fn effective_items(&self) -> Vec<Item> {
        self.loaded.iter().map(|item| self.apply(item)).collect()
    }

    /// One section per category present, in display order; unlisted
    /// categories come last.
    #[must_use]
    pub fn sections(&self) -> Vec<Section> {
        let mut sections: Vec<Section> = Vec::new();
        for item in self.effective_items() {
            let checked = usize::from(item.is_checked);
            match sections.last_mut() {
                Some(section) if section.category == item.category => {
                    section.checked += checked;
                    section.items.push(item);
                }
                _ => sections.push(Section {
                    category: item.category.clone(),
                    items: vec![item],
                    checked,
                }),
            }
        }
        sections
    }

    /// Running totals, including unsaved edits.
    #[must_use]
    pub fn totals(&self, zero_groups: ZeroGroups) -> Option<Totals> {
        summarize(&self.effective_items(), zero_groups)
    }

    /// Writes every edit back and reloads. On failure the view, edits
    /// included, is left as it was so the save can be retried.
    pub async fn save<S: SheetStore>(&mut self, engine: &Engine<S>) -> ResultEngine<()> {
        let items = self.effective_items();
        engine.save_list(&self.list, &items).await?;
        let reloaded = engine.list_items(&self.list).await?;
        self.loaded = reloaded;
        self.edits.clear();
        Ok(())
    }

    /// Adds an item through the store, then reloads. Buffered edits of the
    /// other rows are kept.
    pub async fn quick_add<S: SheetStore>(
        &mut self,
        engine: &Engine<S>,
        new_item: NewItem,
    ) -> ResultEngine<Item> {
        let added = engine.add_item(&self.list, new_item).await?;
        let reloaded = engine.list_items(&self.list).await?;
        let ids = carry_ids(&self.loaded, &reloaded);
        self.edits = self
            .edits
            .drain()
            .filter_map(|(old, edit)| ids.get(&old).map(|new| (*new, edit)))
            .collect();
        self.loaded = reloaded;
        Ok(added)
    }

    fn original(&self, id: ItemId) -> Option<&Item> {
        self.loaded.iter().find(|item| item.id == id)
    }

    fn effective(&self, id: ItemId) -> Option<Item> {
        self.original(id).map(|item| self.apply(item))
    }

    fn apply(&self, item: &Item) -> Item {
        let mut item = item.clone();
        if let Some(edit) = self.edits.get(&item.id) {
            if let Some(checked) = edit.is_checked {
                item.is_checked = checked;
            }
            if let Some(price) = edit.price {
                item.price = price;
            }
        }
        item
    }

    fn drop_noop(&mut self, id: ItemId) {
        if self.edits.get(&id) == Some(&Edit::default()) {
            self.edits.remove(&id);
        }
    }
}
