use crate::{Item, ItemField, NewItem, ResultEngine, store::SheetStore};

use super::Engine;

impl<S: SheetStore> Engine<S> {
    /// Appends an unchecked, zero-priced item and saves the list.
    pub async fn add_item(&self, list: &str, new_item: NewItem) -> ResultEngine<Item> {
        let item = new_item.into_item()?;
        let _guard = self.lock.lock().await;
        let list = list.trim();
        let mut items = self.load(list).await?;
        items.push(item.clone());
        self.persist(list, &items).await?;
        tracing::info!(list = %list, item = %item.name, "item added");
        Ok(item)
    }

    /// Removes every item called `name`. Returns how many were removed.
    pub async fn remove_items_named(&self, list: &str, name: &str) -> ResultEngine<usize> {
        let _guard = self.lock.lock().await;
        let list = list.trim();
        let name = name.trim();
        let mut items = self.load(list).await?;
        let before = items.len();
        items.retain(|item| item.name != name);
        let removed = before - items.len();
        if removed > 0 {
            self.persist(list, &items).await?;
            tracing::info!(list = %list, item = %name, removed, "items removed");
        }
        Ok(removed)
    }

    /// Sets `field` on every item called `name`. Returns how many matched;
    /// nothing is written when none did.
    pub async fn update_item_field(
        &self,
        list: &str,
        name: &str,
        field: ItemField,
    ) -> ResultEngine<usize> {
        let field = field.validate()?;
        let _guard = self.lock.lock().await;
        let list = list.trim();
        let name = name.trim();
        let mut items = self.load(list).await?;
        let mut matched = 0;
        for item in items.iter_mut().filter(|item| item.name == name) {
            field.apply(item);
            matched += 1;
        }
        if matched > 0 {
            self.persist(list, &items).await?;
            tracing::info!(list = %list, item = %name, matched, ?field, "items updated");
        }
        Ok(matched)
    }
}

#[cfg(test)]
mod tests {
    use crate::{Category, EngineError, Seed, Unit};

    use super::*;

    fn leche() -> NewItem {
        NewItem {
            name: "Leche".to_string(),
            category: Category::Pantry,
            quantity: 2.0,
            unit: Unit::Liter,
        }
    }

    #[tokio::test]
    async fn quick_add_appends_unpriced_item() {
        let engine = Engine::in_memory();
        engine.new_list("Lista", Seed::Empty).await.unwrap();
        let added = engine.add_item("Lista", leche()).await.unwrap();
        assert_eq!(added.price, 0.0);
        assert!(!added.is_checked);

        let items = engine.list_items("Lista").await.unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].same_record(&added));
    }

    #[tokio::test]
    async fn quick_add_validates_input() {
        let engine = Engine::in_memory();
        engine.new_list("Lista", Seed::Empty).await.unwrap();
        let unnamed = NewItem {
            name: " ".to_string(),
            ..leche()
        };
        assert!(matches!(
            engine.add_item("Lista", unnamed).await,
            Err(EngineError::InvalidName(_))
        ));
        let negative = NewItem {
            quantity: -1.0,
            ..leche()
        };
        assert!(matches!(
            engine.add_item("Lista", negative).await,
            Err(EngineError::InvalidAmount(_))
        ));
        assert!(engine.list_items("Lista").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_name_writes_nothing() {
        let engine = Engine::in_memory();
        engine.new_list("Lista", Seed::Empty).await.unwrap();
        let matched = engine
            .update_item_field("Lista", "Nada", ItemField::Checked(true))
            .await
            .unwrap();
        assert_eq!(matched, 0);
        assert_eq!(engine.remove_items_named("Lista", "Nada").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_rejects_negative_price() {
        let engine = Engine::in_memory();
        engine.new_list("Lista", Seed::Empty).await.unwrap();
        engine.add_item("Lista", leche()).await.unwrap();
        assert!(matches!(
            engine
                .update_item_field("Lista", "Leche", ItemField::Price(-3.0))
                .await,
            Err(EngineError::InvalidAmount(_))
        ));
    }
}
