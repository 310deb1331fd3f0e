use crate::{
    EngineError, Item, MAX_LISTS, ResultEngine, codec,
    item::sort_items,
    store::{SheetStore, ValueInput},
    template::default_template,
    util::{is_reserved_tab, normalize_list_name},
};

use super::Engine;

/// Initial content of a new list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Seed {
    #[default]
    Empty,
    DefaultTemplate,
    /// Items of another list, with prices cleared and nothing checked.
    CopyOf(String),
}

/// Result of [`Engine::new_list`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewListOutcome {
    pub name: String,
    /// List deleted to stay within [`MAX_LISTS`].
    pub evicted: Option<String>,
    /// Set when the eviction was attempted and failed; the new list exists anyway.
    pub eviction_error: Option<String>,
}

impl<S: SheetStore> Engine<S> {
    /// Names of every list, sorted ascending. Reserved default tabs are skipped.
    pub async fn lists(&self) -> ResultEngine<Vec<String>> {
        let _guard = self.lock.lock().await;
        self.list_names().await
    }

    /// Items of a list in display order.
    pub async fn list_items(&self, name: &str) -> ResultEngine<Vec<Item>> {
        let _guard = self.lock.lock().await;
        self.load(name.trim()).await
    }

    /// Creates a list and fills it from `seed`.
    ///
    /// When [`MAX_LISTS`] lists already exist the first one by name is deleted
    /// beforehand. The seed is read before that, so copying the list about to
    /// be evicted works.
    pub async fn new_list(&self, name: &str, seed: Seed) -> ResultEngine<NewListOutcome> {
        let name = normalize_list_name(name)?;
        let _guard = self.lock.lock().await;

        let existing = self.list_names().await?;
        if existing.contains(&name) {
            return Err(EngineError::ListExists(name));
        }

        let items = match &seed {
            Seed::Empty => Vec::new(),
            Seed::DefaultTemplate => default_template(),
            Seed::CopyOf(source) => {
                let mut items = self.load(source.trim()).await?;
                items.iter_mut().for_each(Item::reset_purchase);
                items
            }
        };

        let mut outcome = NewListOutcome {
            name: name.clone(),
            evicted: None,
            eviction_error: None,
        };
        if existing.len() >= MAX_LISTS
            && let Some(oldest) = existing.first()
        {
            match self.store.delete_tab(oldest).await {
                Ok(()) => {
                    tracing::info!(list = %oldest, "evicted oldest list");
                    outcome.evicted = Some(oldest.clone());
                }
                Err(err) => {
                    tracing::warn!(list = %oldest, error = %err, "could not evict oldest list");
                    outcome.eviction_error = Some(err.to_string());
                }
            }
        }

        self.store.add_tab(&name).await?;
        self.persist(&name, &items).await?;
        tracing::info!(list = %name, items = items.len(), seed = ?seed, "list created");
        Ok(outcome)
    }

    /// Deletes a list. Not offered to end users; used by eviction and tooling.
    pub async fn delete_list(&self, name: &str) -> ResultEngine<()> {
        let _guard = self.lock.lock().await;
        let name = name.trim();
        self.store.delete_tab(name).await?;
        tracing::info!(list = %name, "list deleted");
        Ok(())
    }

    /// Replaces the whole content of a list.
    pub async fn save_list(&self, name: &str, items: &[Item]) -> ResultEngine<()> {
        let _guard = self.lock.lock().await;
        self.persist(name.trim(), items).await?;
        tracing::info!(list = %name.trim(), items = items.len(), "list saved");
        Ok(())
    }

    pub(super) async fn list_names(&self) -> ResultEngine<Vec<String>> {
        let mut names: Vec<String> = self
            .store
            .tab_titles()
            .await?
            .into_iter()
            .filter(|title| !is_reserved_tab(title))
            .collect();
        names.sort();
        Ok(names)
    }

    pub(super) async fn load(&self, name: &str) -> ResultEngine<Vec<Item>> {
        let grid = self.store.read_tab(name).await?;
        let mut items = codec::decode(&grid);
        sort_items(&mut items);
        tracing::debug!(list = %name, items = items.len(), "list loaded");
        Ok(items)
    }

    pub(super) async fn persist(&self, name: &str, items: &[Item]) -> ResultEngine<()> {
        let grid = codec::encode(items);
        self.store
            .write_tab(name, &grid, ValueInput::UserEntered)
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::{Category, MemoryStore, Unit, codec::Grid};

    use super::*;

    fn header_only() -> Grid {
        codec::encode(&[])
    }

    #[tokio::test]
    async fn reserved_tabs_are_hidden() {
        let store = MemoryStore::with_tabs([
            ("Hoja1", Grid::new()),
            ("B", header_only()),
            ("A", header_only()),
        ]);
        let engine = Engine::builder().store(store).build().unwrap();
        assert_eq!(engine.lists().await.unwrap(), vec!["A", "B"]);
    }

    #[tokio::test]
    async fn new_list_rejects_bad_names() {
        let engine = Engine::in_memory();
        assert!(matches!(
            engine.new_list("   ", Seed::Empty).await,
            Err(EngineError::InvalidName(_))
        ));
        assert!(matches!(
            engine.new_list("Sheet1", Seed::Empty).await,
            Err(EngineError::InvalidName(_))
        ));

        engine.new_list("Lista", Seed::Empty).await.unwrap();
        assert_eq!(
            engine.new_list(" Lista ", Seed::DefaultTemplate).await,
            Err(EngineError::ListExists("Lista".to_string()))
        );
        assert!(engine.list_items("Lista").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_list_still_has_header() {
        let engine = Engine::in_memory();
        engine.new_list("Lista", Seed::Empty).await.unwrap();
        assert_eq!(
            engine.store().read_tab("Lista").await.unwrap(),
            header_only()
        );
    }

    #[tokio::test]
    async fn template_seed_is_sorted_on_load() {
        let engine = Engine::in_memory();
        engine.new_list("Lista", Seed::DefaultTemplate).await.unwrap();
        let items = engine.list_items("Lista").await.unwrap();
        assert_eq!(items.len(), 48);
        assert!(items.windows(2).all(|pair| {
            (&pair[0].category, &pair[0].name) <= (&pair[1].category, &pair[1].name)
        }));
        assert!(items.iter().all(|item| !item.is_checked));
    }

    #[tokio::test]
    async fn copy_of_missing_list_creates_nothing() {
        let engine = Engine::in_memory();
        assert_eq!(
            engine
                .new_list("Nueva", Seed::CopyOf("Vieja".to_string()))
                .await,
            Err(EngineError::ListNotFound("Vieja".to_string()))
        );
        assert!(engine.lists().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn save_overwrites_and_requires_the_list() {
        let engine = Engine::in_memory();
        engine.new_list("Lista", Seed::DefaultTemplate).await.unwrap();
        let items = vec![Item::new(Category::Fruits, "Mango", 2.0, Unit::Piece)];
        engine.save_list("Lista", &items).await.unwrap();
        let loaded = engine.list_items("Lista").await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].same_record(&items[0]));

        assert_eq!(
            engine.save_list("Otra", &items).await,
            Err(EngineError::ListNotFound("Otra".to_string()))
        );
    }
}
