use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Mutex;

use crate::{EngineError, ResultEngine, codec::Grid};

use super::{SheetStore, ValueInput};

/// Volatile spreadsheet kept in memory. Tabs keep their creation order.
///
/// `set_offline(true)` makes every call fail like a dropped connection would,
/// so the failure paths of the callers can be exercised.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tabs: Mutex<Vec<(String, Grid)>>,
    offline: AtomicBool,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-filled with the given tabs, e.g. a spreadsheet that still has
    /// its default `Sheet1`.
    #[must_use]
    pub fn with_tabs<I, S>(tabs: I) -> Self
    where
        I: IntoIterator<Item = (S, Grid)>,
        S: Into<String>,
    {
        Self {
            tabs: Mutex::new(
                tabs.into_iter()
                    .map(|(title, grid)| (title.into(), grid))
                    .collect(),
            ),
            offline: AtomicBool::new(false),
        }
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    fn ensure_online(&self) -> ResultEngine<()> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(EngineError::Storage("spreadsheet unreachable".to_string()));
        }
        Ok(())
    }
}

impl SheetStore for MemoryStore {
    async fn tab_titles(&self) -> ResultEngine<Vec<String>> {
        self.ensure_online()?;
        let tabs = self.tabs.lock().await;
        Ok(tabs.iter().map(|(title, _)| title.clone()).collect())
    }

    async fn add_tab(&self, title: &str) -> ResultEngine<()> {
        self.ensure_online()?;
        let mut tabs = self.tabs.lock().await;
        if tabs.iter().any(|(existing, _)| existing == title) {
            return Err(EngineError::Storage(format!(
                "a tab named \"{title}\" already exists"
            )));
        }
        tabs.push((title.to_string(), Grid::new()));
        Ok(())
    }

    async fn delete_tab(&self, title: &str) -> ResultEngine<()> {
        self.ensure_online()?;
        let mut tabs = self.tabs.lock().await;
        let pos = tabs
            .iter()
            .position(|(existing, _)| existing == title)
            .ok_or_else(|| EngineError::ListNotFound(title.to_string()))?;
        tabs.remove(pos);
        Ok(())
    }

    async fn read_tab(&self, title: &str) -> ResultEngine<Grid> {
        self.ensure_online()?;
        let tabs = self.tabs.lock().await;
        tabs.iter()
            .find(|(existing, _)| existing == title)
            .map(|(_, grid)| grid.clone())
            .ok_or_else(|| EngineError::ListNotFound(title.to_string()))
    }

    async fn write_tab(&self, title: &str, grid: &Grid, _input: ValueInput) -> ResultEngine<()> {
        self.ensure_online()?;
        let mut tabs = self.tabs.lock().await;
        let (_, stored) = tabs
            .iter_mut()
            .find(|(existing, _)| existing == title)
            .ok_or_else(|| EngineError::ListNotFound(title.to_string()))?;
        *stored = grid.clone();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn write_replaces_whole_tab() {
        let store = MemoryStore::new();
        store.add_tab("Lista").await.unwrap();
        let big = vec![vec!["a".to_string()], vec!["b".to_string()]];
        store.write_tab("Lista", &big, ValueInput::Raw).await.unwrap();
        let small = vec![vec!["c".to_string()]];
        store.write_tab("Lista", &small, ValueInput::Raw).await.unwrap();
        assert_eq!(store.read_tab("Lista").await.unwrap(), small);
    }

    #[tokio::test]
    async fn missing_tab_and_offline() {
        let store = MemoryStore::new();
        assert_eq!(
            store.read_tab("nope").await,
            Err(EngineError::ListNotFound("nope".to_string()))
        );
        store.set_offline(true);
        assert!(matches!(
            store.tab_titles().await,
            Err(EngineError::Storage(_))
        ));
    }
}
