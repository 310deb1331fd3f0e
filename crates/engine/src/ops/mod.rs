use tokio::sync::Mutex;

use crate::{
    ResultEngine,
    store::{MemoryStore, SheetStore},
};

mod items;
mod lists;

pub use lists::{NewListOutcome, Seed};

/// List repository and item commands on top of a [`SheetStore`].
///
/// Every read-modify-write runs while holding `lock`, so commands sent through
/// the same engine never interleave. Nothing protects against another process
/// writing the same spreadsheet: the last writer wins.
#[derive(Debug)]
pub struct Engine<S> {
    store: S,
    lock: Mutex<()>,
}

impl<S: SheetStore> Engine<S> {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder<S> {
        EngineBuilder { store: None }
    }

    /// The backing store, e.g. to flip a [`MemoryStore`] offline in tests.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// The builder for `Engine`
pub struct EngineBuilder<S> {
    store: Option<S>,
}

impl<S: SheetStore> EngineBuilder<S> {
    /// Pass the required store
    pub fn store(mut self, store: S) -> EngineBuilder<S> {
        self.store = Some(store);
        self
    }

    /// Construct `Engine`
    pub fn build(self) -> ResultEngine<Engine<S>> {
        let store = self.store.ok_or_else(|| {
            crate::EngineError::Storage("engine built without a store".to_string())
        })?;
        Ok(Engine {
            store,
            lock: Mutex::new(()),
        })
    }
}

impl Engine<MemoryStore> {
    /// Engine over an empty in-memory spreadsheet.
    #[must_use]
    pub fn in_memory() -> Self {
        Engine {
            store: MemoryStore::new(),
            lock: Mutex::new(()),
        }
    }
}
