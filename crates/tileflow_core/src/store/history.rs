//! Model store with bounded undo/redo history and transactions.
//!
//! # Responsibility
//! - Own the single authoritative `Model` snapshot.
//! - Record past/future snapshots for undo and redo.
//! - Group several edits into one history entry via transactions.
//!
//! # Invariants
//! - `past.len() <= max_history_size`; the oldest entry is dropped first.
//! - Any recorded edit clears `future`.
//! - While a transaction is open, edits record nothing and undo/redo are
//!   refused; the outermost `end_transaction` records at most one entry.
//! - `cancel_transaction` restores the exact pre-transaction snapshot.

use crate::config::EditorConfig;
use crate::model::diagram::{Color, Icon, Model, ModelItem, View};
use log::{debug, info};

/// Snapshot stacks around the present model.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryState {
    pub past: Vec<Model>,
    pub present: Model,
    pub future: Vec<Model>,
    pub max_history_size: usize,
}

/// Top-level replacement of model fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelPatch {
    pub version: Option<Option<String>>,
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub items: Option<Vec<ModelItem>>,
    pub icons: Option<Vec<Icon>>,
    pub colors: Option<Vec<Color>>,
    pub views: Option<Vec<View>>,
}

impl ModelPatch {
    /// Patch replacing every field with those of `model`.
    pub fn replace_with(model: Model) -> Self {
        Self {
            version: Some(model.version),
            title: Some(model.title),
            description: Some(model.description),
            items: Some(model.items),
            icons: Some(model.icons),
            colors: Some(model.colors),
            views: Some(model.views),
        }
    }

    fn apply(self, model: &mut Model) {
        if let Some(version) = self.version {
            model.version = version;
        }
        if let Some(title) = self.title {
            model.title = title;
        }
        if let Some(description) = self.description {
            model.description = description;
        }
        if let Some(items) = self.items {
            model.items = items;
        }
        if let Some(icons) = self.icons {
            model.icons = icons;
        }
        if let Some(colors) = self.colors {
            model.colors = colors;
        }
        if let Some(views) = self.views {
            model.views = views;
        }
    }
}

#[derive(Debug, Clone)]
struct Transaction {
    snapshot: Model,
    depth: usize,
    dirty: bool,
}

/// Owner of the history state.
#[derive(Debug, Clone)]
pub struct ModelStore {
    state: HistoryState,
    transaction: Option<Transaction>,
}

impl ModelStore {
    pub fn new(model: Model, max_history_size: usize) -> Self {
        Self {
            state: HistoryState {
                past: Vec::new(),
                present: model,
                future: Vec::new(),
                max_history_size,
            },
            transaction: None,
        }
    }

    pub fn with_config(model: Model, config: &EditorConfig) -> Self {
        Self::new(model, config.max_history_size)
    }

    pub fn get(&self) -> &HistoryState {
        &self.state
    }

    pub fn present(&self) -> &Model {
        &self.state.present
    }

    /// Merges `patch` into the present model.
    ///
    /// Unless `skip_history` is set, the previous present becomes an undo
    /// step. Inside a transaction the step is deferred to the outermost
    /// `end_transaction`.
    pub fn set(&mut self, patch: ModelPatch, skip_history: bool) {
        if !skip_history {
            match self.transaction.as_mut() {
                Some(transaction) => transaction.dirty = true,
                None => {
                    let previous = self.state.present.clone();
                    self.push_past(previous);
                    debug!(
                        "event=history_commit module=store status=ok past={}",
                        self.state.past.len()
                    );
                }
            }
        }
        patch.apply(&mut self.state.present);
    }

    /// Steps back one snapshot. Returns `false` when nothing was undone.
    pub fn undo(&mut self) -> bool {
        if self.transaction.is_some() {
            return false;
        }
        let Some(previous) = self.state.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.state.present, previous);
        self.state.future.push(current);
        info!(
            "event=history_undo module=store status=ok past={} future={}",
            self.state.past.len(),
            self.state.future.len()
        );
        true
    }

    /// Re-applies one undone snapshot. Returns `false` when nothing was redone.
    pub fn redo(&mut self) -> bool {
        if self.transaction.is_some() {
            return false;
        }
        let Some(next) = self.state.future.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.state.present, next);
        self.state.past.push(current);
        self.trim_past();
        info!(
            "event=history_redo module=store status=ok past={} future={}",
            self.state.past.len(),
            self.state.future.len()
        );
        true
    }

    pub fn can_undo(&self) -> bool {
        self.transaction.is_none() && !self.state.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        self.transaction.is_none() && !self.state.future.is_empty()
    }

    /// Checkpoints the present model as an undo step. Ignored inside a
    /// transaction.
    pub fn save_to_history(&mut self) {
        if self.transaction.is_some() {
            return;
        }
        let present = self.state.present.clone();
        self.push_past(present);
    }

    /// Empties both stacks and forgets any open transaction.
    pub fn clear_history(&mut self) {
        self.state.past.clear();
        self.state.future.clear();
        self.transaction = None;
    }

    /// Opens a transaction; nested calls only increase depth.
    pub fn begin_transaction(&mut self) {
        match self.transaction.as_mut() {
            Some(transaction) => transaction.depth += 1,
            None => {
                self.transaction = Some(Transaction {
                    snapshot: self.state.present.clone(),
                    depth: 1,
                    dirty: false,
                });
            }
        }
        info!(
            "event=transaction_begin module=store status=ok depth={}",
            self.transaction_depth()
        );
    }

    /// Closes one transaction level. Returns `false` when none was open.
    pub fn end_transaction(&mut self) -> bool {
        let Some(transaction) = self.transaction.as_mut() else {
            return false;
        };
        transaction.depth -= 1;
        if transaction.depth > 0 {
            return true;
        }

        let Some(transaction) = self.transaction.take() else {
            return false;
        };
        if transaction.dirty {
            self.push_past(transaction.snapshot);
        }
        info!(
            "event=transaction_end module=store status=ok recorded={}",
            transaction.dirty
        );
        true
    }

    /// Abandons the open transaction at every nesting level and restores the
    /// pre-transaction model. Returns `false` when none was open.
    pub fn cancel_transaction(&mut self) -> bool {
        let Some(transaction) = self.transaction.take() else {
            return false;
        };
        self.state.present = transaction.snapshot;
        info!("event=transaction_cancel module=store status=ok");
        true
    }

    /// Runs `operation` inside a transaction; an `Err` cancels it.
    pub fn transaction<T, E, F>(&mut self, operation: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
    {
        self.begin_transaction();
        match operation(self) {
            Ok(value) => {
                self.end_transaction();
                Ok(value)
            }
            Err(err) => {
                self.cancel_transaction();
                Err(err)
            }
        }
    }

    pub fn is_in_transaction(&self) -> bool {
        self.transaction.is_some()
    }

    fn transaction_depth(&self) -> usize {
        self.transaction
            .as_ref()
            .map_or(0, |transaction| transaction.depth)
    }

    fn push_past(&mut self, snapshot: Model) {
        self.state.past.push(snapshot);
        self.trim_past();
        self.state.future.clear();
    }

    fn trim_past(&mut self) {
        let overflow = self
            .state
            .past
            .len()
            .saturating_sub(self.state.max_history_size);
        if overflow > 0 {
            self.state.past.drain(..overflow);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ModelPatch, ModelStore};
    use crate::model::diagram::Model;

    fn titled(title: &str) -> ModelPatch {
        ModelPatch {
            title: Some(title.to_string()),
            ..ModelPatch::default()
        }
    }

    #[test]
    fn set_records_and_undo_redo_walk_the_stacks() {
        let mut store = ModelStore::new(Model::new("v0"), 50);
        store.set(titled("v1"), false);
        store.set(titled("v2"), false);
        assert_eq!(store.get().past.len(), 2);

        assert!(store.undo());
        assert_eq!(store.present().title, "v1");
        assert!(store.can_redo());
        assert!(store.redo());
        assert_eq!(store.present().title, "v2");
        assert!(!store.redo());
    }

    #[test]
    fn skip_history_does_not_record() {
        let mut store = ModelStore::new(Model::new("v0"), 50);
        store.set(titled("v1"), true);
        assert!(!store.can_undo());
        assert_eq!(store.present().title, "v1");
    }

    #[test]
    fn new_edit_clears_future() {
        let mut store = ModelStore::new(Model::new("v0"), 50);
        store.set(titled("v1"), false);
        store.undo();
        store.set(titled("v1b"), false);
        assert!(!store.can_redo());
    }

    #[test]
    fn history_is_bounded() {
        let mut store = ModelStore::new(Model::new("v0"), 3);
        for index in 1..=6 {
            store.set(titled(&format!("v{index}")), false);
        }
        assert_eq!(store.get().past.len(), 3);
        assert_eq!(store.get().past[0].title, "v3");
    }

    #[test]
    fn nested_transaction_records_one_entry() {
        let mut store = ModelStore::new(Model::new("v0"), 50);
        store.begin_transaction();
        store.set(titled("v1"), false);
        store.begin_transaction();
        store.set(titled("v2"), false);
        assert!(!store.undo());
        assert!(store.end_transaction());
        assert!(store.is_in_transaction());
        assert!(store.end_transaction());
        assert!(!store.is_in_transaction());

        assert_eq!(store.get().past.len(), 1);
        assert!(store.undo());
        assert_eq!(store.present().title, "v0");
        assert!(!store.end_transaction());
    }

    #[test]
    fn empty_transaction_records_nothing() {
        let mut store = ModelStore::new(Model::new("v0"), 50);
        store.begin_transaction();
        store.end_transaction();
        assert!(!store.can_undo());
    }

    #[test]
    fn cancel_restores_snapshot() {
        let mut store = ModelStore::new(Model::new("v0"), 50);
        store.begin_transaction();
        store.set(titled("v1"), false);
        assert!(store.cancel_transaction());
        assert_eq!(store.present().title, "v0");
        assert!(!store.can_undo());
        assert!(!store.cancel_transaction());
    }

    #[test]
    fn closure_transaction_cancels_on_error() {
        let mut store = ModelStore::new(Model::new("v0"), 50);
        let result: Result<(), &str> = store.transaction(|store| {
            store.set(titled("v1"), false);
            Err("boom")
        });
        assert_eq!(result, Err("boom"));
        assert_eq!(store.present().title, "v0");

        let result: Result<u8, &str> = store.transaction(|store| {
            store.set(titled("v2"), false);
            store.set(titled("v3"), false);
            Ok(7)
        });
        assert_eq!(result, Ok(7));
        assert_eq!(store.get().past.len(), 1);
    }

    #[test]
    fn clear_history_empties_stacks() {
        let mut store = ModelStore::new(Model::new("v0"), 50);
        store.set(titled("v1"), false);
        store.save_to_history();
        store.clear_history();
        assert!(!store.can_undo());
        assert!(!store.can_redo());
        assert_eq!(store.present().title, "v1");
    }
}
