//! The binding controller: the single router between user edits and model
//! refreshes.
//!
//! The controller owns the [`Store`] and the [`Recycler`]. Outside code only
//! gets shared references to them, so every model write goes through here and
//! every change notification reaches the recycler before the writing call
//! returns.
//!
//! Loop prevention is not done here. The store drops writes that change
//! nothing, and a row drops toggle events that match what it last exchanged
//! with the model. The controller just forwards.
//!
//! ```rust
//! use bubbletea_recycler::controller::Controller;
//! use bubbletea_recycler::layout::RecyclerConfig;
//! use bubbletea_recycler::row::{RowSchema, RowView};
//! use bubbletea_recycler::store::{EntryRecord, Store};
//!
//! let store = Store::from_records(vec![
//!     EntryRecord::new(true, "Right 0"),
//!     EntryRecord::new(true, "Right 1"),
//! ])
//! .unwrap();
//! let mut controller = Controller::new(store, RecyclerConfig::default());
//! controller.install_factory(|| RowView::new(RowSchema::checklist()));
//! controller.set_visible_range(0, 1).unwrap();
//!
//! // a click on row 1 lands in the model
//! assert!(controller.press_toggle(1).unwrap());
//! assert!(!controller.store().get(1).unwrap().toggled);
//!
//! // a programmatic write lands in the row
//! controller.set_toggled(0, false).unwrap();
//! assert!(!controller.recycler().view_for(0).unwrap().toggle().is_active());
//! ```

use crate::error::Result;
use crate::layout::{Layout, RecyclerConfig};
use crate::recycler::Recycler;
use crate::row::{RowView, UserEdit};
use crate::store::{Change, Entry, EntryRecord, Store};
use log::{info, warn};

/// Routes edits between the store and the recycler.
#[derive(Debug)]
pub struct Controller {
    store: Store,
    recycler: Recycler,
}

impl Controller {
    /// Wraps a seeded store. The recycler still needs a factory before it
    /// can bind anything.
    pub fn new(store: Store, config: RecyclerConfig) -> Self {
        let mut recycler = Recycler::new(config);
        recycler.layout_mut().set_length(store.len());
        Self { store, recycler }
    }

    /// The model.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// The view pool.
    pub fn recycler(&self) -> &Recycler {
        &self.recycler
    }

    /// Number of rows in the model.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if the model is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of rows whose toggle is on.
    pub fn toggled_count(&self) -> usize {
        self.store.toggled_count()
    }

    /// Installs the recycler's view factory. See [`Recycler::install_factory`].
    pub fn install_factory<F>(&mut self, factory: F) -> bool
    where
        F: Fn() -> RowView + Send + Sync + 'static,
    {
        self.recycler.install_factory(factory)
    }

    /// Binds `first..=last`. See [`Recycler::set_visible_range`].
    pub fn set_visible_range(&mut self, first: usize, last: usize) -> Result<()> {
        self.recycler.set_visible_range(first, last, &self.store)
    }

    /// Adjusts the layout with `f`, then binds whatever it now shows.
    ///
    /// Before the factory is installed only the layout changes; the first
    /// bind happens once the recycler is initialized.
    pub fn scroll<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Layout),
    {
        f(self.recycler.layout_mut());
        if !self.recycler.is_initialized() {
            return Ok(());
        }
        self.recycler.sync_with_layout(&self.store)
    }

    /// Routes a user edit from a row into the model.
    ///
    /// The edit must come from a view that is bound to the index it reports.
    /// Returns whether the model changed.
    ///
    /// A rejected edit leaves the row that produced it showing the model's
    /// value again, not the one it tried to send.
    pub fn handle_user_edit(&mut self, edit: UserEdit) -> Result<bool> {
        let applied = self
            .recycler
            .validate_edit(&edit)
            .and_then(|()| self.store.set_toggled(edit.index, edit.value));
        match applied {
            Ok(Some(change)) => {
                self.handle_model_change(change)?;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(err) => {
                warn!("edit from slot {} rejected: {}", edit.slot, err);
                self.recycler.rebind_slot(edit.slot, &self.store)?;
                Err(err)
            }
        }
    }

    /// Forwards a store change to whichever view displays it.
    pub fn handle_model_change(&mut self, change: Change) -> Result<()> {
        self.recycler
            .notify_changed(change.index, change.field, &self.store)
    }

    /// Clicks the toggle of the row displaying `index`, as a user would.
    ///
    /// Returns whether the model changed; false when `index` is not on screen.
    pub fn press_toggle(&mut self, index: usize) -> Result<bool> {
        match self.recycler.press(index)? {
            Some(edit) => self.handle_user_edit(edit),
            None => Ok(false),
        }
    }

    /// Programmatic toggle write. Returns whether the model changed.
    pub fn set_toggled(&mut self, index: usize, value: bool) -> Result<bool> {
        match self.store.set_toggled(index, value)? {
            Some(change) => {
                self.handle_model_change(change)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Programmatic label write. Returns whether the model changed.
    pub fn set_label(&mut self, index: usize, value: &str) -> Result<bool> {
        match self.store.set_label(index, value)? {
            Some(change) => {
                self.handle_model_change(change)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Programmatic left label write; `None` removes it. Returns whether the
    /// model changed.
    pub fn set_left_label(&mut self, index: usize, value: Option<&str>) -> Result<bool> {
        match self.store.set_left_label(index, value)? {
            Some(change) => {
                self.handle_model_change(change)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Appends a row and returns its index.
    pub fn append(&mut self, toggled: bool, label: impl Into<String>) -> Result<usize> {
        self.append_entry(Entry::new(toggled, label))
    }

    /// Appends a fully built entry and returns its index. Rows that land
    /// inside the current window are bound before this returns.
    pub fn append_entry(&mut self, entry: Entry) -> Result<usize> {
        let index = self.store.append(entry)?;
        info!("row {} added", index);
        self.recycler
            .notify_length_changed(self.store.len(), &self.store)?;
        Ok(index)
    }

    /// Appends an unchecked row labelled after its index.
    pub fn append_generated(&mut self) -> Result<usize> {
        let label = format!("Added Right {}", self.store.len());
        self.append(false, label)
    }

    /// Appends an unchecked row carrying both a left and a right label.
    pub fn append_generated_pair(&mut self) -> Result<usize> {
        let index = self.store.len();
        let entry = Entry::new(false, format!("Added Right {}", index))
            .with_left_label(format!("Added Left {}", index));
        self.append_entry(entry)
    }

    /// Replaces the whole model from a JSON payload. See [`Controller::seed`].
    pub fn load_json(&mut self, json: &str) -> Result<()> {
        let records: Vec<EntryRecord> = serde_json::from_str(json)?;
        self.seed(records)
    }

    /// Replaces the whole model with `records`, keeping the view pool and
    /// refreshing every bound row from the new contents.
    ///
    /// Records are validated before anything is replaced; a bad index leaves
    /// the current model in place.
    pub fn seed(&mut self, records: impl IntoIterator<Item = EntryRecord>) -> Result<()> {
        self.store = Store::from_records(records)?;
        info!("model reloaded with {} rows", self.store.len());
        self.recycler.refresh_all(&self.store)?;
        if self.recycler.is_initialized() {
            self.recycler
                .notify_length_changed(self.store.len(), &self.store)?;
        }
        Ok(())
    }
}
