//! Row views: the reusable visual unit that displays one entry at a time.
//!
//! A [`RowView`] is either unbound or bound to exactly one model index. It
//! keeps only the index and what its controls currently show; the entry itself
//! stays in the [`Store`](crate::store::Store), and every bind or refresh
//! re-reads it from there.
//!
//! Display writes and user input are separate entry points. [`RowView::bind`],
//! [`RowView::refresh_toggled`] and [`RowView::refresh_label`] only update
//! what the row shows and return nothing to route. [`RowView::press`] and
//! [`RowView::on_user_toggle`] model the toggle control's interaction event and
//! are the only way a row produces a [`UserEdit`].
//!
//! ```rust
//! use bubbletea_recycler::row::{RowSchema, RowView};
//! use bubbletea_recycler::store::Entry;
//!
//! let mut row = RowView::new(RowSchema::checklist());
//! row.bind(4, &Entry::new(false, "Right 4"));
//!
//! let edit = row.press().unwrap().unwrap();
//! assert_eq!((edit.index, edit.value), (4, true));
//!
//! // the refresh that follows the model write is display-only
//! row.refresh_toggled(true).unwrap();
//! assert_eq!(row.on_user_toggle().unwrap(), None);
//! ```

use crate::error::{Error, Result};
use crate::store::Entry;
use serde::Deserialize;

/// Which controls a row renders.
///
/// One row type serves every layout; the schema decides which controls are
/// shown and whether toggle presses are honoured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RowSchema {
    /// Render a toggle and route its presses.
    pub toggle: bool,
    /// Render the label.
    pub label: bool,
    /// Render the left label before the label.
    pub left_label: bool,
}

impl Default for RowSchema {
    fn default() -> Self {
        Self::checklist()
    }
}

impl RowSchema {
    /// Toggle plus label.
    pub fn checklist() -> Self {
        Self {
            toggle: true,
            label: true,
            left_label: false,
        }
    }

    /// Label only; presses are ignored.
    pub fn label_only() -> Self {
        Self {
            toggle: false,
            label: true,
            left_label: false,
        }
    }

    /// Left and right labels side by side, no toggle.
    pub fn two_labels() -> Self {
        Self {
            toggle: false,
            label: true,
            left_label: true,
        }
    }
}

/// Binding state of a row view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindState {
    /// Not representing any entry.
    #[default]
    Unbound,
    /// Representing the entry at this index.
    Bound(usize),
}

/// Checkbox-like control embedded in a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Toggle {
    active: bool,
}

impl Toggle {
    /// Whether the control is currently shown as on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Display write: shows `active` without counting as interaction.
    pub fn set_active(&mut self, active: bool) {
        self.active = active;
    }

    /// Interaction: flips the visual state, as a click would.
    fn press(&mut self) {
        self.active = !self.active;
    }
}

/// An edit a user made through a row's toggle, addressed to the binding controller.
#[must_use = "a user edit must be handed to the binding controller"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserEdit {
    /// Pool slot of the row that produced the edit.
    pub slot: usize,
    /// Index the row reported itself bound to.
    pub index: usize,
    /// New toggle value.
    pub value: bool,
}

/// A pooled row view.
#[derive(Debug, Clone)]
pub struct RowView {
    schema: RowSchema,
    slot: usize,
    state: BindState,
    toggle: Toggle,
    /// Toggle value last pushed from, or sent to, the model.
    bound_toggled: bool,
    label: String,
    left_label: String,
}

impl Default for RowView {
    fn default() -> Self {
        Self::new(RowSchema::default())
    }
}

impl RowView {
    /// Creates an unbound row with the given schema.
    pub fn new(schema: RowSchema) -> Self {
        Self {
            schema,
            slot: 0,
            state: BindState::Unbound,
            toggle: Toggle::default(),
            bound_toggled: false,
            label: String::new(),
            left_label: String::new(),
        }
    }

    /// The row's schema.
    pub fn schema(&self) -> RowSchema {
        self.schema
    }

    /// Position of this row in its recycler's pool.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub(crate) fn set_slot(&mut self, slot: usize) {
        self.slot = slot;
    }

    /// Current binding state.
    pub fn state(&self) -> BindState {
        self.state
    }

    /// Bound index, if any.
    pub fn index(&self) -> Option<usize> {
        match self.state {
            BindState::Bound(index) => Some(index),
            BindState::Unbound => None,
        }
    }

    /// Returns true while the row represents an entry.
    pub fn is_bound(&self) -> bool {
        self.index().is_some()
    }

    /// The embedded toggle control.
    pub fn toggle(&self) -> &Toggle {
        &self.toggle
    }

    /// Text currently shown by the label control.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Text currently shown by the left label control; empty when the entry
    /// has none.
    pub fn left_label(&self) -> &str {
        &self.left_label
    }

    /// Binds the row to `index` and shows `entry`, discarding whatever it
    /// displayed before. Rebinding a bound row goes straight to the new index.
    pub fn bind(&mut self, index: usize, entry: &Entry) {
        self.state = BindState::Bound(index);
        self.toggle.set_active(entry.toggled);
        self.bound_toggled = entry.toggled;
        self.label.clone_from(&entry.label);
        self.left_label.clear();
        if let Some(left) = &entry.left_label {
            self.left_label.push_str(left);
        }
    }

    /// Parks the row. Only the recycler does this, when a row leaves the window.
    pub(crate) fn unbind(&mut self) {
        self.state = BindState::Unbound;
        self.toggle.set_active(false);
        self.bound_toggled = false;
        self.label.clear();
        self.left_label.clear();
    }

    /// Shows a new toggle value pushed from the model.
    pub fn refresh_toggled(&mut self, value: bool) -> Result<()> {
        if !self.is_bound() {
            return Err(Error::Unbound);
        }
        self.toggle.set_active(value);
        self.bound_toggled = value;
        Ok(())
    }

    /// Shows a new label pushed from the model.
    pub fn refresh_label(&mut self, value: &str) -> Result<()> {
        if !self.is_bound() {
            return Err(Error::Unbound);
        }
        self.label.clear();
        self.label.push_str(value);
        Ok(())
    }

    /// Shows a new left label pushed from the model.
    pub fn refresh_left_label(&mut self, value: Option<&str>) -> Result<()> {
        if !self.is_bound() {
            return Err(Error::Unbound);
        }
        self.left_label.clear();
        self.left_label.push_str(value.unwrap_or_default());
        Ok(())
    }

    /// Simulates a click on the toggle control.
    ///
    /// Rows without a toggle ignore the click. Otherwise the control flips and
    /// its interaction event runs, see [`RowView::on_user_toggle`].
    pub fn press(&mut self) -> Result<Option<UserEdit>> {
        if !self.is_bound() {
            return Err(Error::Unbound);
        }
        if !self.schema.toggle {
            return Ok(None);
        }
        self.toggle.press();
        self.on_user_toggle()
    }

    /// Interaction event of the toggle control.
    ///
    /// Emits an edit only when the control's visual state differs from the
    /// last value exchanged with the model.
    pub fn on_user_toggle(&mut self) -> Result<Option<UserEdit>> {
        let index = self.index().ok_or(Error::Unbound)?;
        if !self.schema.toggle {
            return Ok(None);
        }
        let value = self.toggle.is_active();
        if value == self.bound_toggled {
            return Ok(None);
        }
        self.bound_toggled = value;
        Ok(Some(UserEdit {
            slot: self.slot,
            index,
            value,
        }))
    }
}
