//! The view pool: maps a visible index window onto a bounded set of row views.
//!
//! The recycler owns every [`RowView`] it creates. Views are created lazily
//! through a host-supplied factory, never more than the layout's
//! [capacity](crate::layout::Layout::capacity), and are rebound rather than
//! recreated as the window moves. A model of ten thousand rows shown through a
//! five-row viewport never holds more than seven views.
//!
//! ## Initialization
//!
//! A recycler is not usable until its factory is installed. Asking for a
//! visible range before that fails with [`Error::NotInitialized`], so the
//! order "install factory, then bind" is enforced rather than left to timing.
//!
//! ```rust
//! use bubbletea_recycler::layout::RecyclerConfig;
//! use bubbletea_recycler::recycler::Recycler;
//! use bubbletea_recycler::row::{RowSchema, RowView};
//! use bubbletea_recycler::store::{Entry, Store};
//!
//! let mut store = Store::new();
//! for i in 0..100 {
//!     store.append(Entry::new(false, format!("Row {}", i))).unwrap();
//! }
//!
//! let mut recycler = Recycler::new(RecyclerConfig::default().with_viewport_height(5));
//! assert!(recycler.set_visible_range(0, 4, &store).is_err());
//!
//! recycler.install_factory(|| RowView::new(RowSchema::checklist()));
//! recycler.set_visible_range(0, 4, &store).unwrap();
//! recycler.set_visible_range(50, 54, &store).unwrap();
//!
//! assert_eq!(recycler.instantiated(), 5);
//! assert_eq!(recycler.view_for(52).unwrap().label(), "Row 52");
//! ```

use crate::error::{Error, Result};
use crate::layout::{Layout, RecyclerConfig};
use crate::row::{RowView, UserEdit};
use crate::store::{Field, Store};
use log::{debug, info, trace, warn};
use std::collections::BTreeMap;
use std::fmt;

/// Produces a fresh, unbound row view.
pub type ViewFactory = Box<dyn Fn() -> RowView + Send + Sync>;

/// Pool of row views bound to the visible part of a model.
pub struct Recycler {
    layout: Layout,
    factory: Option<ViewFactory>,
    views: Vec<RowView>,
    /// Bound index to pool slot.
    bound: BTreeMap<usize, usize>,
    /// Window as last bound, after clamping.
    window: Option<(usize, usize)>,
    /// Window as last requested, before clamping.
    requested: Option<(usize, usize)>,
    /// Whether the window was last taken from the layout.
    follows_layout: bool,
}

impl fmt::Debug for Recycler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recycler")
            .field("layout", &self.layout)
            .field("initialized", &self.is_initialized())
            .field("views", &self.views)
            .field("window", &self.window)
            .finish()
    }
}

impl Recycler {
    /// Creates an empty, uninitialized recycler.
    pub fn new(config: RecyclerConfig) -> Self {
        Self {
            layout: Layout::new(config),
            factory: None,
            views: Vec::new(),
            bound: BTreeMap::new(),
            window: None,
            requested: None,
            follows_layout: false,
        }
    }

    /// Installs the view factory, completing initialization.
    ///
    /// Returns false, leaving the current factory in place, once any view has
    /// been created from it.
    pub fn install_factory<F>(&mut self, factory: F) -> bool
    where
        F: Fn() -> RowView + Send + Sync + 'static,
    {
        if !self.views.is_empty() {
            warn!("view factory already in use, replacement ignored");
            return false;
        }
        info!("view factory installed, pool capacity {}", self.layout.capacity());
        self.factory = Some(Box::new(factory));
        true
    }

    /// Returns true once a factory is installed.
    pub fn is_initialized(&self) -> bool {
        self.factory.is_some()
    }

    /// Layout used for extent and capacity.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Mutable layout, for scrolling. Follow with [`Recycler::sync_with_layout`].
    pub fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    /// Number of view instances created so far.
    pub fn instantiated(&self) -> usize {
        self.views.len()
    }

    /// Inclusive window currently bound, if any.
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        self.window
    }

    /// Pool slot displaying `index`.
    pub fn slot_for(&self, index: usize) -> Option<usize> {
        self.bound.get(&index).copied()
    }

    /// View displaying `index`.
    pub fn view_for(&self, index: usize) -> Option<&RowView> {
        self.slot_for(index).map(|slot| &self.views[slot])
    }

    #[cfg(test)]
    pub(crate) fn view_for_mut(&mut self, index: usize) -> Option<&mut RowView> {
        let slot = self.slot_for(index)?;
        self.views.get_mut(slot)
    }

    /// Bound views in index order.
    pub fn bound_views(&self) -> impl Iterator<Item = (usize, &RowView)> {
        self.bound
            .iter()
            .map(move |(&index, &slot)| (index, &self.views[slot]))
    }

    /// Every pooled view, bound or parked.
    pub fn views(&self) -> &[RowView] {
        &self.views
    }

    /// Binds exactly the rows in `first..=last` that exist in `store`.
    ///
    /// Rows already showing an index in the window keep it. Rows outside the
    /// window are rebound to the missing indices before any new view is
    /// created, and whatever is left over is parked unbound. Indices past the
    /// end of the model are clamped away. A window wider than the pool can
    /// hold fails with [`Error::AllocationFailure`] and changes nothing.
    ///
    /// The window is remembered as requested, so rows appended inside it
    /// later are bound by [`Recycler::notify_length_changed`].
    pub fn set_visible_range(&mut self, first: usize, last: usize, store: &Store) -> Result<()> {
        self.apply_range(first, last, store)?;
        self.requested = Some((first, last));
        self.follows_layout = false;
        Ok(())
    }

    /// Binds whatever the layout currently considers visible.
    ///
    /// From then on length changes rebind to the layout's window rather than
    /// to any earlier explicit request.
    pub fn sync_with_layout(&mut self, store: &Store) -> Result<()> {
        if self.factory.is_none() {
            return Err(Error::NotInitialized);
        }
        self.layout.set_length(store.len());
        match self.layout.visible_range() {
            Some((first, last)) => self.apply_range(first, last, store)?,
            None => {
                self.park_all();
                self.window = None;
                self.shrink_to_capacity();
            }
        }
        self.requested = None;
        self.follows_layout = true;
        Ok(())
    }

    fn apply_range(&mut self, first: usize, last: usize, store: &Store) -> Result<()> {
        if self.factory.is_none() {
            return Err(Error::NotInitialized);
        }
        let len = store.len();

        if len == 0 || first >= len || first > last {
            if len > 0 && first >= len {
                warn!("visible range {}..={} lies past {} rows", first, last, len);
            }
            self.layout.set_length(len);
            self.park_all();
            self.window = None;
            self.shrink_to_capacity();
            return Ok(());
        }
        let last = if last >= len {
            warn!("visible range {}..={} clamped to {} rows", first, last, len);
            len - 1
        } else {
            last
        };

        let capacity = self.layout.capacity();
        if last - first + 1 > capacity {
            return Err(Error::AllocationFailure { capacity });
        }
        self.layout.set_length(len);

        let mut free: Vec<usize> = Vec::new();
        for (slot, view) in self.views.iter().enumerate() {
            match view.index() {
                Some(index) if index >= first && index <= last => {}
                Some(index) => {
                    self.bound.remove(&index);
                    free.push(slot);
                }
                None => free.push(slot),
            }
        }
        free.reverse();

        for index in first..=last {
            if self.bound.contains_key(&index) {
                continue;
            }
            let entry = store.get(index)?;
            let slot = match free.pop() {
                Some(slot) => slot,
                None => self.create_view()?,
            };
            debug!("bind slot {} to row {}", slot, index);
            self.views[slot].bind(index, entry);
            self.bound.insert(index, slot);
        }

        for slot in free {
            self.views[slot].unbind();
        }
        self.window = Some((first, last));
        self.shrink_to_capacity();
        Ok(())
    }

    /// Pushes a changed field into the view displaying `index`, if any.
    ///
    /// Indices that are not on screen are ignored.
    pub fn notify_changed(&mut self, index: usize, field: Field, store: &Store) -> Result<()> {
        let Some(slot) = self.slot_for(index) else {
            trace!("row {} not displayed, {:?} change not pushed", index, field);
            return Ok(());
        };
        let entry = store.get(index)?;
        let view = &mut self.views[slot];
        match field {
            Field::Toggled => view.refresh_toggled(entry.toggled),
            Field::Label => view.refresh_label(&entry.label),
            Field::LeftLabel => view.refresh_left_label(entry.left_label.as_deref()),
        }
    }

    /// Tells the recycler the model has grown.
    ///
    /// When the window comes from the layout, the layout's new window is
    /// bound. When it was set explicitly and cut short by the old length, the
    /// request is re-applied, capped at the pool capacity. Either way rows
    /// that now fall inside the window are displayed.
    pub fn notify_length_changed(&mut self, len: usize, store: &Store) -> Result<()> {
        self.layout.set_length(len);
        if self.factory.is_none() {
            return Ok(());
        }
        if self.follows_layout {
            return self.sync_with_layout(store);
        }
        let Some((first, last)) = self.requested else {
            return Ok(());
        };
        let shown_last = self.window.map(|(_, shown)| shown);
        if shown_last.map_or(true, |shown| shown < last) {
            let last = last.min(first.saturating_add(self.layout.capacity() - 1));
            self.apply_range(first, last, store)?;
        }
        Ok(())
    }

    /// Re-reads every bound view from the model, parking views whose index no
    /// longer exists. Used after the model was replaced wholesale.
    pub fn refresh_all(&mut self, store: &Store) -> Result<()> {
        let len = store.len();
        self.layout.set_length(len);
        let stale: Vec<usize> = self.bound.range(len..).map(|(&index, _)| index).collect();
        for index in stale {
            if let Some(slot) = self.bound.remove(&index) {
                self.views[slot].unbind();
            }
        }
        for (&index, &slot) in &self.bound {
            self.views[slot].bind(index, store.get(index)?);
        }
        self.window = match (self.bound.keys().next(), self.bound.keys().next_back()) {
            (Some(&first), Some(&last)) => Some((first, last)),
            _ => None,
        };
        Ok(())
    }

    /// Checks that `edit` came from a view bound to the index it reports.
    pub fn validate_edit(&self, edit: &UserEdit) -> Result<()> {
        let bound = self.views.get(edit.slot).and_then(RowView::index);
        if bound != Some(edit.index) {
            return Err(Error::MisroutedEdit {
                slot: edit.slot,
                reported: edit.index,
                bound,
            });
        }
        Ok(())
    }

    /// Clicks the toggle of the view displaying `index`.
    ///
    /// Returns `Ok(None)` if that index is not on screen or the click did not
    /// change anything.
    pub fn press(&mut self, index: usize) -> Result<Option<UserEdit>> {
        match self.slot_for(index) {
            Some(slot) => self.views[slot].press(),
            None => Ok(None),
        }
    }

    fn create_view(&mut self) -> Result<usize> {
        let capacity = self.layout.capacity();
        if self.views.len() >= capacity {
            return Err(Error::AllocationFailure { capacity });
        }
        let factory = self.factory.as_ref().ok_or(Error::NotInitialized)?;
        let slot = self.views.len();
        let mut view = factory();
        view.set_slot(slot);
        self.views.push(view);
        debug!("created view {} of {}", slot + 1, capacity);
        Ok(slot)
    }

    /// Re-reads the row in `slot` from the model, discarding anything its
    /// controls show that the model does not hold. Parked slots are left alone.
    pub fn rebind_slot(&mut self, slot: usize, store: &Store) -> Result<()> {
        let Some(view) = self.views.get_mut(slot) else {
            return Ok(());
        };
        if let Some(index) = view.index() {
            debug!("rebind slot {} to row {} from the model", slot, index);
            view.bind(index, store.get(index)?);
        }
        Ok(())
    }

    /// Drops parked views past the layout's capacity, moving any bound view
    /// out of those slots first. The pool shrinks after the viewport does.
    fn shrink_to_capacity(&mut self) {
        let capacity = self.layout.capacity();
        if self.views.len() <= capacity {
            return;
        }
        let mut parked: Vec<usize> = (0..capacity)
            .filter(|&slot| !self.views[slot].is_bound())
            .collect();
        for slot in capacity..self.views.len() {
            let Some(index) = self.views[slot].index() else {
                continue;
            };
            let Some(target) = parked.pop() else {
                break;
            };
            self.views.swap(slot, target);
            self.views[target].set_slot(target);
            self.views[slot].set_slot(slot);
            self.bound.insert(index, target);
        }
        while self.views.len() > capacity && self.views.last().is_some_and(|v| !v.is_bound()) {
            self.views.pop();
        }
        debug!("pool shrunk to {} views (capacity {})", self.views.len(), capacity);
    }

    fn park_all(&mut self) {
        for (_, slot) in std::mem::take(&mut self.bound) {
            self.views[slot].unbind();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::row::RowSchema;
    use crate::store::Entry;

    fn store_of(len: usize) -> Store {
        let mut store = Store::new();
        for i in 0..len {
            store
                .append(Entry::new(i % 2 == 0, format!("Right {}", i)))
                .unwrap();
        }
        store
    }

    fn ready(viewport_height: usize) -> Recycler {
        let mut recycler = Recycler::new(
            RecyclerConfig::default()
                .with_viewport_height(viewport_height)
                .with_overscan(1),
        );
        recycler.install_factory(|| RowView::new(RowSchema::checklist()));
        recycler
    }

    fn assert_window_matches(recycler: &Recycler, store: &Store, first: usize, last: usize) {
        for index in first..=last {
            let view = recycler.view_for(index).expect("index should be bound");
            let entry = store.get(index).unwrap();
            assert_eq!(view.index(), Some(index));
            assert_eq!(view.toggle().is_active(), entry.toggled);
            assert_eq!(view.label(), entry.label);
        }
        let bound: Vec<usize> = recycler.bound_views().map(|(i, _)| i).collect();
        assert_eq!(bound, (first..=last).collect::<Vec<_>>());
    }

    #[test]
    fn test_requires_factory_first() {
        let store = store_of(3);
        let mut recycler = Recycler::new(RecyclerConfig::default());
        assert!(!recycler.is_initialized());
        assert!(matches!(
            recycler.set_visible_range(0, 2, &store),
            Err(Error::NotInitialized)
        ));
        assert_eq!(recycler.instantiated(), 0);
    }

    #[test]
    fn test_factory_is_fixed_once_used() {
        let store = store_of(3);
        let mut recycler = ready(5);
        assert!(recycler.install_factory(|| RowView::new(RowSchema::checklist())));
        recycler.set_visible_range(0, 2, &store).unwrap();
        assert!(!recycler.install_factory(|| RowView::new(RowSchema::label_only())));
        assert_eq!(recycler.views()[0].schema(), RowSchema::checklist());
    }

    #[test]
    fn test_bind_correctness() {
        let store = store_of(20);
        let mut recycler = ready(5);
        recycler.set_visible_range(3, 8, &store).unwrap();
        assert_window_matches(&recycler, &store, 3, 8);
        recycler.set_visible_range(6, 11, &store).unwrap();
        assert_window_matches(&recycler, &store, 6, 11);
        assert_eq!(recycler.visible_range(), Some((6, 11)));
    }

    #[test]
    fn test_scrolling_reuses_views() {
        let store = store_of(100);
        let mut recycler = ready(5);
        recycler.set_visible_range(0, 4, &store).unwrap();
        assert_eq!(recycler.instantiated(), 5);
        recycler.set_visible_range(2, 6, &store).unwrap();
        assert_eq!(recycler.instantiated(), 5);
        // rows still in the window stay in their slot
        assert_eq!(recycler.slot_for(3), Some(3));
        recycler.set_visible_range(90, 94, &store).unwrap();
        assert_eq!(recycler.instantiated(), 5);
        assert_window_matches(&recycler, &store, 90, 94);
    }

    #[test]
    fn test_recycling_bound_for_long_model() {
        let store = store_of(10_000);
        let mut recycler = ready(5);
        let mut offset = 0;
        while offset < 10_000 {
            recycler.layout_mut().set_offset(offset);
            recycler.sync_with_layout(&store).unwrap();
            assert!(recycler.instantiated() <= 7);
            offset += 37;
        }
        recycler.layout_mut().goto_bottom();
        recycler.sync_with_layout(&store).unwrap();
        assert_eq!(recycler.visible_range(), Some((9_995, 9_999)));
        assert!(recycler.instantiated() <= 7);
    }

    #[test]
    fn test_range_past_end_is_clamped() {
        let store = store_of(2);
        let mut recycler = ready(5);
        recycler.set_visible_range(0, 10, &store).unwrap();
        assert_eq!(recycler.visible_range(), Some((0, 1)));
        assert_eq!(recycler.instantiated(), 2);

        recycler.set_visible_range(5, 9, &store).unwrap();
        assert_eq!(recycler.visible_range(), None);
        assert_eq!(recycler.bound_views().count(), 0);
    }

    #[test]
    fn test_window_wider_than_pool_fails_cleanly() {
        let store = store_of(100);
        let mut recycler = ready(5);
        recycler.set_visible_range(0, 4, &store).unwrap();
        let err = recycler.set_visible_range(0, 50, &store).unwrap_err();
        assert!(matches!(err, Error::AllocationFailure { capacity: 7 }));
        assert_window_matches(&recycler, &store, 0, 4);
    }

    #[test]
    fn test_shrinking_window_parks_views() {
        let store = store_of(10);
        let mut recycler = ready(5);
        recycler.set_visible_range(0, 4, &store).unwrap();
        recycler.set_visible_range(0, 1, &store).unwrap();
        assert_eq!(recycler.instantiated(), 5);
        assert_eq!(recycler.views().iter().filter(|v| v.is_bound()).count(), 2);
    }

    #[test]
    fn test_notify_changed_pushes_into_bound_view() {
        let mut store = store_of(10);
        let mut recycler = ready(5);
        recycler.set_visible_range(0, 4, &store).unwrap();
        let change = store.set_label(2, "Renamed").unwrap().unwrap();
        recycler
            .notify_changed(change.index, change.field, &store)
            .unwrap();
        assert_eq!(recycler.view_for(2).unwrap().label(), "Renamed");
    }

    #[test]
    fn test_notify_changed_for_hidden_index_is_noop() {
        let mut store = store_of(10);
        let mut recycler = ready(5);
        recycler.set_visible_range(0, 4, &store).unwrap();
        let before: Vec<String> = recycler.views().iter().map(|v| v.label().to_string()).collect();
        let change = store.set_toggled(7, true).unwrap().unwrap();
        recycler
            .notify_changed(change.index, change.field, &store)
            .unwrap();
        recycler.notify_changed(500, Field::Label, &store).unwrap();
        let after: Vec<String> = recycler.views().iter().map(|v| v.label().to_string()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_append_shows_up_in_clamped_window() {
        let mut store = store_of(2);
        let mut recycler = ready(5);
        recycler.set_visible_range(0, 4, &store).unwrap();
        assert_eq!(recycler.visible_range(), Some((0, 1)));
        store.append(Entry::new(false, "Added Right 2")).unwrap();
        recycler.notify_length_changed(store.len(), &store).unwrap();
        assert_eq!(recycler.visible_range(), Some((0, 2)));
        assert_eq!(recycler.view_for(2).unwrap().label(), "Added Right 2");
    }

    #[test]
    fn test_append_shows_up_in_layout_window() {
        let mut store = store_of(2);
        let mut recycler = ready(5);
        recycler.sync_with_layout(&store).unwrap();
        assert_eq!(recycler.visible_range(), Some((0, 1)));
        store.append(Entry::new(false, "Added Right 2")).unwrap();
        recycler.notify_length_changed(store.len(), &store).unwrap();
        assert_eq!(recycler.visible_range(), Some((0, 2)));
        assert_eq!(recycler.view_for(2).unwrap().label(), "Added Right 2");
    }

    #[test]
    fn test_refused_window_is_not_remembered() {
        let mut store = store_of(100);
        let mut recycler = ready(5);
        recycler.set_visible_range(10, 14, &store).unwrap();
        assert!(recycler.set_visible_range(0, 50, &store).is_err());
        assert_eq!(recycler.visible_range(), Some((10, 14)));

        store.append(Entry::new(false, "Added Right 100")).unwrap();
        recycler.notify_length_changed(store.len(), &store).unwrap();
        assert_window_matches(&recycler, &store, 10, 14);
    }

    #[test]
    fn test_pool_shrinks_with_viewport() {
        let store = store_of(100);
        let mut recycler = ready(10);
        recycler.sync_with_layout(&store).unwrap();
        assert_eq!(recycler.instantiated(), 11);

        // rows 8..=10 keep the high slots they were first bound to
        recycler.layout_mut().set_offset(8);
        recycler.sync_with_layout(&store).unwrap();
        assert_eq!(recycler.slot_for(10), Some(10));

        recycler.layout_mut().set_viewport_height(3);
        recycler.sync_with_layout(&store).unwrap();
        let capacity = recycler.layout().capacity();
        assert_eq!(capacity, 5);
        assert!(recycler.instantiated() <= capacity);
        assert_window_matches(&recycler, &store, 8, 11);
        for (index, view) in recycler.bound_views() {
            assert!(view.slot() < capacity);
            assert_eq!(recycler.slot_for(index), Some(view.slot()));
        }
    }

    #[test]
    fn test_rebind_slot_restores_model_value() {
        let store = store_of(10);
        let mut recycler = ready(5);
        recycler.set_visible_range(0, 4, &store).unwrap();
        let edit = recycler.press(2).unwrap().unwrap();
        assert_ne!(
            recycler.view_for(2).unwrap().toggle().is_active(),
            store.get(2).unwrap().toggled
        );

        recycler.rebind_slot(edit.slot, &store).unwrap();
        assert_window_matches(&recycler, &store, 0, 4);
        // the row is back in step with the model, so the same click emits again
        assert!(recycler.press(2).unwrap().is_some());
        recycler.rebind_slot(99, &store).unwrap();
    }

    #[test]
    fn test_refresh_all_after_reload() {
        let store = store_of(10);
        let mut recycler = ready(5);
        recycler.set_visible_range(0, 4, &store).unwrap();
        let replacement = Store::from_json(
            r#"[{"toggled": true, "label": "a"}, {"toggled": true, "label": "b"}]"#,
        )
        .unwrap();
        recycler.refresh_all(&replacement).unwrap();
        assert_eq!(recycler.visible_range(), Some((0, 1)));
        assert_window_matches(&recycler, &replacement, 0, 1);
    }

    #[test]
    fn test_validate_edit_catches_misrouting() {
        let store = store_of(10);
        let mut recycler = ready(5);
        recycler.set_visible_range(0, 4, &store).unwrap();
        let edit = recycler.press(3).unwrap().unwrap();
        assert!(recycler.validate_edit(&edit).is_ok());

        let forged = UserEdit {
            slot: edit.slot,
            index: 4,
            value: true,
        };
        assert!(matches!(
            recycler.validate_edit(&forged),
            Err(Error::MisroutedEdit {
                reported: 4,
                bound: Some(3),
                ..
            })
        ));
        let missing = UserEdit {
            slot: 99,
            index: 0,
            value: true,
        };
        assert!(matches!(
            recycler.validate_edit(&missing),
            Err(Error::MisroutedEdit { bound: None, .. })
        ));
    }

    #[test]
    fn test_press_on_hidden_index_does_nothing() {
        let store = store_of(10);
        let mut recycler = ready(5);
        recycler.set_visible_range(0, 4, &store).unwrap();
        assert_eq!(recycler.press(9).unwrap(), None);
    }
}
