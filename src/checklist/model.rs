//! The checklist struct, its construction and accessors.

use super::keys::ChecklistKeyMap;
use super::style::ChecklistStyles;
use crate::controller::Controller;
use crate::error::Result;
use crate::layout::RecyclerConfig;
use crate::row::{RowSchema, RowView};
use crate::store::{EntryRecord, Store};
use log::info;

/// Lines taken by the button line above the rows.
pub(super) const HEADER_HEIGHT: usize = 1;
/// Lines taken by the status and help lines below the rows.
pub(super) const FOOTER_HEIGHT: usize = 2;

/// Delivered one loop iteration after `init` to install the row factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FactoryReadyMsg;

/// A scrollable checklist whose rows are recycled row views bound to a store.
///
/// # Examples
///
/// ```
/// use bubbletea_recycler::checklist::{FactoryReadyMsg, Model};
/// use bubbletea_recycler::store::{EntryRecord, Store};
/// use bubbletea_rs::Model as BubbleTeaModel;
///
/// let store = Store::from_records(vec![EntryRecord::new(true, "Right 0")]).unwrap();
/// let mut checklist = Model::new(store, 40, 10);
/// assert!(!checklist.is_ready());
///
/// checklist.update(Box::new(FactoryReadyMsg));
/// assert!(checklist.is_ready());
/// assert_eq!(checklist.controller().recycler().visible_range(), Some((0, 0)));
/// ```
pub struct Model {
    pub(super) controller: Controller,
    pub(super) schema: RowSchema,
    pub(super) cursor: usize,
    pub(super) width: usize,
    pub(super) height: usize,
    pub(super) ready: bool,
    pub(super) show_full_help: bool,
    pub(super) button_text: String,
    pub(super) styles: ChecklistStyles,
    pub(super) keymap: ChecklistKeyMap,
}

impl Model {
    /// Creates a checklist over `store` sized `width` × `height` terminal cells.
    ///
    /// Nothing is bound until [`FactoryReadyMsg`] arrives.
    pub fn new(store: Store, width: usize, height: usize) -> Self {
        let config = RecyclerConfig::default().with_viewport_height(rows_for_height(height));
        Self {
            controller: Controller::new(store, config),
            schema: RowSchema::checklist(),
            cursor: 0,
            width,
            height,
            ready: false,
            show_full_help: false,
            button_text: "Add widget to list".to_string(),
            styles: ChecklistStyles::default(),
            keymap: ChecklistKeyMap::default(),
        }
    }

    /// Two checked rows, "Right 0" and "Right 1".
    pub fn demo_store() -> Store {
        let records = (0..2).map(|i| EntryRecord::new(true, format!("Right {}", i)));
        // two well-formed records cannot fail to load
        Store::from_records(records).unwrap_or_default()
    }

    /// Sets the row schema. Has no effect once rows have been created.
    pub fn with_schema(mut self, schema: RowSchema) -> Self {
        if !self.ready {
            self.schema = schema;
        }
        self
    }

    /// Sets the button text.
    pub fn with_button_text(mut self, text: &str) -> Self {
        self.button_text = text.to_string();
        self
    }

    /// Replaces the styles.
    pub fn with_styles(mut self, styles: ChecklistStyles) -> Self {
        self.styles = styles;
        self
    }

    /// Replaces the key bindings.
    pub fn with_keymap(mut self, keymap: ChecklistKeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// The binding controller behind the list.
    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Index of the row under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the row factory has been installed.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Number of rows in the model.
    pub fn len(&self) -> usize {
        self.controller.len()
    }

    /// Returns true if the model has no rows.
    pub fn is_empty(&self) -> bool {
        self.controller.is_empty()
    }

    /// Installs the row factory and performs the first bind. Runs once.
    pub(super) fn finish_init(&mut self) -> Result<()> {
        if self.ready {
            return Ok(());
        }
        let schema = self.schema;
        self.controller
            .install_factory(move || RowView::new(schema));
        self.ready = true;
        info!("checklist ready with {} rows", self.len());
        self.controller.scroll(|_| {})
    }

    /// Resizes the list and rebinds for the new viewport.
    pub(super) fn set_size(&mut self, width: usize, height: usize) -> Result<()> {
        self.width = width;
        self.height = height;
        let rows = rows_for_height(height);
        self.controller
            .scroll(|layout| layout.set_viewport_height(rows))?;
        self.follow_cursor()
    }

    /// Moves the cursor to `index`, clamped to the model, and scrolls it into view.
    pub(super) fn move_cursor(&mut self, index: usize) -> Result<()> {
        self.cursor = index.min(self.len().saturating_sub(1));
        self.follow_cursor()
    }

    fn follow_cursor(&mut self) -> Result<()> {
        let cursor = self.cursor;
        self.controller
            .scroll(|layout| layout.scroll_to_index(cursor))
    }

    /// Rows that fit on screen at once.
    pub(super) fn page_size(&self) -> usize {
        self.controller.recycler().layout().rows_in_viewport()
    }
}

/// Viewport height left for rows once the header and footer are drawn.
fn rows_for_height(height: usize) -> usize {
    height.saturating_sub(HEADER_HEIGHT + FOOTER_HEIGHT).max(1)
}
