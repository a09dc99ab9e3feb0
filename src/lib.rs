#![warn(missing_docs)]

//! # bubbletea-recycler
//!
//! A virtualized, recycling checklist for [bubbletea-rs](https://github.com/joshka/bubbletea-rs).
//!
//! A fixed pool of row views is mapped onto an arbitrarily long list of
//! entries. Each row shows a toggle and a label, and toggle state is kept in
//! sync both ways: a click on a row lands in the model, and a programmatic
//! write to the model lands in whichever row currently shows that entry,
//! without either direction echoing back into the other.
//!
//! ## Components
//!
//! | Module | Role |
//! |--------|------|
//! | [`store`] | Ordered, append-only model; no-op writes emit no change |
//! | [`row`] | Row view bound to at most one index; display writes vs. user input |
//! | [`layout`] | Extent, scroll offset, visible range and pool capacity |
//! | [`recycler`] | Pool of row views rebound as the visible window moves |
//! | [`controller`] | Routes user edits into the store and changes into the pool |
//! | [`checklist`] | bubbletea-rs component hosting all of the above |
//! | [`key`] | Key bindings and help text |
//!
//! ## Data flow
//!
//! ```text
//! key press ─► RowView::press ─► UserEdit ─► Controller::handle_user_edit
//!                                                  │
//!                                     Store::set_toggled ─► Some(Change)
//!                                                  │
//!                          Recycler::notify_changed ─► RowView::refresh_toggled
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use bubbletea_recycler::prelude::*;
//!
//! let mut store = Store::new();
//! for i in 0..10_000 {
//!     store.append(Entry::new(false, format!("Row {}", i))).unwrap();
//! }
//!
//! let mut controller = Controller::new(store, RecyclerConfig::default().with_viewport_height(5));
//! controller.install_factory(|| RowView::new(RowSchema::checklist()));
//! controller.scroll(|layout| layout.scroll_to_index(5_000)).unwrap();
//!
//! assert!(controller.recycler().instantiated() <= 7);
//! assert!(controller.press_toggle(5_000).unwrap());
//! assert!(controller.store().get(5_000).unwrap().toggled);
//! ```
//!
//! Inside a bubbletea-rs program, use [`checklist::Model`] directly; see the
//! `demos/checklist` program.

pub mod checklist;
pub mod controller;
pub mod error;
pub mod key;
pub mod layout;
pub mod recycler;
pub mod row;
pub mod store;

pub use error::{Error, Result};

/// Commonly used types.
pub mod prelude {
    pub use crate::checklist::{
        ChecklistKeyMap, ChecklistStyles, FactoryReadyMsg, Model as Checklist,
    };
    pub use crate::controller::Controller;
    pub use crate::error::{Error, Result};
    pub use crate::key::{Binding, KeyMap};
    pub use crate::layout::{Layout, RecyclerConfig};
    pub use crate::recycler::Recycler;
    pub use crate::row::{BindState, RowSchema, RowView, UserEdit};
    pub use crate::store::{Change, Entry, EntryRecord, Field, Store};
}
