//! Checklist component: a recycled, scrollable list of toggle + label rows.
//!
//! This is the host side of the recycler. It supplies the viewport (the
//! layout's scroll offset follows the cursor), the container (the recycler's
//! pool is what gets drawn) and the toggle events (key presses become clicks
//! on the row under the cursor).
//!
//! ## Lifecycle
//!
//! 1. [`Model::new`] wraps a seeded store. No row views exist yet.
//! 2. `init` returns a command that delivers [`FactoryReadyMsg`] on the next
//!    loop iteration. Handling it installs the row factory and binds the
//!    first window. Key input before that is ignored.
//! 3. From then on every edit, scroll and append goes through the
//!    [`Controller`](crate::controller::Controller).
//!
//! ## Example
//!
//! ```
//! use bubbletea_recycler::checklist::{FactoryReadyMsg, Model};
//! use bubbletea_rs::{KeyMsg, Model as BubbleTeaModel};
//! use crossterm::event::{KeyCode, KeyModifiers};
//!
//! let mut checklist = Model::new(Model::demo_store(), 40, 10);
//! checklist.update(Box::new(FactoryReadyMsg));
//!
//! // space toggles the row under the cursor
//! checklist.update(Box::new(KeyMsg { key: KeyCode::Char(' '), modifiers: KeyModifiers::NONE }));
//! assert!(!checklist.controller().store().get(0).unwrap().toggled);
//!
//! // "a" appends a row
//! checklist.update(Box::new(KeyMsg { key: KeyCode::Char('a'), modifiers: KeyModifiers::NONE }));
//! assert_eq!(checklist.len(), 3);
//! ```

mod keys;
mod model;
mod rendering;
mod style;

pub use keys::ChecklistKeyMap;
pub use model::{FactoryReadyMsg, Model};
pub use style::{ChecklistStyles, BULLET, ELLIPSIS};

use crate::error::Result;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use log::{error, info};
use std::time::Duration;

impl Model {
    /// Command that completes initialization on the next loop iteration.
    pub fn init_cmd() -> Cmd {
        bubbletea_tick(Duration::from_nanos(1), |_| Box::new(FactoryReadyMsg) as Msg)
    }

    fn handle_key(&mut self, key_msg: &KeyMsg) -> Result<Option<Cmd>> {
        if self.keymap.quit.matches(key_msg) {
            return Ok(Some(bubbletea_rs::quit()));
        }
        if !self.ready {
            return Ok(None);
        }

        if self.keymap.cursor_up.matches(key_msg) {
            self.move_cursor(self.cursor.saturating_sub(1))?;
        } else if self.keymap.cursor_down.matches(key_msg) {
            self.move_cursor(self.cursor + 1)?;
        } else if self.keymap.prev_page.matches(key_msg) {
            self.move_cursor(self.cursor.saturating_sub(self.page_size()))?;
        } else if self.keymap.next_page.matches(key_msg) {
            self.move_cursor(self.cursor + self.page_size())?;
        } else if self.keymap.go_to_start.matches(key_msg) {
            self.move_cursor(0)?;
        } else if self.keymap.go_to_end.matches(key_msg) {
            self.move_cursor(self.len().saturating_sub(1))?;
        } else if self.keymap.toggle.matches(key_msg) {
            self.press_row()?;
        } else if self.keymap.add.matches(key_msg) {
            if self.schema.left_label {
                self.controller.append_generated_pair()?;
            } else {
                self.controller.append_generated()?;
            }
        } else if self.keymap.dump.matches(key_msg) {
            let json = self.controller.store().dump()?;
            info!("dumped {} rows ({} bytes)", self.len(), json.len());
        } else if self.keymap.show_full_help.matches(key_msg) {
            self.show_full_help = !self.show_full_help;
        }
        Ok(None)
    }

    /// Toggles the row under the cursor; rows without a toggle just report
    /// the press.
    fn press_row(&mut self) -> Result<()> {
        if self.schema.toggle {
            if !self.is_empty() {
                self.controller.press_toggle(self.cursor)?;
            }
        } else if let Some(view) = self.controller.recycler().view_for(self.cursor) {
            info!("{} pressed", view.label());
        }
        Ok(())
    }
}

impl BubbleTeaModel for Model {
    /// Seeds the two demo rows and schedules the factory installation.
    fn init() -> (Self, Option<Cmd>) {
        let model = Self::new(Self::demo_store(), 80, 24);
        (model, Some(Self::init_cmd()))
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        let result = if msg.downcast_ref::<FactoryReadyMsg>().is_some() {
            self.finish_init().map(|_| None)
        } else if let Some(size) = msg.downcast_ref::<bubbletea_rs::WindowSizeMsg>() {
            self.set_size(size.width as usize, size.height as usize)
                .map(|_| None)
        } else if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            self.handle_key(key_msg)
        } else {
            Ok(None)
        };

        match result {
            Ok(cmd) => cmd,
            Err(err) => {
                error!("checklist update failed: {}", err);
                None
            }
        }
    }

    fn view(&self) -> String {
        let mut sections = vec![self.view_header()];
        let rows = self.view_rows();
        if !rows.is_empty() {
            sections.push(rows);
        }
        sections.push(self.view_footer());
        sections.join("\n")
    }
}
