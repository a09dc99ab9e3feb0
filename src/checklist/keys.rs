//! Key bindings for the checklist component.
//!
//! - **Cursor**: `↑/k`, `↓/j`
//! - **Paging**: `pgup/b`, `pgdown/f`, `g/home`, `G/end`
//! - **Rows**: `space`/`enter` toggles the row under the cursor
//! - **List**: `a` appends a row, `d` dumps the rows to the debug log
//! - **Help/Quit**: `?`, `q`, `ctrl+c`

use crate::key;

/// Key bindings for navigating and editing a checklist.
#[derive(Debug, Clone)]
pub struct ChecklistKeyMap {
    /// Move the cursor up one row.
    pub cursor_up: key::Binding,
    /// Move the cursor down one row.
    pub cursor_down: key::Binding,
    /// Move the cursor up one page.
    pub prev_page: key::Binding,
    /// Move the cursor down one page.
    pub next_page: key::Binding,
    /// Jump to the first row.
    pub go_to_start: key::Binding,
    /// Jump to the last row.
    pub go_to_end: key::Binding,
    /// Toggle the row under the cursor.
    pub toggle: key::Binding,
    /// Append a row.
    pub add: key::Binding,
    /// Log the whole model at debug level.
    pub dump: key::Binding,
    /// Show or hide the full help.
    pub show_full_help: key::Binding,
    /// Quit.
    pub quit: key::Binding,
}

impl Default for ChecklistKeyMap {
    fn default() -> Self {
        Self {
            cursor_up: key::new_binding(&["up", "k"]).with_help("↑/k", "up"),
            cursor_down: key::new_binding(&["down", "j"]).with_help("↓/j", "down"),
            prev_page: key::new_binding(&["pgup", "b"]).with_help("pgup", "prev page"),
            next_page: key::new_binding(&["pgdown", "f"]).with_help("pgdn", "next page"),
            go_to_start: key::new_binding(&["home", "g"]).with_help("g/home", "go to start"),
            go_to_end: key::new_binding(&["end", "G"]).with_help("G/end", "go to end"),
            toggle: key::new_binding(&["space", "enter"]).with_help("space", "toggle"),
            add: key::new_binding(&["a"]).with_help("a", "add row"),
            dump: key::new_binding(&["d"]).with_help("d", "dump rows"),
            show_full_help: key::new_binding(&["?"]).with_help("?", "more"),
            quit: key::new_binding(&["q", "ctrl+c"]).with_help("q", "quit"),
        }
    }
}

impl key::KeyMap for ChecklistKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![
            &self.cursor_up,
            &self.cursor_down,
            &self.toggle,
            &self.add,
            &self.quit,
            &self.show_full_help,
        ]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![
                &self.cursor_up,
                &self.cursor_down,
                &self.prev_page,
                &self.next_page,
                &self.go_to_start,
                &self.go_to_end,
            ],
            vec![&self.toggle, &self.add, &self.dump],
            vec![&self.show_full_help, &self.quit],
        ]
    }
}
