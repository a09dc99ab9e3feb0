//! Styles for the checklist component.
//!
//! ```rust
//! use bubbletea_recycler::checklist::ChecklistStyles;
//! use lipgloss_extras::prelude::*;
//!
//! let mut styles = ChecklistStyles::default();
//! styles.checked = Style::new().foreground(Color::from("#00ff00"));
//! ```

use lipgloss_extras::prelude::*;

/// Ellipsis appended to labels cut to fit the width.
pub const ELLIPSIS: &str = "…";

/// Separator between help entries and status fields.
pub const BULLET: &str = "•";

/// Visual styling for every part of the checklist.
#[derive(Debug, Clone)]
pub struct ChecklistStyles {
    /// The "add row" button line.
    pub button: Style,
    /// Toggle box when on.
    pub checked: Style,
    /// Toggle box when off.
    pub unchecked: Style,
    /// Label of an unselected row.
    pub label: Style,
    /// Label of the row under the cursor.
    pub selected_label: Style,
    /// Cursor marker.
    pub cursor: Style,
    /// Message shown when there is nothing to display.
    pub no_rows: Style,
    /// Status line.
    pub status: Style,
    /// Help line.
    pub help: Style,
}

impl Default for ChecklistStyles {
    fn default() -> Self {
        Self {
            button: Style::new()
                .foreground(Color::from("#FFFDF5"))
                .background(Color::from("#25A065"))
                .padding(0, 1, 0, 1),
            checked: Style::new().foreground(Color::from("#04B575")).bold(true),
            unchecked: Style::new().foreground(Color::from("#626262")),
            label: Style::new().foreground(Color::from("#dddddd")),
            selected_label: Style::new().foreground(Color::from("#EE6FF8")),
            cursor: Style::new().foreground(Color::from("#AD58B4")),
            no_rows: Style::new().foreground(Color::from("#626262")),
            status: Style::new().foreground(Color::from("#A49FA5")),
            help: Style::new().foreground(Color::from("#626262")),
        }
    }
}
