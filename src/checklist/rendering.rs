//! View rendering for the checklist.
//!
//! Only rows bound in the recycler are ever rendered, and of those only the
//! ones inside the viewport; overscan rows stay bound but off screen.

use super::style::{BULLET, ELLIPSIS};
use super::Model;
use crate::key::{self, KeyMap};
use crate::row::RowView;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

impl Model {
    /// Renders the button line.
    pub(super) fn view_header(&self) -> String {
        let text = format!("{} ({})", self.button_text, self.keymap.add.help().key);
        self.styles.button.render(&text)
    }

    /// Renders every on-screen row in index order.
    pub(super) fn view_rows(&self) -> String {
        if !self.ready {
            return String::new();
        }
        if self.is_empty() {
            return self.styles.no_rows.render("No rows.");
        }
        let layout = self.controller.recycler().layout();
        let first = layout.offset() / layout.row_height();
        let last = first + layout.rows_in_viewport();

        self.controller
            .recycler()
            .bound_views()
            .filter(|(index, _)| *index >= first && *index < last)
            .map(|(index, view)| self.render_row(view, index == self.cursor))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders one row: cursor marker, toggle box, left label, label.
    pub(super) fn render_row(&self, view: &RowView, selected: bool) -> String {
        let schema = view.schema();
        let mut line = if selected {
            format!("{} ", self.styles.cursor.render(">"))
        } else {
            "  ".to_string()
        };
        let mut used = 2;

        if schema.toggle {
            let (mark, style) = if view.toggle().is_active() {
                ("[x]", &self.styles.checked)
            } else {
                ("[ ]", &self.styles.unchecked)
            };
            line.push_str(&style.render(mark));
            line.push(' ');
            used += 4;
        }

        let style = if selected {
            &self.styles.selected_label
        } else {
            &self.styles.label
        };
        if schema.left_label && !view.left_label().is_empty() {
            let left = truncate(view.left_label(), self.width.saturating_sub(used));
            used += left.width() + 1;
            line.push_str(&style.render(&left));
            line.push(' ');
        }
        if schema.label {
            let label = truncate(view.label(), self.width.saturating_sub(used));
            line.push_str(&style.render(&label));
        }
        line
    }

    /// Renders the status and help lines.
    pub(super) fn view_footer(&self) -> String {
        let status = format!(
            "{}/{} checked {} row {}/{}",
            self.controller.toggled_count(),
            self.len(),
            BULLET,
            if self.is_empty() { 0 } else { self.cursor + 1 },
            self.len(),
        );
        let help = if self.show_full_help {
            self.keymap
                .full_help()
                .iter()
                .map(|column| key::help_line(column))
                .collect::<Vec<_>>()
                .join("\n")
        } else {
            key::help_line(&self.keymap.short_help())
        };
        format!(
            "{}\n{}",
            self.styles.status.render(&status),
            self.styles.help.render(&help)
        )
    }
}

/// Cuts `text` to at most `max` columns, ending in an ellipsis when cut.
pub(super) fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let budget = max - ELLIPSIS.width();
    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > budget {
            break;
        }
        width += w;
        out.push(c);
    }
    out.push_str(ELLIPSIS);
    out
}
