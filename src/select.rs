//! Bar selection control.
//!
//! The selection control decides which progress bar an adjustment applies
//! to. Each option pairs a display label with the key of a bar.

use crate::key::{self, KeyMap as KeyMapTrait};
use bubbletea_rs::{KeyMsg, Msg};
use lipgloss_extras::prelude::*;

/// Element id of the selection control.
pub const BAR_SELECTION_ID: &str = "barSelection";

/// One entry of the selection control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Text shown to the user.
    pub label: String,
    /// Key of the bar this option stands for.
    pub value: String,
}

impl SelectOption {
    /// Creates an option showing `label` for the bar `value`.
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Key bindings for cycling through options.
#[derive(Debug, Clone)]
pub struct SelectKeyMap {
    /// Selects the previous option.
    pub prev: key::Binding,
    /// Selects the next option.
    pub next: key::Binding,
}

impl Default for SelectKeyMap {
    fn default() -> Self {
        Self {
            prev: key::new_binding(vec![
                key::with_keys_str(&["up", "left", "k"]),
                key::with_help("↑/k", "prev bar"),
            ]),
            next: key::new_binding(vec![
                key::with_keys_str(&["down", "right", "j"]),
                key::with_help("↓/j", "next bar"),
            ]),
        }
    }
}

impl KeyMapTrait for SelectKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.prev, &self.next]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![&self.prev, &self.next]]
    }
}

/// The selection control.
#[derive(Debug, Clone)]
pub struct Model {
    options: Vec<SelectOption>,
    selected: usize,

    /// Key bindings.
    pub keymap: SelectKeyMap,
    /// Style of the selected label.
    pub selected_style: Style,
    /// Drawn before the selected label.
    pub open_glyph: String,
    /// Drawn after the selected label.
    pub close_glyph: String,
    /// Shown in place of a label when there are no options.
    pub empty_text: String,
}

impl Default for Model {
    fn default() -> Self {
        Self {
            options: Vec::new(),
            selected: 0,
            keymap: SelectKeyMap::default(),
            selected_style: Style::new().bold(true),
            open_glyph: "‹".to_string(),
            close_glyph: "›".to_string(),
            empty_text: "none".to_string(),
        }
    }
}

impl Model {
    /// Creates a control over the given options, with the first one selected.
    pub fn new(options: Vec<SelectOption>) -> Self {
        Self {
            options,
            ..Self::default()
        }
    }

    /// Identifier of the control, `barSelection`.
    pub fn element_id(&self) -> &'static str {
        BAR_SELECTION_ID
    }

    /// Every option, in display order.
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Index of the selected option.
    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// The selected option, or `None` when the control has no options.
    pub fn selected(&self) -> Option<&SelectOption> {
        self.options.get(self.selected)
    }

    /// Bar key of the selected option.
    pub fn value(&self) -> Option<&str> {
        self.selected().map(|o| o.value.as_str())
    }

    /// Selects the option whose value is `value`. Returns false if none matches.
    pub fn select(&mut self, value: &str) -> bool {
        match self.options.iter().position(|o| o.value == value) {
            Some(idx) => {
                self.selected = idx;
                true
            }
            None => false,
        }
    }

    /// Selects the next option, wrapping to the first.
    pub fn select_next(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + 1) % self.options.len();
        }
    }

    /// Selects the previous option, wrapping to the last.
    pub fn select_prev(&mut self) {
        if !self.options.is_empty() {
            self.selected = (self.selected + self.options.len() - 1) % self.options.len();
        }
    }

    /// Handles key presses that change the selection.
    pub fn update(&mut self, msg: &Msg) {
        if let Some(key_msg) = msg.downcast_ref::<KeyMsg>() {
            if self.keymap.next.matches(key_msg) {
                self.select_next();
            } else if self.keymap.prev.matches(key_msg) {
                self.select_prev();
            }
        }
    }

    /// Renders the control as `‹ label ›`.
    pub fn view(&self) -> String {
        let label = match self.selected() {
            Some(option) => self.selected_style.render(&option.label),
            None => self.empty_text.clone(),
        };
        format!("{} {} {}", self.open_glyph, label, self.close_glyph)
    }
}
