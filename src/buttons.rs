//! Increment/decrement button group.
//!
//! Every button carries a signed delta. While an animation runs the whole
//! group is disabled, which is the only guard against overlapping runs.

use crate::key::{self, KeyMap as KeyMapTrait};
use bubbletea_rs::{KeyMsg, Msg};
use lipgloss_extras::prelude::*;
use once_cell::sync::Lazy;

/// Element id of the button container.
pub const BUTTON_CONTAINER_ID: &str = "buttonContainer";

static DEFAULT_BUTTONS: Lazy<Vec<Button>> = Lazy::new(|| {
    [-25, -10, 10, 25]
        .into_iter()
        .map(Button::with_delta)
        .collect()
});

/// One button of the group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    /// Text shown on the button.
    pub label: String,
    /// Percent added to the selected bar when pressed.
    pub delta: i32,
    /// A disabled button ignores presses.
    pub disabled: bool,
}

impl Button {
    /// Creates an enabled button.
    pub fn new(label: impl Into<String>, delta: i32) -> Self {
        Self {
            label: label.into(),
            delta,
            disabled: false,
        }
    }

    /// A button labelled with its signed delta, e.g. `+10` or `-25`.
    pub fn with_delta(delta: i32) -> Self {
        Self::new(format!("{:+}", delta), delta)
    }
}

/// Key bindings for the button group.
#[derive(Debug, Clone)]
pub struct ButtonsKeyMap {
    /// Moves the cursor one button left.
    pub prev: key::Binding,
    /// Moves the cursor one button right.
    pub next: key::Binding,
    /// Presses the button under the cursor.
    pub press: key::Binding,
}

impl Default for ButtonsKeyMap {
    fn default() -> Self {
        Self {
            prev: key::new_binding(vec![
                key::with_keys_str(&["left", "h"]),
                key::with_help("←/h", "prev button"),
            ]),
            next: key::new_binding(vec![
                key::with_keys_str(&["right", "l"]),
                key::with_help("→/l", "next button"),
            ]),
            press: key::new_binding(vec![
                key::with_keys_str(&["enter", " "]),
                key::with_help("enter", "press"),
            ]),
        }
    }
}

impl KeyMapTrait for ButtonsKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.prev, &self.next, &self.press]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![&self.prev, &self.next], vec![&self.press]]
    }
}

/// Styles for rendering buttons.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Enabled buttons.
    pub normal: Style,
    /// The button under the cursor while the group has focus.
    pub focused: Style,
    /// Buttons that ignore presses.
    pub disabled: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            normal: Style::new(),
            focused: Style::new().bold(true).underline(true),
            disabled: Style::new().faint(true),
        }
    }
}

/// The button group.
#[derive(Debug, Clone)]
pub struct Model {
    buttons: Vec<Button>,
    cursor: usize,

    /// Key bindings.
    pub keymap: ButtonsKeyMap,
    /// Styles for the button states.
    pub styles: Styles,
}

impl Default for Model {
    fn default() -> Self {
        Self::new(DEFAULT_BUTTONS.clone())
    }
}

impl Model {
    /// Creates a group over `buttons`, cursor on the first one.
    pub fn new(buttons: Vec<Button>) -> Self {
        Self {
            buttons,
            cursor: 0,
            keymap: ButtonsKeyMap::default(),
            styles: Styles::default(),
        }
    }

    /// Identifier of the container, `buttonContainer`.
    pub fn element_id(&self) -> &'static str {
        BUTTON_CONTAINER_ID
    }

    /// Every button, left to right.
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Index of the button under the cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The button under the cursor.
    pub fn focused_button(&self) -> Option<&Button> {
        self.buttons.get(self.cursor)
    }

    /// Disables or re-enables every button in the group.
    pub fn set_disabled(&mut self, disabled: bool) {
        for button in &mut self.buttons {
            button.disabled = disabled;
        }
    }

    /// True when the group is non-empty and every button is disabled.
    pub fn all_disabled(&self) -> bool {
        !self.buttons.is_empty() && self.buttons.iter().all(|b| b.disabled)
    }

    /// True when at least one button accepts presses.
    pub fn any_enabled(&self) -> bool {
        self.buttons.iter().any(|b| !b.disabled)
    }

    /// Moves the cursor right, stopping at the last button.
    pub fn next(&mut self) {
        if !self.buttons.is_empty() {
            self.cursor = (self.cursor + 1).min(self.buttons.len() - 1);
        }
    }

    /// Moves the cursor left, stopping at the first button.
    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Presses the focused button, yielding its delta if it is enabled.
    pub fn press(&self) -> Option<i32> {
        self.focused_button()
            .filter(|b| !b.disabled)
            .map(|b| b.delta)
    }

    /// Moves the cursor on navigation keys; returns the pressed delta, if any.
    pub fn update(&mut self, msg: &Msg) -> Option<i32> {
        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        if self.keymap.next.matches(key_msg) {
            self.next();
        } else if self.keymap.prev.matches(key_msg) {
            self.prev();
        } else if self.keymap.press.matches(key_msg) {
            return self.press();
        }
        None
    }

    /// Renders the group as `[-25] [-10] [+10] [+25]`.
    pub fn view(&self, focused: bool) -> String {
        self.buttons
            .iter()
            .enumerate()
            .map(|(i, b)| {
                let text = format!("[{}]", b.label);
                let style = if b.disabled {
                    &self.styles.disabled
                } else if focused && i == self.cursor {
                    &self.styles.focused
                } else {
                    &self.styles.normal
                };
                style.render(&text)
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}
