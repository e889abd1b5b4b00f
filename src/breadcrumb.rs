//! Breadcrumb step trail.
//!
//! The trail marks the step the user is on as *active* and keeps every step
//! that was ever active marked as *visited*. Each step has a marker, the
//! arrow drawn after its label, which mirrors the step's state. Markers are
//! looked up by step id from a table filled when the trail is built.
//!
//! # Basic Usage
//!
//! ```rust
//! use crumbtrail_widgets::breadcrumb::{Model, Step};
//!
//! let mut trail = Model::new(vec![
//!     Step::new("cart", "Cart"),
//!     Step::new("shipping", "Shipping"),
//!     Step::new("payment", "Payment"),
//! ]);
//!
//! trail.activate("cart").unwrap();
//! trail.activate("shipping").unwrap();
//!
//! assert_eq!(trail.active().map(|s| s.id.as_str()), Some("shipping"));
//! assert!(trail.is_visited("cart"));
//! assert_eq!(trail.counter().value(), 2);
//! ```

use crate::counter::ClickCounter;
use crate::error::{Error, Result};
use crate::key::{self, KeyMap as KeyMapTrait};
use crate::Component;
use bubbletea_rs::{Cmd, KeyMsg, Msg};
use lipgloss_extras::prelude::*;
use std::collections::HashMap;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const DEFAULT_SEPARATOR: &str = " ";
const DEFAULT_MARKER: &str = "▶";
const DEFAULT_ELLIPSIS: &str = "…";

/// Visual state shared by steps and their markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Marking {
    /// This is the step the user is on.
    pub active: bool,
    /// The step has been active at least once.
    pub visited_already: bool,
}

impl Marking {
    fn clear_active(&mut self) {
        self.active = false;
    }

    fn mark(&mut self) {
        self.active = true;
        self.visited_already = true;
    }
}

/// One step of the trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// Identifier used by [`Model::activate`].
    pub id: String,
    /// Text shown in the trail.
    pub label: String,
    /// Current state of the step.
    pub marking: Marking,
}

impl Step {
    /// Creates an unmarked step.
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            marking: Marking::default(),
        }
    }

    /// Whether this is the active step.
    pub fn active(&self) -> bool {
        self.marking.active
    }

    /// Whether the step has ever been active.
    pub fn visited_already(&self) -> bool {
        self.marking.visited_already
    }
}

/// The arrow drawn after a step's label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Text drawn for the marker.
    pub glyph: String,
    /// Mirrors the marking of the owning step.
    pub marking: Marking,
}

/// Key bindings for the trail.
#[derive(Debug, Clone)]
pub struct BreadcrumbKeyMap {
    /// Moves the cursor one step left.
    pub prev: key::Binding,
    /// Moves the cursor one step right.
    pub next: key::Binding,
    /// Activates the step under the cursor.
    pub activate: key::Binding,
}

impl Default for BreadcrumbKeyMap {
    fn default() -> Self {
        Self {
            prev: key::new_binding(vec![
                key::with_keys_str(&["left", "h"]),
                key::with_help("←/h", "prev step"),
            ]),
            next: key::new_binding(vec![
                key::with_keys_str(&["right", "l"]),
                key::with_help("→/l", "next step"),
            ]),
            activate: key::new_binding(vec![
                key::with_keys_str(&["enter", " "]),
                key::with_help("enter", "go to step"),
            ]),
        }
    }
}

impl KeyMapTrait for BreadcrumbKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.prev, &self.next, &self.activate]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![vec![&self.prev, &self.next], vec![&self.activate]]
    }
}

/// Styles for the three step states.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Steps that were never active.
    pub normal: Style,
    /// Steps visited earlier.
    pub visited: Style,
    /// The active step.
    pub active: Style,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            normal: Style::new().foreground(AdaptiveColor {
                Light: "#A49FA5",
                Dark: "#777777",
            }),
            visited: Style::new().foreground(Color::from("#2E86C1")),
            active: Style::new().foreground(Color::from("#FFA500")).bold(true),
        }
    }
}

/// The breadcrumb trail.
#[derive(Debug, Clone)]
pub struct Model {
    steps: Vec<Step>,
    markers: HashMap<String, Marker>,
    counter: ClickCounter,
    cursor: usize,
    focus: bool,

    /// Text placed between two steps.
    pub separator: String,
    /// Labels wider than this many cells are truncated. Zero disables truncation.
    pub max_label_width: usize,
    /// Text appended to a truncated label.
    pub ellipsis: String,
    /// Key bindings used while focused.
    pub keymap: BreadcrumbKeyMap,
    /// Styles for the step states.
    pub styles: Styles,
}

impl Model {
    /// Builds a trail and its marker table.
    pub fn new(steps: Vec<Step>) -> Self {
        let markers = steps
            .iter()
            .map(|s| {
                (
                    s.id.clone(),
                    Marker {
                        glyph: DEFAULT_MARKER.to_string(),
                        marking: s.marking,
                    },
                )
            })
            .collect();

        Self {
            steps,
            markers,
            counter: ClickCounter::new(),
            cursor: 0,
            focus: false,
            separator: DEFAULT_SEPARATOR.to_string(),
            max_label_width: 0,
            ellipsis: DEFAULT_ELLIPSIS.to_string(),
            keymap: BreadcrumbKeyMap::default(),
            styles: Styles::default(),
        }
    }

    /// Uses an existing counter instead of a fresh one.
    pub fn with_counter(mut self, counter: ClickCounter) -> Self {
        self.counter = counter;
        self
    }

    /// Sets the text placed between two steps.
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Truncates labels wider than `width` cells.
    pub fn with_max_label_width(mut self, width: usize) -> Self {
        self.max_label_width = width;
        self
    }

    /// Replaces the step styles.
    pub fn with_styles(mut self, styles: Styles) -> Self {
        self.styles = styles;
        self
    }

    /// Sets the text appended to truncated labels.
    pub fn with_ellipsis(mut self, ellipsis: impl Into<String>) -> Self {
        self.ellipsis = ellipsis.into();
        self
    }

    /// Replaces the glyph of every marker.
    pub fn with_marker_glyph(mut self, glyph: &str) -> Self {
        for marker in self.markers.values_mut() {
            marker.glyph = glyph.to_string();
        }
        self
    }

    /// Every step, in trail order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// The step with the given id.
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|s| s.id == id)
    }

    /// The marker drawn after step `id`.
    pub fn marker(&self, id: &str) -> Option<&Marker> {
        self.markers.get(id)
    }

    /// The active step, if any.
    pub fn active(&self) -> Option<&Step> {
        self.steps.iter().find(|s| s.active())
    }

    /// Whether step `id` exists and has been visited.
    pub fn is_visited(&self, id: &str) -> bool {
        self.step(id).is_some_and(Step::visited_already)
    }

    /// Activations recorded so far.
    pub fn counter(&self) -> &ClickCounter {
        &self.counter
    }

    /// Index of the step under the keyboard cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Makes `id` the active step and records the click.
    ///
    /// Every other step and marker loses its active state; the chosen step
    /// and its marker become active and visited. On an empty trail only the
    /// counter moves. An id that is not on a non-empty trail is rejected
    /// without touching anything.
    ///
    /// ```rust
    /// use crumbtrail_widgets::breadcrumb::{Model, Step};
    /// use crumbtrail_widgets::Error;
    ///
    /// let mut trail = Model::new(vec![Step::new("a", "A"), Step::new("b", "B")]);
    /// trail.activate("b").unwrap();
    ///
    /// assert_eq!(trail.activate("z"), Err(Error::UnknownStep("z".to_string())));
    /// assert_eq!(trail.counter().value(), 1);
    /// assert!(trail.marker("b").unwrap().marking.active);
    /// ```
    pub fn activate(&mut self, id: &str) -> Result<()> {
        if self.steps.is_empty() {
            self.count_click();
            return Ok(());
        }

        match self.steps.iter().position(|s| s.id == id) {
            Some(idx) => {
                self.activate_index(idx);
                Ok(())
            }
            None => {
                log::warn!("breadcrumb activation for unknown step `{}`", id);
                Err(Error::UnknownStep(id.to_string()))
            }
        }
    }

    fn activate_index(&mut self, idx: usize) {
        for step in &mut self.steps {
            step.marking.clear_active();
        }
        for marker in self.markers.values_mut() {
            marker.marking.clear_active();
        }

        let step = &mut self.steps[idx];
        step.marking.mark();
        if let Some(marker) = self.markers.get_mut(&step.id) {
            marker.marking.mark();
        }
        self.cursor = idx;
        self.count_click();
    }

    fn count_click(&mut self) {
        let clicks = self.counter.increment();
        log::debug!("breadcrumb counter is now {}", clicks);
    }

    /// Moves the cursor one step right, stopping at the last step.
    pub fn next(&mut self) {
        if !self.steps.is_empty() {
            self.cursor = (self.cursor + 1).min(self.steps.len() - 1);
        }
    }

    /// Moves the cursor one step left, stopping at the first step.
    pub fn prev(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    /// Handles navigation and activation keys while focused.
    pub fn update(&mut self, msg: &Msg) -> Option<Cmd> {
        if !self.focus {
            return None;
        }
        let key_msg = msg.downcast_ref::<KeyMsg>()?;

        if self.keymap.next.matches(key_msg) {
            self.next();
        } else if self.keymap.prev.matches(key_msg) {
            self.prev();
        } else if self.keymap.activate.matches(key_msg) && self.cursor < self.steps.len() {
            self.activate_index(self.cursor);
        }
        None
    }

    /// Renders the trail: each label followed by its marker.
    pub fn view(&self) -> String {
        self.steps
            .iter()
            .enumerate()
            .map(|(i, step)| {
                let label = truncate(&step.label, self.max_label_width, &self.ellipsis);
                let mut style = self.state_style(step.marking);
                if self.focus && i == self.cursor {
                    style = style.underline(true);
                }
                let marker = self
                    .markers
                    .get(&step.id)
                    .map(|m| self.state_style(m.marking).render(&m.glyph))
                    .unwrap_or_default();
                format!("{}{}", style.render(&format!(" {} ", label)), marker)
            })
            .collect::<Vec<_>>()
            .join(&self.separator)
    }

    fn state_style(&self, marking: Marking) -> Style {
        if marking.active {
            self.styles.active.clone()
        } else if marking.visited_already {
            self.styles.visited.clone()
        } else {
            self.styles.normal.clone()
        }
    }
}

impl Component for Model {
    fn focus(&mut self) -> Option<Cmd> {
        self.focus = true;
        None
    }

    fn blur(&mut self) {
        self.focus = false;
    }

    fn focused(&self) -> bool {
        self.focus
    }
}

fn truncate(label: &str, max_width: usize, ellipsis: &str) -> String {
    if max_width == 0 || label.width() <= max_width {
        return label.to_string();
    }

    let budget = max_width.saturating_sub(ellipsis.width());
    let mut out = String::new();
    let mut used = 0;
    for g in label.graphemes(true) {
        let w = g.width();
        if used + w > budget {
            break;
        }
        out.push_str(g);
        used += w;
    }
    out.push_str(ellipsis);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn trail() -> Model {
        Model::new(vec![
            Step::new("a", "Alpha"),
            Step::new("b", "Beta"),
            Step::new("c", "Gamma"),
        ])
    }

    fn key(code: KeyCode) -> Msg {
        Box::new(KeyMsg {
            key: code,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_new_trail_is_unmarked() {
        let trail = trail();
        assert!(trail.active().is_none());
        assert!(trail.steps().iter().all(|s| !s.visited_already()));
        assert_eq!(trail.counter().value(), 0);
        assert_eq!(trail.marker("b").map(|m| m.glyph.as_str()), Some("▶"));
    }

    #[test]
    fn test_activate_marks_step_and_marker() {
        let mut trail = trail();
        trail.activate("b").unwrap();

        let step = trail.step("b").unwrap();
        assert!(step.active());
        assert!(step.visited_already());

        let marker = trail.marker("b").unwrap();
        assert!(marker.marking.active);
        assert!(marker.marking.visited_already);
    }

    #[test]
    fn test_activate_clears_previous_active_marker() {
        let mut trail = trail();
        trail.activate("a").unwrap();
        trail.activate("c").unwrap();

        let marker = trail.marker("a").unwrap();
        assert!(!marker.marking.active);
        assert!(marker.marking.visited_already);
        assert_eq!(trail.cursor(), 2);
    }

    #[test]
    fn test_reactivating_same_step() {
        let mut trail = trail();
        trail.activate("a").unwrap();
        trail.activate("a").unwrap();

        assert_eq!(trail.active().map(|s| s.id.as_str()), Some("a"));
        assert_eq!(trail.counter().value(), 2);
    }

    #[test]
    fn test_unknown_step_is_rejected() {
        let mut trail = trail();
        trail.activate("a").unwrap();

        let err = trail.activate("zz").unwrap_err();
        assert_eq!(err, Error::UnknownStep("zz".to_string()));
        assert_eq!(trail.active().map(|s| s.id.as_str()), Some("a"));
        assert_eq!(trail.counter().value(), 1);
    }

    #[test]
    fn test_empty_trail_only_counts() {
        let mut trail = Model::new(Vec::new());
        assert!(trail.activate("anything").is_ok());
        assert_eq!(trail.counter().value(), 1);
        assert!(trail.active().is_none());
    }

    #[test]
    fn test_with_counter_continues_count() {
        let mut counter = ClickCounter::new();
        counter.increment();
        counter.increment();

        let mut trail = trail().with_counter(counter);
        trail.activate("a").unwrap();
        assert_eq!(trail.counter().value(), 3);
    }

    #[test]
    fn test_keys_ignored_when_blurred() {
        let mut trail = trail();
        trail.update(&key(KeyCode::Enter));
        assert!(trail.active().is_none());
        assert_eq!(trail.counter().value(), 0);
    }

    #[test]
    fn test_keyboard_navigation_and_activation() {
        let mut trail = trail();
        trail.focus();
        assert!(trail.focused());

        trail.update(&key(KeyCode::Right));
        trail.update(&key(KeyCode::Right));
        trail.update(&key(KeyCode::Right));
        assert_eq!(trail.cursor(), 2);

        trail.update(&key(KeyCode::Left));
        trail.update(&key(KeyCode::Enter));
        assert_eq!(trail.active().map(|s| s.id.as_str()), Some("b"));
        assert_eq!(trail.counter().value(), 1);

        trail.blur();
        assert!(!trail.focused());
    }

    #[test]
    fn test_view_contains_labels_and_markers() {
        let trail = trail().with_separator("|");
        let view = strip_ansi_escapes::strip_str(trail.view());
        assert_eq!(view, " Alpha ▶| Beta ▶| Gamma ▶");
    }

    #[test]
    fn test_custom_marker_glyph() {
        let trail = trail().with_marker_glyph(">");
        let view = strip_ansi_escapes::strip_str(trail.view());
        assert!(view.starts_with(" Alpha >"));
    }

    #[test]
    fn test_truncate_labels() {
        assert_eq!(truncate("Shipping", 0, "…"), "Shipping");
        assert_eq!(truncate("Shipping", 8, "…"), "Shipping");
        assert_eq!(truncate("Shipping", 5, "…"), "Ship…");
        assert_eq!(truncate("日本語テキスト", 5, "…"), "日本…");
        assert_eq!(truncate("Shipping", 6, "..."), "Shi...");
    }

    #[test]
    fn test_custom_ellipsis_in_view() {
        let trail = trail().with_max_label_width(3).with_ellipsis("~");
        let view = strip_ansi_escapes::strip_str(trail.view());
        assert!(view.starts_with(" Al~ ▶"));
    }

    #[test]
    fn test_keyboard_activation_marks_marker_and_counts() {
        let mut trail = trail();
        trail.focus();
        trail.update(&key(KeyCode::Enter));
        trail.update(&key(KeyCode::Right));
        trail.update(&key(KeyCode::Char(' ')));

        assert_eq!(trail.active().map(|s| s.id.as_str()), Some("b"));
        assert!(!trail.marker("a").unwrap().marking.active);
        assert!(trail.marker("a").unwrap().marking.visited_already);
        assert!(trail.marker("b").unwrap().marking.active);
        assert_eq!(trail.counter().value(), 2);
    }

    #[test]
    fn test_enter_on_empty_trail_is_ignored() {
        let mut trail = Model::new(Vec::new());
        trail.focus();
        trail.update(&key(KeyCode::Enter));
        assert_eq!(trail.counter().value(), 0);
    }
}
