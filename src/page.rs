//! The composed page: breadcrumb trail, bar selection, buttons and bars.
//!
//! The page is a bubbletea-rs model. Tab moves keyboard focus between the
//! breadcrumb trail, the selection control and the button group; keys go to
//! the focused section, and tick messages go to the animator.
//!
//! ```rust
//! use crumbtrail_widgets::page::Model;
//!
//! let mut page = Model::default();
//! page.activate("step-2").unwrap();
//!
//! let _tick = page.adjust(10).unwrap();
//! assert!(page.buttons.all_disabled());
//! ```

use crate::animator::{self, State};
use crate::bar::{self, with_percent};
use crate::breadcrumb::{self, Step};
use crate::buttons;
use crate::error::Result;
use crate::key::{self, KeyMap as KeyMapTrait};
use crate::select::{self, SelectOption};
use crate::Component;
use bubbletea_rs::{quit, Cmd, KeyMsg, Model as BubbleTeaModel, Msg};
use lipgloss_extras::prelude::*;

/// Section of the page that receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// The breadcrumb trail.
    #[default]
    Breadcrumbs,
    /// The bar selection control.
    Selection,
    /// The increment/decrement buttons.
    Buttons,
}

impl Section {
    fn next(self) -> Self {
        match self {
            Section::Breadcrumbs => Section::Selection,
            Section::Selection => Section::Buttons,
            Section::Buttons => Section::Breadcrumbs,
        }
    }

    fn prev(self) -> Self {
        match self {
            Section::Breadcrumbs => Section::Buttons,
            Section::Selection => Section::Breadcrumbs,
            Section::Buttons => Section::Selection,
        }
    }
}

/// Page-level key bindings.
#[derive(Debug, Clone)]
pub struct PageKeyMap {
    /// Focuses the next section.
    pub next_section: key::Binding,
    /// Focuses the previous section.
    pub prev_section: key::Binding,
    /// Cancels the run in progress.
    pub cancel: key::Binding,
    /// Quits the program.
    pub quit: key::Binding,
}

impl Default for PageKeyMap {
    fn default() -> Self {
        Self {
            next_section: key::new_binding(vec![
                key::with_keys_str(&["tab"]),
                key::with_help("tab", "next section"),
            ]),
            prev_section: key::new_binding(vec![
                key::with_keys_str(&["backtab", "shift+backtab"]),
                key::with_help("shift+tab", "prev section"),
            ]),
            cancel: key::new_binding(vec![
                key::with_keys_str(&["esc"]),
                key::with_help("esc", "stop animation"),
            ]),
            quit: key::new_binding(vec![
                key::with_keys_str(&["q", "ctrl+c"]),
                key::with_help("q", "quit"),
            ]),
        }
    }
}

impl KeyMapTrait for PageKeyMap {
    fn short_help(&self) -> Vec<&key::Binding> {
        vec![&self.next_section, &self.cancel, &self.quit]
    }

    fn full_help(&self) -> Vec<Vec<&key::Binding>> {
        vec![
            vec![&self.next_section, &self.prev_section],
            vec![&self.cancel, &self.quit],
        ]
    }
}

/// The page model.
#[derive(Debug, Clone)]
pub struct Model {
    /// The step trail.
    pub breadcrumbs: breadcrumb::Model,
    /// Chooses the bar that buttons act on.
    pub selection: select::Model,
    /// The increment/decrement buttons.
    pub buttons: buttons::Model,
    /// Owns the bars and runs their animations.
    pub animator: animator::Model,
    /// Page-level key bindings.
    pub keymap: PageKeyMap,
    /// Style of the help line.
    pub help_style: Style,
    /// Drawn in front of the selected bar.
    pub selected_marker: String,
    /// Shown next to the buttons while a run is in progress.
    pub running_text: String,
    section: Section,
}

impl Model {
    /// Builds a page from its parts. The breadcrumb trail starts focused.
    pub fn new(
        breadcrumbs: breadcrumb::Model,
        selection: select::Model,
        buttons: buttons::Model,
        animator: animator::Model,
    ) -> Self {
        let mut page = Self {
            breadcrumbs,
            selection,
            buttons,
            animator,
            keymap: PageKeyMap::default(),
            help_style: Style::new().faint(true),
            selected_marker: "›".to_string(),
            running_text: "animating…".to_string(),
            section: Section::Breadcrumbs,
        };
        page.breadcrumbs.focus();
        page
    }

    /// The section receiving key presses.
    pub fn section(&self) -> Section {
        self.section
    }

    /// Moves keyboard focus to `section`.
    pub fn set_section(&mut self, section: Section) {
        self.section = section;
        if section == Section::Breadcrumbs {
            self.breadcrumbs.focus();
        } else {
            self.breadcrumbs.blur();
        }
    }

    /// Breadcrumb click entry point.
    pub fn activate(&mut self, id: &str) -> Result<()> {
        self.breadcrumbs.activate(id)
    }

    /// Increment/decrement entry point: animates the selected bar by `delta`.
    ///
    /// ```rust
    /// use crumbtrail_widgets::page::Model;
    /// use crumbtrail_widgets::Error;
    ///
    /// let mut page = Model::default();
    /// let _tick = page.adjust(-10).unwrap();
    /// assert!(matches!(page.adjust(10), Err(Error::AnimationInProgress(_))));
    /// ```
    pub fn adjust(&mut self, delta: i32) -> Result<Cmd> {
        self.animator
            .adjust(delta, &self.selection, &mut self.buttons)
    }

    /// Handles one message.
    ///
    /// Tick messages drive the animator. Keys are checked against the page
    /// bindings first and then handed to the focused section.
    ///
    /// ```rust
    /// use bubbletea_rs::{KeyMsg, Msg};
    /// use crossterm::event::{KeyCode, KeyModifiers};
    /// use crumbtrail_widgets::page::{Model, Section};
    ///
    /// let mut page = Model::default();
    /// let tab: Msg = Box::new(KeyMsg {
    ///     key: KeyCode::Tab,
    ///     modifiers: KeyModifiers::NONE,
    /// });
    /// page.update(tab);
    /// assert_eq!(page.section(), Section::Selection);
    /// ```
    pub fn update(&mut self, msg: Msg) -> Option<Cmd> {
        if msg.is::<animator::TickMsg>() {
            return self.animator.update(&msg, &mut self.buttons);
        }

        let key_msg = msg.downcast_ref::<KeyMsg>()?;
        if self.keymap.quit.matches(key_msg) {
            return Some(quit());
        }
        if self.keymap.next_section.matches(key_msg) {
            self.set_section(self.section.next());
            return None;
        }
        if self.keymap.prev_section.matches(key_msg) {
            self.set_section(self.section.prev());
            return None;
        }
        if self.keymap.cancel.matches(key_msg) {
            self.animator.cancel();
            return None;
        }

        match self.section {
            Section::Breadcrumbs => self.breadcrumbs.update(&msg),
            Section::Selection => {
                self.selection.update(&msg);
                None
            }
            Section::Buttons => {
                let delta = self.buttons.update(&msg)?;
                match self.adjust(delta) {
                    Ok(cmd) => Some(cmd),
                    Err(err) => {
                        log::warn!("adjustment by {} rejected: {}", delta, err);
                        None
                    }
                }
            }
        }
    }

    /// Renders the whole page.
    pub fn view(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.breadcrumbs.view());
        out.push_str("\n\n");

        for bar in self.animator.bars() {
            let marker = if self.selection.value() == Some(bar.key()) {
                self.selected_marker.clone()
            } else {
                " ".repeat(lipgloss_extras::lipgloss::width_visible(&self.selected_marker))
            };
            out.push_str(&format!("{} {}\n", marker, bar.view()));
        }

        out.push('\n');
        out.push_str(&format!("bar: {}\n", self.selection.view()));
        out.push_str(&self.buttons.view(self.section == Section::Buttons));
        if self.animator.state() == State::Running {
            out.push_str("  ");
            out.push_str(&self.running_text);
        }
        out.push_str("\n\n");

        let section_help = match self.section {
            Section::Breadcrumbs => key::short_help_view(&self.breadcrumbs.keymap),
            Section::Selection => key::short_help_view(&self.selection.keymap),
            Section::Buttons => key::short_help_view(&self.buttons.keymap),
        };
        let help = format!("{} • {}", section_help, key::short_help_view(&self.keymap));
        out.push_str(&self.help_style.render(&help));
        out
    }
}

impl Default for Model {
    fn default() -> Self {
        let steps = (1..=4)
            .map(|i| Step::new(format!("step-{}", i), format!("Step {}", i)))
            .collect();
        let selection = select::Model::new(
            (1..=3)
                .map(|i| SelectOption::new(format!("Bar {}", i), i.to_string()))
                .collect(),
        );
        let bars = [25, 50, 75]
            .into_iter()
            .enumerate()
            .map(|(i, p)| bar::new((i + 1).to_string(), &[with_percent(p)]))
            .collect();

        Self::new(
            breadcrumb::Model::new(steps),
            selection,
            buttons::Model::default(),
            animator::new(bars, &[]),
        )
    }
}

impl BubbleTeaModel for Model {
    fn init() -> (Self, Option<Cmd>) {
        (Self::default(), None)
    }

    fn update(&mut self, msg: Msg) -> Option<Cmd> {
        self.update(msg)
    }

    fn view(&self) -> String {
        self.view()
    }
}
