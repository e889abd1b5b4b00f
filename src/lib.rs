#![warn(missing_docs)]

//! # crumbtrail-widgets
//!
//! A breadcrumb step trail and animated progress bars for
//! [bubbletea-rs](https://github.com/whit3rabbit/bubbletea-rs) applications.
//!
//! ## Overview
//!
//! The crate models a small multi-step page: a trail of breadcrumb steps that
//! remembers which steps were visited, and a set of progress bars that are
//! nudged up or down by increment/decrement buttons. Every component follows
//! the Elm Architecture pattern with `update()` and `view()` methods.
//!
//! ## Components
//!
//! | Component | Description |
//! |-----------|-------------|
//! | [`Breadcrumbs`] | Step trail with active/visited marking and a click counter |
//! | [`ProgressBar`] | Integer percentage bar with normal/alert colour and a label |
//! | [`Animator`] | Moves one bar toward a goal, one percent per tick |
//! | [`BarSelection`] | Chooses which bar the buttons act on |
//! | [`Buttons`] | Increment/decrement buttons, disabled while a run is in progress |
//! | [`Page`] | All of the above wired together as a bubbletea-rs model |
//!
//! ## Animating a bar
//!
//! ```rust
//! use crumbtrail_widgets::prelude::*;
//!
//! let mut page = Page::default();
//! page.selection.select("2");
//!
//! // Returns the tick command the runtime should execute.
//! let _cmd = page.adjust(30).unwrap();
//! assert_eq!(page.animator.state(), AnimatorState::Running);
//!
//! // Drive the run by hand instead of through tick messages.
//! while page.animator.advance(&mut page.buttons).is_some() {}
//! assert_eq!(page.animator.bar("2").unwrap().label(), "80%");
//! ```
//!
//! ## Logging
//!
//! Components log through the [`log`](https://docs.rs/log) facade: breadcrumb
//! clicks and run start/stop at `debug`, individual ticks at `trace`, and
//! rejected interactions at `warn`. No logger is installed by the crate.

pub mod animator;
pub mod bar;
pub mod breadcrumb;
pub mod buttons;
pub mod counter;
pub mod error;
pub mod key;
pub mod page;
pub mod select;

use bubbletea_rs::Cmd;

/// Core trait for components that support focus management.
///
/// A focused component receives key presses; a blurred one ignores them.
///
/// ```rust
/// use crumbtrail_widgets::prelude::*;
///
/// let mut trail = Breadcrumbs::new(vec![BreadcrumbStep::new("a", "A")]);
/// assert!(!trail.focused());
///
/// trail.focus();
/// assert!(trail.focused());
///
/// trail.blur();
/// assert!(!trail.focused());
/// ```
pub trait Component {
    /// Sets the component to focused state.
    ///
    /// May return a command for the runtime to execute.
    fn focus(&mut self) -> Option<Cmd>;

    /// Sets the component to blurred (unfocused) state.
    fn blur(&mut self);

    /// Returns the current focus state of the component.
    fn focused(&self) -> bool;
}

pub use animator::{
    new as animator_new, with_interval, CancelToken, Model as Animator, Run as AnimationRun,
    State as AnimatorState, Step as AnimationStep, StopReason, TickMsg as AnimatorTickMsg,
};
pub use bar::{BarColor, Model as ProgressBar};
pub use breadcrumb::{Model as Breadcrumbs, Step as BreadcrumbStep};
pub use buttons::{Button, Model as Buttons};
pub use counter::ClickCounter;
pub use error::{Error, Result};
pub use key::{Binding, KeyMap, KeyPress};
pub use page::{Model as Page, Section};
pub use select::{Model as BarSelection, SelectOption};

/// Prelude module for convenient imports.
///
/// ```rust
/// use crumbtrail_widgets::prelude::*;
///
/// let page = Page::default();
/// assert_eq!(page.section(), Section::Breadcrumbs);
/// ```
pub mod prelude {
    pub use crate::animator::{
        new as animator_new, with_interval, CancelToken, Model as Animator,
        State as AnimatorState, Step as AnimationStep, StopReason,
        TickMsg as AnimatorTickMsg,
    };
    pub use crate::bar::{
        new as bar_new, with_alert_color, with_fill_characters, with_normal_color,
        with_percent, with_width, without_label, BarColor, Model as ProgressBar,
    };
    pub use crate::breadcrumb::{Model as Breadcrumbs, Step as BreadcrumbStep};
    pub use crate::buttons::{Button, Model as Buttons};
    pub use crate::counter::ClickCounter;
    pub use crate::error::Error;
    pub use crate::key::{Binding, KeyMap};
    pub use crate::page::{Model as Page, Section};
    pub use crate::select::{Model as BarSelection, SelectOption};
    pub use crate::Component;
}
