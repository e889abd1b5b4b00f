//! Progress animator.
//!
//! The animator owns the progress bars and moves one of them toward a goal,
//! one percent per tick, while the button group is disabled. Ticks are
//! `bubbletea_rs::tick` commands; the runtime delivers each [`TickMsg`] back
//! through [`Model::update`], which advances the run and schedules the next
//! tick until a stop condition holds.
//!
//! A run stops when the bar reaches its goal, when it hits 100 while
//! increasing or 0 while decreasing, or when its [`CancelToken`] is
//! cancelled. Stopping re-enables the buttons and copies the final width into
//! the bar's label.
//!
//! # Basic Usage
//!
//! ```rust
//! use crumbtrail_widgets::animator::{self, State};
//! use crumbtrail_widgets::bar::{self, with_percent};
//! use crumbtrail_widgets::buttons;
//!
//! let mut buttons = buttons::Model::default();
//! let mut anim = animator::new(vec![bar::new("1", &[with_percent(50)])], &[]);
//!
//! let _tick = anim.start("1", 30, &mut buttons).unwrap();
//! assert_eq!(anim.state(), State::Running);
//! assert!(buttons.all_disabled());
//!
//! while anim.advance(&mut buttons).is_some() {}
//!
//! assert_eq!(anim.state(), State::Idle);
//! assert_eq!(anim.bar("1").unwrap().label(), "80%");
//! ```

use crate::bar::{self, BarColor, MAX_PERCENT, MIN_PERCENT};
use crate::buttons;
use crate::error::{Error, Result};
use crate::select;
use bubbletea_rs::{tick as bubbletea_tick, Cmd, Msg};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

// Internal ID management for animator instances
static LAST_ID: AtomicI64 = AtomicI64::new(0);

fn next_id() -> i64 {
    LAST_ID.fetch_add(1, Ordering::SeqCst) + 1
}

/// Default time between two ticks of a run.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(10);

/// Message delivered for every tick of a run.
#[derive(Debug, Clone)]
pub struct TickMsg {
    /// Animator the tick belongs to.
    pub id: i64,
    tag: i64,
}

/// Handle for stopping a run from outside the animator.
///
/// Cancelling takes effect on the run's next tick, which then stops with
/// [`StopReason::Cancelled`] and the usual stop effects.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels every run holding a clone of this token.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Reports whether [`cancel`](Self::cancel) has been called.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Lifecycle of the animator. A stopped run collapses straight back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// No run; buttons enabled.
    Idle,
    /// A run is in progress; buttons disabled.
    Running,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The width equals the goal.
    GoalReached,
    /// The width reached 100 while increasing.
    UpperBound,
    /// The width reached 0 while decreasing.
    LowerBound,
    /// The run's cancel token was cancelled.
    Cancelled,
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The bar moved to this width.
    Moved(i32),
    /// The run is over.
    Stopped(StopReason),
}

/// One animation run: a bar, a delta, and the goal derived from them.
#[derive(Debug, Clone)]
pub struct Run {
    bar: String,
    // Position of the bar in the animator; set when the run starts.
    slot: usize,
    delta: i32,
    goal: i32,
    ticks: u32,
    token: CancelToken,
}

impl Run {
    /// Plans a run of `delta` on a bar currently at `width`.
    ///
    /// The goal is not clamped; a goal outside `[0, 100]` is what puts the bar
    /// into its alert colour.
    pub fn new(bar: impl Into<String>, width: i32, delta: i32) -> Self {
        Self {
            bar: bar.into(),
            slot: 0,
            delta,
            goal: width.saturating_add(delta),
            ticks: 0,
            token: CancelToken::new(),
        }
    }

    /// Key of the bar being moved.
    pub fn bar_key(&self) -> &str {
        &self.bar
    }

    /// Requested change in percent.
    pub fn delta(&self) -> i32 {
        self.delta
    }

    /// Target width, `width + delta` at the start of the run. May lie outside `[0, 100]`.
    pub fn goal(&self) -> i32 {
        self.goal
    }

    /// Ticks processed so far, the stopping tick included.
    pub fn ticks(&self) -> u32 {
        self.ticks
    }

    /// Token that cancels this run.
    pub fn token(&self) -> &CancelToken {
        &self.token
    }

    /// Whether the goal lies within `[0, 100]`.
    pub fn goal_in_range(&self) -> bool {
        (MIN_PERCENT..=MAX_PERCENT).contains(&self.goal)
    }

    /// Runs one tick against the bar.
    pub fn step(&mut self, bar: &mut bar::Model) -> Step {
        self.ticks += 1;

        if self.token.is_cancelled() {
            return Step::Stopped(StopReason::Cancelled);
        }

        let width = bar.percent();
        if width == self.goal {
            return Step::Stopped(StopReason::GoalReached);
        }
        if width >= MAX_PERCENT && self.delta > 0 {
            return Step::Stopped(StopReason::UpperBound);
        }
        if width <= MIN_PERCENT && self.delta < 0 {
            return Step::Stopped(StopReason::LowerBound);
        }

        let next = if width >= self.goal { width - 1 } else { width + 1 };
        bar.set_percent(next);
        Step::Moved(bar.percent())
    }
}

/// Configuration options for the animator.
pub enum AnimatorOption {
    /// Time between two ticks.
    WithInterval(Duration),
}

impl AnimatorOption {
    fn apply(&self, m: &mut Model) {
        match self {
            AnimatorOption::WithInterval(interval) => m.interval = *interval,
        }
    }
}

/// Sets the time between two ticks (default 10ms).
pub fn with_interval(interval: Duration) -> AnimatorOption {
    AnimatorOption::WithInterval(interval)
}

/// The animator and the bars it drives.
#[derive(Debug, Clone)]
pub struct Model {
    id: i64,
    tag: i64,
    bars: Vec<bar::Model>,
    run: Option<Run>,
    last_stop: Option<StopReason>,

    /// Time between two ticks.
    pub interval: Duration,
}

/// Creates an animator over `bars`.
pub fn new(bars: Vec<bar::Model>, opts: &[AnimatorOption]) -> Model {
    let mut m = Model {
        id: next_id(),
        tag: 0,
        bars,
        run: None,
        last_stop: None,
        interval: DEFAULT_INTERVAL,
    };

    for opt in opts {
        opt.apply(&mut m);
    }

    m
}

impl Model {
    /// Unique id of this animator; tick messages carry it.
    pub fn id(&self) -> i64 {
        self.id
    }

    /// Every bar, in display order.
    pub fn bars(&self) -> &[bar::Model] {
        &self.bars
    }

    /// The bar answering to `key`.
    pub fn bar(&self, key: &str) -> Option<&bar::Model> {
        self.bars.iter().find(|b| b.key() == key)
    }

    /// Whether a run is in progress.
    pub fn state(&self) -> State {
        if self.run.is_some() {
            State::Running
        } else {
            State::Idle
        }
    }

    /// The run in progress, if any.
    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    /// How the most recent run ended.
    pub fn last_stop(&self) -> Option<StopReason> {
        self.last_stop
    }

    /// A handle that cancels the run in progress.
    pub fn cancel_token(&self) -> Option<CancelToken> {
        self.run.as_ref().map(|r| r.token.clone())
    }

    /// Cancels the run in progress; it stops on its next tick.
    pub fn cancel(&self) {
        if let Some(run) = &self.run {
            run.token.cancel();
        }
    }

    /// Starts moving the bar `bar_key` by `delta` percent.
    ///
    /// Disables every button, colours the bar by whether the goal is in
    /// range, and returns the command for the first tick. Only one run may be
    /// in progress at a time.
    ///
    /// ```rust
    /// use crumbtrail_widgets::animator::{self, State};
    /// use crumbtrail_widgets::bar::{self, with_percent, BarColor};
    /// use crumbtrail_widgets::buttons;
    /// use crumbtrail_widgets::Error;
    ///
    /// let mut buttons = buttons::Model::default();
    /// let mut anim = animator::new(vec![bar::new("1", &[with_percent(90)])], &[]);
    ///
    /// let _tick = anim.start("1", 20, &mut buttons).unwrap();
    /// assert_eq!(anim.bar("1").unwrap().color(), BarColor::Alert);
    /// assert!(matches!(
    ///     anim.start("1", 5, &mut buttons),
    ///     Err(Error::AnimationInProgress(_))
    /// ));
    /// ```
    pub fn start(
        &mut self,
        bar_key: &str,
        delta: i32,
        buttons: &mut buttons::Model,
    ) -> Result<Cmd> {
        if let Some(run) = &self.run {
            log::warn!(
                "ignoring adjustment of bar `{}` while bar `{}` is animating",
                bar_key,
                run.bar
            );
            return Err(Error::AnimationInProgress(run.bar.clone()));
        }

        let slot = self
            .bars
            .iter()
            .position(|b| b.key() == bar_key)
            .ok_or_else(|| Error::UnknownBar(bar_key.to_string()))?;
        let bar = &mut self.bars[slot];

        buttons.set_disabled(true);

        let mut run = Run::new(bar_key, bar.percent(), delta);
        run.slot = slot;
        bar.set_color(if run.goal_in_range() {
            BarColor::Normal
        } else {
            BarColor::Alert
        });

        log::debug!(
            "animating bar `{}` from {} toward {} (delta {})",
            bar_key,
            bar.percent(),
            run.goal,
            delta
        );

        self.run = Some(run);
        self.tag += 1;
        Ok(self.tick())
    }

    /// Starts a run on the bar chosen in the selection control.
    ///
    /// ```rust
    /// use crumbtrail_widgets::animator;
    /// use crumbtrail_widgets::bar::{self, with_percent};
    /// use crumbtrail_widgets::buttons;
    /// use crumbtrail_widgets::select::{self, SelectOption};
    ///
    /// let mut buttons = buttons::Model::default();
    /// let selection = select::Model::new(vec![SelectOption::new("Bar A", "a")]);
    /// let mut anim = animator::new(vec![bar::new("a", &[with_percent(10)])], &[]);
    ///
    /// let _tick = anim.adjust(-5, &selection, &mut buttons).unwrap();
    /// while anim.advance(&mut buttons).is_some() {}
    /// assert_eq!(anim.bar("a").unwrap().label(), "5%");
    /// ```
    pub fn adjust(
        &mut self,
        delta: i32,
        selection: &select::Model,
        buttons: &mut buttons::Model,
    ) -> Result<Cmd> {
        let key = selection.value().ok_or(Error::NothingSelected)?.to_string();
        self.start(&key, delta, buttons)
    }

    /// Advances the run in progress by one tick.
    ///
    /// Returns `None` when there is no run. A [`Step::Stopped`] result means
    /// the stop effects have been applied and the animator is idle again.
    pub fn advance(&mut self, buttons: &mut buttons::Model) -> Option<Step> {
        let run = self.run.as_mut()?;
        let bar = &mut self.bars[run.slot];

        let step = run.step(bar);
        match step {
            Step::Moved(width) => {
                log::trace!("bar `{}` at {}%", run.bar, width);
            }
            Step::Stopped(reason) => {
                bar.sync_label();
                buttons.set_disabled(false);
                log::debug!(
                    "bar `{}` stopped at {}% after {} ticks ({:?})",
                    run.bar,
                    bar.percent(),
                    run.ticks,
                    reason
                );
                self.last_stop = Some(reason);
                self.run = None;
            }
        }
        Some(step)
    }

    /// Handles tick messages, returning the next tick while the run lasts.
    ///
    /// Ticks addressed to another animator, or left over from an earlier
    /// run, are ignored.
    ///
    /// ```rust
    /// use bubbletea_rs::Msg;
    /// use crumbtrail_widgets::animator;
    /// use crumbtrail_widgets::buttons;
    ///
    /// let mut buttons = buttons::Model::default();
    /// let mut anim = animator::Model::default();
    /// let msg: Msg = Box::new("not a tick");
    /// assert!(anim.update(&msg, &mut buttons).is_none());
    /// ```
    pub fn update(&mut self, msg: &Msg, buttons: &mut buttons::Model) -> Option<Cmd> {
        let tick_msg = msg.downcast_ref::<TickMsg>()?;

        // Ticks from another animator or from a finished run are dropped.
        if tick_msg.id != self.id || tick_msg.tag != self.tag {
            return None;
        }

        match self.advance(buttons)? {
            Step::Moved(_) => Some(self.tick()),
            Step::Stopped(_) => None,
        }
    }

    fn tick(&self) -> Cmd {
        let id = self.id;
        let tag = self.tag;
        bubbletea_tick(self.interval, move |_| Box::new(TickMsg { id, tag }) as Msg)
    }

    /// Renders each bar on its own line.
    pub fn view(&self) -> String {
        self.bars
            .iter()
            .map(bar::Model::view)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Model {
    fn default() -> Self {
        new(Vec::new(), &[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::with_percent;

    fn animator_at(width: i32) -> Model {
        new(vec![bar::new("1", &[with_percent(width)])], &[])
    }

    fn run_to_end(anim: &mut Model, buttons: &mut buttons::Model) -> u32 {
        let mut moves = 0;
        while let Some(step) = anim.advance(buttons) {
            assert!(moves <= 100, "run did not terminate");
            if let Step::Moved(_) = step {
                moves += 1;
            }
        }
        moves
    }

    #[test]
    fn test_new_defaults() {
        let anim = Model::default();
        assert_eq!(anim.interval, DEFAULT_INTERVAL);
        assert_eq!(anim.state(), State::Idle);
        assert!(anim.id() > 0);
        assert!(anim.last_stop().is_none());
    }

    #[test]
    fn test_with_interval() {
        let anim = new(Vec::new(), &[with_interval(Duration::from_millis(50))]);
        assert_eq!(anim.interval, Duration::from_millis(50));
    }

    #[test]
    fn test_unique_ids() {
        assert_ne!(Model::default().id(), Model::default().id());
    }

    #[test]
    fn test_run_goal_is_not_clamped() {
        let run = Run::new("1", 90, 20);
        assert_eq!(run.goal(), 110);
        assert!(!run.goal_in_range());

        let run = Run::new("1", 0, -10);
        assert_eq!(run.goal(), -10);
        assert!(!run.goal_in_range());

        assert!(Run::new("1", 50, 50).goal_in_range());
    }

    #[test]
    fn test_start_disables_buttons_and_sets_color() {
        let mut buttons = buttons::Model::default();
        let mut anim = animator_at(90);

        let _cmd = anim.start("1", 20, &mut buttons).unwrap();
        assert_eq!(anim.state(), State::Running);
        assert!(buttons.all_disabled());
        assert_eq!(anim.bar("1").unwrap().color(), BarColor::Alert);
        assert_eq!(anim.run().unwrap().goal(), 110);
    }

    #[test]
    fn test_in_range_resets_color_to_normal() {
        let mut buttons = buttons::Model::default();
        let mut anim = animator_at(95);

        let _cmd = anim.start("1", 20, &mut buttons).unwrap();
        run_to_end(&mut anim, &mut buttons);
        assert_eq!(anim.bar("1").unwrap().color(), BarColor::Alert);

        let _cmd = anim.start("1", -20, &mut buttons).unwrap();
        assert_eq!(anim.bar("1").unwrap().color(), BarColor::Normal);
        run_to_end(&mut anim, &mut buttons);
        assert_eq!(anim.bar("1").unwrap().percent(), 80);
    }

    #[test]
    fn test_unknown_bar_leaves_buttons_alone() {
        let mut buttons = buttons::Model::default();
        let mut anim = animator_at(10);

        let err = anim.start("9", 10, &mut buttons).err();
        assert_eq!(err, Some(Error::UnknownBar("9".to_string())));
        assert!(!buttons.all_disabled());
        assert_eq!(anim.state(), State::Idle);
    }

    #[test]
    fn test_second_start_is_rejected_while_running() {
        let mut buttons = buttons::Model::default();
        let mut anim = new(
            vec![
                bar::new("1", &[with_percent(10)]),
                bar::new("2", &[with_percent(10)]),
            ],
            &[],
        );

        let _cmd = anim.start("1", 10, &mut buttons).unwrap();
        let err = anim.start("2", 10, &mut buttons).err();
        assert_eq!(err, Some(Error::AnimationInProgress("1".to_string())));
        assert_eq!(anim.run().unwrap().bar_key(), "1");
    }

    #[test]
    fn test_adjust_reads_selection() {
        let mut buttons = buttons::Model::default();
        let mut selection = select::Model::new(vec![
            select::SelectOption::new("Bar 1", "1"),
            select::SelectOption::new("Bar 2", "2"),
        ]);
        selection.select("2");
        let mut anim = new(
            vec![
                bar::new("1", &[with_percent(10)]),
                bar::new("2", &[with_percent(10)]),
            ],
            &[],
        );

        let _cmd = anim.adjust(5, &selection, &mut buttons).unwrap();
        run_to_end(&mut anim, &mut buttons);
        assert_eq!(anim.bar("1").unwrap().percent(), 10);
        assert_eq!(anim.bar("2").unwrap().percent(), 15);
        assert_eq!(anim.bar("2").unwrap().label(), "15%");
    }

    #[test]
    fn test_run_moves_only_the_started_bar() {
        let mut buttons = buttons::Model::default();
        let mut anim = new(
            vec![
                bar::new("1", &[with_percent(10)]),
                bar::new("2", &[with_percent(20)]),
                bar::new("3", &[with_percent(30)]),
            ],
            &[],
        );

        let _cmd = anim.start("3", -4, &mut buttons).unwrap();
        let mut steps = Vec::new();
        while let Some(step) = anim.advance(&mut buttons) {
            steps.push(step);
        }

        assert_eq!(steps.len(), 5);
        assert_eq!(steps[4], Step::Stopped(StopReason::GoalReached));
        assert_eq!(anim.last_stop(), Some(StopReason::GoalReached));
        assert_eq!(anim.bar("3").unwrap().label(), "26%");
        assert_eq!(anim.bar("1").unwrap().percent(), 10);
        assert_eq!(anim.bar("2").unwrap().percent(), 20);
        assert!(!buttons.all_disabled());
    }

    #[test]
    fn test_adjust_with_empty_selection() {
        let mut buttons = buttons::Model::default();
        let mut anim = animator_at(10);
        let err = anim
            .adjust(5, &select::Model::new(Vec::new()), &mut buttons)
            .err();
        assert_eq!(err, Some(Error::NothingSelected));
    }

    #[test]
    fn test_zero_delta_stops_on_first_tick() {
        let mut buttons = buttons::Model::default();
        let mut anim = animator_at(40);

        let _cmd = anim.start("1", 0, &mut buttons).unwrap();
        assert_eq!(
            anim.advance(&mut buttons),
            Some(Step::Stopped(StopReason::GoalReached))
        );
        assert_eq!(anim.state(), State::Idle);
        assert!(!buttons.all_disabled());
        assert_eq!(anim.bar("1").unwrap().percent(), 40);
    }

    #[test]
    fn test_steps_one_percent_per_tick() {
        let mut buttons = buttons::Model::default();
        let mut anim = animator_at(50);

        let _cmd = anim.start("1", -3, &mut buttons).unwrap();
        assert_eq!(anim.advance(&mut buttons), Some(Step::Moved(49)));
        assert_eq!(anim.advance(&mut buttons), Some(Step::Moved(48)));
        assert_eq!(anim.advance(&mut buttons), Some(Step::Moved(47)));
        // Label only follows the width once the run stops.
        assert_eq!(anim.bar("1").unwrap().label(), "50%");
        assert_eq!(
            anim.advance(&mut buttons),
            Some(Step::Stopped(StopReason::GoalReached))
        );
        assert_eq!(anim.bar("1").unwrap().label(), "47%");
        assert_eq!(anim.advance(&mut buttons), None);
    }

    #[test]
    fn test_upper_and_lower_bounds() {
        let mut buttons = buttons::Model::default();

        let mut anim = animator_at(98);
        let _cmd = anim.start("1", 5, &mut buttons).unwrap();
        assert_eq!(run_to_end(&mut anim, &mut buttons), 2);
        assert_eq!(anim.last_stop(), Some(StopReason::UpperBound));
        assert_eq!(anim.bar("1").unwrap().label(), "100%");

        let mut anim = animator_at(0);
        let _cmd = anim.start("1", -10, &mut buttons).unwrap();
        assert_eq!(run_to_end(&mut anim, &mut buttons), 0);
        assert_eq!(anim.last_stop(), Some(StopReason::LowerBound));
        assert_eq!(anim.bar("1").unwrap().label(), "0%");
    }

    #[test]
    fn test_cancel_stops_on_next_tick() {
        let mut buttons = buttons::Model::default();
        let mut anim = animator_at(10);

        let _cmd = anim.start("1", 50, &mut buttons).unwrap();
        anim.advance(&mut buttons);
        let token = anim.cancel_token().unwrap();
        token.cancel();

        assert_eq!(
            anim.advance(&mut buttons),
            Some(Step::Stopped(StopReason::Cancelled))
        );
        assert_eq!(anim.state(), State::Idle);
        assert!(!buttons.all_disabled());
        assert_eq!(anim.bar("1").unwrap().label(), "11%");
    }

    #[test]
    fn test_cancel_without_run_is_noop() {
        let anim = animator_at(10);
        anim.cancel();
        assert!(anim.cancel_token().is_none());
    }

    #[test]
    fn test_update_with_tick_msg() {
        let mut buttons = buttons::Model::default();
        let mut anim = animator_at(10);
        let _cmd = anim.start("1", 2, &mut buttons).unwrap();

        let (id, tag) = (anim.id, anim.tag);
        let tick = || -> Msg { Box::new(TickMsg { id, tag }) };
        let first = tick();
        assert!(anim.update(&first, &mut buttons).is_some());
        let second = tick();
        assert!(anim.update(&second, &mut buttons).is_some());
        let last = tick();
        assert!(anim.update(&last, &mut buttons).is_none());
        assert_eq!(anim.bar("1").unwrap().percent(), 12);
        assert_eq!(anim.state(), State::Idle);
    }

    #[test]
    fn test_update_rejects_foreign_and_stale_ticks() {
        let mut buttons = buttons::Model::default();
        let mut anim = animator_at(10);
        let _cmd = anim.start("1", 5, &mut buttons).unwrap();

        let wrong_id: Msg = Box::new(TickMsg {
            id: anim.id + 999,
            tag: anim.tag,
        });
        assert!(anim.update(&wrong_id, &mut buttons).is_none());

        let stale: Msg = Box::new(TickMsg {
            id: anim.id,
            tag: anim.tag - 1,
        });
        assert!(anim.update(&stale, &mut buttons).is_none());

        assert_eq!(anim.bar("1").unwrap().percent(), 10);
        assert_eq!(anim.run().unwrap().ticks(), 0);
    }

    #[test]
    fn test_update_ignores_other_messages() {
        let mut buttons = buttons::Model::default();
        let mut anim = animator_at(10);
        let msg: Msg = Box::new("not a tick");
        assert!(anim.update(&msg, &mut buttons).is_none());
    }

    #[test]
    fn test_view_renders_every_bar() {
        let anim = new(
            vec![
                bar::new("1", &[with_percent(10)]),
                bar::new("2", &[with_percent(90)]),
            ],
            &[],
        );
        let view = strip_ansi_escapes::strip_str(anim.view());
        let lines: Vec<&str> = view.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("10%"));
        assert!(lines[1].ends_with("90%"));
    }
}
