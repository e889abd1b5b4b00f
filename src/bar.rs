//! Progress bar component.
//!
//! A bar holds an integer width in `[0, 100]` percent, a colour state and the
//! numeric label that sits next to it. Bars never animate themselves; the
//! [`animator`](crate::animator) moves them one percent at a time and syncs
//! the label when a run stops.
//!
//! # Basic Usage
//!
//! ```rust
//! use crumbtrail_widgets::bar::{new, with_percent, with_width};
//!
//! let bar = new("1", &[with_width(20), with_percent(50)]);
//! assert_eq!(bar.percent(), 50);
//! assert_eq!(bar.label(), "50%");
//! assert_eq!(bar.element_id(), "barProgress1");
//! ```

use lipgloss_extras::lipgloss;
use lipgloss_extras::prelude::*;

/// Prefix of a bar's element id; the bar key is appended to it.
pub const BAR_PREFIX: &str = "barProgress";
/// Prefix of a bar label's element id; the bar key is appended to it.
pub const LABEL_PREFIX: &str = "percentValue";

const DEFAULT_WIDTH: i32 = 40;
const DEFAULT_NORMAL_COLOR: &str = "#FFA500";
const DEFAULT_ALERT_COLOR: &str = "#FF0000";
const DEFAULT_EMPTY_COLOR: &str = "#606060";

/// Lowest width a bar can show.
pub const MIN_PERCENT: i32 = 0;
/// Highest width a bar can show.
pub const MAX_PERCENT: i32 = 100;

/// Colour state of the filled portion of a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BarColor {
    /// The run in progress is heading for a goal inside `[0, 100]`.
    #[default]
    Normal,
    /// The run in progress was asked for a goal outside `[0, 100]`.
    Alert,
}

/// Configuration options for a progress bar.
///
/// ```rust
/// use crumbtrail_widgets::bar::{new, with_alert_color, with_fill_characters, without_label};
///
/// let bar = new("2", &[
///     with_fill_characters('=', '-'),
///     with_alert_color("#ff00ff".to_string()),
///     without_label(),
/// ]);
/// assert!(!bar.show_label);
/// ```
pub enum BarOption {
    /// Total width of the bar in terminal cells, label included.
    WithWidth(i32),
    /// Characters for the filled and empty portions.
    WithFillCharacters(char, char),
    /// Fill colour while the run's goal is in range.
    WithNormalColor(String),
    /// Fill colour while the run's goal is out of range.
    WithAlertColor(String),
    /// Colour of the empty portion.
    WithEmptyColor(String),
    /// Starting width, clamped into `[0, 100]`.
    WithPercent(i32),
    /// Hides the numeric label.
    WithoutLabel,
}

impl BarOption {
    fn apply(&self, m: &mut Model) {
        match self {
            BarOption::WithWidth(width) => m.width = *width,
            BarOption::WithFillCharacters(full, empty) => {
                m.full = *full;
                m.empty = *empty;
            }
            BarOption::WithNormalColor(color) => m.normal_color = color.clone(),
            BarOption::WithAlertColor(color) => m.alert_color = color.clone(),
            BarOption::WithEmptyColor(color) => m.empty_color = color.clone(),
            BarOption::WithPercent(p) => {
                m.percent = (*p).clamp(MIN_PERCENT, MAX_PERCENT);
                m.sync_label();
            }
            BarOption::WithoutLabel => m.show_label = false,
        }
    }
}

/// Sets the total width of the bar in cells.
pub fn with_width(w: i32) -> BarOption {
    BarOption::WithWidth(w)
}

/// Customizes the filled and empty characters (defaults: `█` and `░`).
pub fn with_fill_characters(full: char, empty: char) -> BarOption {
    BarOption::WithFillCharacters(full, empty)
}

/// Sets the fill colour used while a run's goal is within range.
pub fn with_normal_color(color: String) -> BarOption {
    BarOption::WithNormalColor(color)
}

/// Sets the fill colour used while a run's goal is out of range.
pub fn with_alert_color(color: String) -> BarOption {
    BarOption::WithAlertColor(color)
}

/// Sets the colour of the empty portion.
pub fn with_empty_color(color: String) -> BarOption {
    BarOption::WithEmptyColor(color)
}

/// Sets the starting width; the label is synced to it.
pub fn with_percent(p: i32) -> BarOption {
    BarOption::WithPercent(p)
}

/// Hides the numeric label.
pub fn without_label() -> BarOption {
    BarOption::WithoutLabel
}

/// A progress bar addressed by its key.
#[derive(Debug, Clone)]
pub struct Model {
    key: String,
    percent: i32,
    color: BarColor,
    label: String,

    /// Total width in cells, label included.
    pub width: i32,
    /// Character for the filled portion.
    pub full: char,
    /// Character for the empty portion.
    pub empty: char,
    /// Fill colour in the [`BarColor::Normal`] state.
    pub normal_color: String,
    /// Fill colour in the [`BarColor::Alert`] state.
    pub alert_color: String,
    /// Colour of the empty portion.
    pub empty_color: String,
    /// Whether `view` appends the label.
    pub show_label: bool,
    /// Style applied to the label.
    pub label_style: Style,
}

/// Creates a bar answering to `key` with the given options applied.
pub fn new(key: impl Into<String>, opts: &[BarOption]) -> Model {
    let mut m = Model {
        key: key.into(),
        percent: MIN_PERCENT,
        color: BarColor::Normal,
        label: String::new(),
        width: DEFAULT_WIDTH,
        full: '█',
        empty: '░',
        normal_color: DEFAULT_NORMAL_COLOR.to_string(),
        alert_color: DEFAULT_ALERT_COLOR.to_string(),
        empty_color: DEFAULT_EMPTY_COLOR.to_string(),
        show_label: true,
        label_style: Style::new(),
    };
    m.sync_label();

    for opt in opts {
        opt.apply(&mut m);
    }

    m
}

impl Model {
    /// The key this bar is selected by.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Identifier of the bar element, `barProgress<key>`.
    pub fn element_id(&self) -> String {
        format!("{}{}", BAR_PREFIX, self.key)
    }

    /// Identifier of the label element, `percentValue<key>`.
    pub fn label_id(&self) -> String {
        format!("{}{}", LABEL_PREFIX, self.key)
    }

    /// Current width in percent.
    pub fn percent(&self) -> i32 {
        self.percent
    }

    /// Writes a new width, clamped into `[0, 100]`.
    ///
    /// The label is left alone; it only follows the width when
    /// [`sync_label`](Self::sync_label) is called.
    pub fn set_percent(&mut self, p: i32) {
        self.percent = p.clamp(MIN_PERCENT, MAX_PERCENT);
    }

    /// Current colour state.
    pub fn color(&self) -> BarColor {
        self.color
    }

    /// Switches the fill between the normal and alert colours.
    pub fn set_color(&mut self, color: BarColor) {
        self.color = color;
    }

    /// Text of the numeric label, e.g. `"80%"`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Copies the current width into the label.
    pub fn sync_label(&mut self) {
        self.label = format!("{}%", self.percent);
    }

    fn fill_color(&self) -> &str {
        match self.color {
            BarColor::Normal => &self.normal_color,
            BarColor::Alert => &self.alert_color,
        }
    }

    /// Renders the bar followed by its label.
    pub fn view(&self) -> String {
        let label_view = self.label_view();
        let label_width = lipgloss::width_visible(&label_view) as i32;
        format!("{}{}", self.bar_view(label_width), label_view)
    }

    fn bar_view(&self, text_width: i32) -> String {
        let tw = std::cmp::max(0, self.width - text_width);
        let fw = (tw * self.percent + MAX_PERCENT / 2) / MAX_PERCENT;
        let fw = fw.clamp(0, tw);

        let filled = Style::new()
            .foreground(Color::from(self.fill_color()))
            .render(&self.full.to_string());
        let empty = Style::new()
            .foreground(Color::from(self.empty_color.as_str()))
            .render(&self.empty.to_string());

        let mut result = filled.repeat(fw as usize);
        result.push_str(&empty.repeat((tw - fw) as usize));
        result
    }

    fn label_view(&self) -> String {
        if !self.show_label {
            return String::new();
        }
        self.label_style.render(&format!(" {:>4}", self.label))
    }
}

impl Default for Model {
    fn default() -> Self {
        new("", &[])
    }
}
