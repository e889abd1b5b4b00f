//! Error type shared by the widgets in this crate.

use thiserror::Error;

/// Failures of a single interaction with the widgets.
///
/// None of these are fatal to the model: the interaction that produced the
/// error is abandoned and the rest of the page keeps working.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A breadcrumb id that is not part of the trail was activated.
    #[error("no breadcrumb step with id `{0}`")]
    UnknownStep(String),
    /// A bar key that no progress bar answers to.
    #[error("no progress bar with key `{0}`")]
    UnknownBar(String),
    /// The selection control has no options to read a bar key from.
    #[error("bar selection is empty")]
    NothingSelected,
    /// A run was requested while another one still holds the button lock.
    #[error("an animation is already running on bar `{0}`")]
    AnimationInProgress(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
