//! Click counter for breadcrumb analytics.

/// A monotonic count of breadcrumb activations.
///
/// The counter starts at zero and only ever goes up. It is owned by whichever
/// model mediates breadcrumb interactions (see
/// [`breadcrumb::Model::with_counter`](crate::breadcrumb::Model::with_counter)).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClickCounter {
    value: u64,
}

impl ClickCounter {
    /// Creates a counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one click and returns the new total.
    pub fn increment(&mut self) -> u64 {
        self.value = self.value.saturating_add(1);
        self.value
    }

    /// Number of clicks recorded so far.
    pub fn value(&self) -> u64 {
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(ClickCounter::new().value(), 0);
    }

    #[test]
    fn test_increment_returns_total() {
        let mut counter = ClickCounter::new();
        assert_eq!(counter.increment(), 1);
        assert_eq!(counter.increment(), 2);
        assert_eq!(counter.value(), 2);
    }
}
