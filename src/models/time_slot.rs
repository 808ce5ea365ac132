//! Weekly time grid coordinates.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A (day, period) cell in the weekly grid.
///
/// Both coordinates are zero-based. Equality, hashing and ordering are by
/// `(day, period)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSlot {
    pub day: u8,
    pub period: u8,
}

impl TimeSlot {
    pub fn new(day: u8, period: u8) -> Self {
        Self { day, period }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "day {} period {}", self.day + 1, self.period + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_equality_and_hash_by_coordinates() {
        let mut set = HashSet::new();
        assert!(set.insert(TimeSlot::new(0, 0)));
        assert!(!set.insert(TimeSlot::new(0, 0)));
        assert!(set.insert(TimeSlot::new(0, 1)));
        assert!(set.insert(TimeSlot::new(1, 0)));
    }

    #[test]
    fn test_ordering_is_day_major() {
        assert!(TimeSlot::new(0, 5) < TimeSlot::new(1, 0));
        assert!(TimeSlot::new(2, 1) < TimeSlot::new(2, 3));
    }
}
