//! Conflict rules.
//!
//! Each rule counts violations of one scheduling constraint. Rules are
//! independent and stateless: the reference data they need comes from the
//! [`Catalog`] passed at evaluation time, so a single rule set can be shared
//! across threads.
//!
//! # Rules
//!
//! | Rule | Counts |
//! |---|---|
//! | [`RoomConflicts`] | extra bookings of a room in one slot |
//! | [`RoomAccommodate`] | lessons in a room not equipped for the subject |
//! | [`GroupGaps`] / [`TeacherGaps`] | empty periods inside a day |
//! | [`MaxLessonsPerDay`] | group lessons above the daily ceiling |
//! | [`InvalidAssignments`] | teacher/subject and room/subject mismatches |
//! | [`GroupCollisions`] / [`TeacherCollisions`] | double-booked periods |
//! | [`LastLesson`] | Physical Culture not closing the day |
//! | [`Adjustment`] | distance from the weekly subject quotas |
//!
//! # Diagnostics
//!
//! Rules may flag offending lessons through [`ConflictMarks`]. Marking is a
//! side table indexed by lesson position and never changes the count.

mod adjustment;
mod assignments;
mod collisions;
mod daily;
mod gaps;
mod room;

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::models::{Lesson, Timetable};

pub use adjustment::{group_adjustment, Adjustment};
pub use assignments::InvalidAssignments;
pub use collisions::{GroupCollisions, TeacherCollisions};
pub use daily::{LastLesson, MaxLessonsPerDay};
pub use gaps::{GroupGaps, TeacherGaps};
pub use room::{RoomAccommodate, RoomConflicts};

/// Identifies what a [`ConflictRule`] measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConflictType {
    RoomConflicts,
    RoomAccommodate,
    GroupGaps,
    TeacherGaps,
    MaxLessonsPerDay,
    InvalidAssignments,
    GroupCollisions,
    TeacherCollisions,
    LastLesson,
    Adjustment,
}

impl ConflictType {
    pub const ALL: [ConflictType; 10] = [
        ConflictType::RoomConflicts,
        ConflictType::RoomAccommodate,
        ConflictType::GroupGaps,
        ConflictType::TeacherGaps,
        ConflictType::MaxLessonsPerDay,
        ConflictType::InvalidAssignments,
        ConflictType::GroupCollisions,
        ConflictType::TeacherCollisions,
        ConflictType::LastLesson,
        ConflictType::Adjustment,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            ConflictType::RoomConflicts => "Room Conflicts",
            ConflictType::RoomAccommodate => "Room Accommodate",
            ConflictType::GroupGaps => "Group Gaps",
            ConflictType::TeacherGaps => "Teacher Gaps",
            ConflictType::MaxLessonsPerDay => "Max Lessons Per Day",
            ConflictType::InvalidAssignments => "Invalid Assignments",
            ConflictType::GroupCollisions => "Group Collisions",
            ConflictType::TeacherCollisions => "Teacher Collisions",
            ConflictType::LastLesson => "Last Lesson",
            ConflictType::Adjustment => "Adjustment",
        }
    }

    /// Creates the rule that measures this conflict type.
    pub fn rule(self) -> Box<dyn ConflictRule> {
        match self {
            ConflictType::RoomConflicts => Box::new(RoomConflicts),
            ConflictType::RoomAccommodate => Box::new(RoomAccommodate),
            ConflictType::GroupGaps => Box::new(GroupGaps),
            ConflictType::TeacherGaps => Box::new(TeacherGaps),
            ConflictType::MaxLessonsPerDay => Box::new(MaxLessonsPerDay),
            ConflictType::InvalidAssignments => Box::new(InvalidAssignments),
            ConflictType::GroupCollisions => Box::new(GroupCollisions),
            ConflictType::TeacherCollisions => Box::new(TeacherCollisions),
            ConflictType::LastLesson => Box::new(LastLesson),
            ConflictType::Adjustment => Box::new(Adjustment),
        }
    }
}

impl fmt::Display for ConflictType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A pluggable scoring strategy counting one category of violation.
///
/// # Implementing
///
/// ```ignore
/// #[derive(Debug)]
/// struct NoSaturdays;
///
/// impl ConflictRule for NoSaturdays {
///     fn conflict_type(&self) -> ConflictType { ConflictType::MaxLessonsPerDay }
///
///     fn evaluate(&self, _: &Catalog, t: &Timetable, marks: &mut ConflictMarks) -> u32 {
///         let mut count = 0;
///         for (i, lesson) in t.lessons().iter().enumerate() {
///             if lesson.day() == 5 {
///                 marks.mark(i);
///                 count += 1;
///             }
///         }
///         count
///     }
/// }
/// ```
pub trait ConflictRule: Send + Sync + fmt::Debug {
    /// What this rule measures.
    fn conflict_type(&self) -> ConflictType;

    /// Counts violations in `timetable`, flagging offending lessons in `marks`.
    ///
    /// The returned count must not depend on whether marking is enabled.
    fn evaluate(&self, catalog: &Catalog, timetable: &Timetable, marks: &mut ConflictMarks)
        -> u32;

    /// Counts violations without collecting diagnostics.
    fn calculate_conflicts(&self, catalog: &Catalog, timetable: &Timetable) -> u32 {
        self.evaluate(catalog, timetable, &mut ConflictMarks::disabled())
    }
}

/// Per-lesson "conflicted" flags collected during a diagnostic evaluation.
///
/// Indexed by lesson position in the timetable. A disabled instance ignores
/// every mark and allocates nothing.
#[derive(Debug, Clone, Default)]
pub struct ConflictMarks {
    flags: Option<Vec<bool>>,
}

impl ConflictMarks {
    /// Marks that discard everything.
    pub fn disabled() -> Self {
        Self { flags: None }
    }

    /// Marks sized for `timetable`, all clear.
    pub fn for_timetable(timetable: &Timetable) -> Self {
        Self {
            flags: Some(vec![false; timetable.len()]),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.flags.is_some()
    }

    /// Flags the lesson at `index` as conflicted.
    pub fn mark(&mut self, index: usize) {
        if let Some(slot) = self.flags.as_mut().and_then(|f| f.get_mut(index)) {
            *slot = true;
        }
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.flags
            .as_ref()
            .and_then(|f| f.get(index))
            .copied()
            .unwrap_or(false)
    }

    /// Number of flagged lessons.
    pub fn marked_count(&self) -> usize {
        self.flags
            .as_ref()
            .map_or(0, |f| f.iter().filter(|&&b| b).count())
    }

    /// Consumes the marks, returning one flag per lesson (empty if disabled).
    pub fn into_flags(self) -> Vec<bool> {
        self.flags.unwrap_or_default()
    }
}

/// All ten rules in [`ConflictType::ALL`] order.
pub fn standard_rules() -> Vec<Box<dyn ConflictRule>> {
    ConflictType::ALL.into_iter().map(ConflictType::rule).collect()
}

/// Lesson positions bucketed by `(entity id, day)`, each bucket sorted by
/// period. Lessons sharing a period keep chromosome order.
pub(crate) struct DayBuckets {
    buckets: HashMap<(u32, u8), Vec<usize>>,
}

impl DayBuckets {
    pub(crate) fn by_group(timetable: &Timetable) -> Self {
        Self::build(timetable, |l| l.group().id)
    }

    pub(crate) fn by_teacher(timetable: &Timetable) -> Self {
        Self::build(timetable, |l| l.teacher().id)
    }

    fn build(timetable: &Timetable, key: impl Fn(&Lesson) -> u32) -> Self {
        let lessons = timetable.lessons();
        let mut buckets: HashMap<(u32, u8), Vec<usize>> = HashMap::new();
        for (i, lesson) in lessons.iter().enumerate() {
            buckets.entry((key(lesson), lesson.day())).or_default().push(i);
        }
        for indices in buckets.values_mut() {
            indices.sort_by_key(|&i| lessons[i].period());
        }
        Self { buckets }
    }

    /// Positions for `id` on `day`, sorted by period.
    pub(crate) fn get(&self, id: u32, day: u8) -> &[usize] {
        self.buckets.get(&(id, day)).map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Subject;
    use crate::test_support::{lesson, small_catalog, feasible_timetable};

    #[test]
    fn test_standard_rules_cover_every_type() {
        let rules = standard_rules();
        let types: Vec<ConflictType> = rules.iter().map(|r| r.conflict_type()).collect();
        assert_eq!(types, ConflictType::ALL.to_vec());
    }

    #[test]
    fn test_feasible_timetable_has_no_conflicts() {
        let catalog = small_catalog();
        let timetable = feasible_timetable(&catalog);
        for rule in standard_rules() {
            assert_eq!(
                rule.calculate_conflicts(&catalog, &timetable),
                0,
                "{} should be clean",
                rule.conflict_type()
            );
        }
    }

    #[test]
    fn test_marks_do_not_change_counts() {
        let catalog = small_catalog();
        let timetable = Timetable::new(vec![
            lesson(&catalog, Subject::Math, 1, 1, 0, 0),
            lesson(&catalog, Subject::Math, 1, 1, 0, 0),
            lesson(&catalog, Subject::PhysicalCulture, 1, 1, 0, 3),
            lesson(&catalog, Subject::Informatics, 1, 1, 0, 5),
        ]);
        for rule in standard_rules() {
            let mut marks = ConflictMarks::for_timetable(&timetable);
            let with_marks = rule.evaluate(&catalog, &timetable, &mut marks);
            let without = rule.calculate_conflicts(&catalog, &timetable);
            assert_eq!(with_marks, without, "{}", rule.conflict_type());
        }
    }

    #[test]
    fn test_disabled_marks_ignore_everything() {
        let mut marks = ConflictMarks::disabled();
        marks.mark(3);
        assert!(!marks.is_enabled());
        assert!(!marks.is_marked(3));
        assert!(marks.into_flags().is_empty());
    }

    #[test]
    fn test_marks_out_of_range_ignored() {
        let catalog = small_catalog();
        let timetable = feasible_timetable(&catalog);
        let mut marks = ConflictMarks::for_timetable(&timetable);
        marks.mark(1);
        marks.mark(999);
        assert_eq!(marks.marked_count(), 1);
        assert!(marks.is_marked(1));
    }

    #[test]
    fn test_day_buckets_sorted() {
        let catalog = small_catalog();
        let timetable = Timetable::new(vec![
            lesson(&catalog, Subject::Math, 1, 1, 2, 4),
            lesson(&catalog, Subject::Physics, 1, 4, 2, 1),
            lesson(&catalog, Subject::Math, 1, 1, 3, 0),
        ]);
        let buckets = DayBuckets::by_group(&timetable);
        assert_eq!(buckets.get(1, 2), &[1, 0]);
        assert_eq!(buckets.get(1, 3), &[2]);
        assert!(buckets.get(1, 0).is_empty());
        assert!(buckets.get(42, 2).is_empty());
    }
}
