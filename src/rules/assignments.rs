//! Assignment validity.

use super::{ConflictMarks, ConflictRule, ConflictType};
use crate::catalog::Catalog;
use crate::models::Timetable;

/// Counts lessons whose teacher does not teach the subject, plus lessons
/// whose classroom cannot host it.
///
/// A lesson wrong on both counts contributes 2. Room incompatibility is
/// also measured by [`RoomAccommodate`](super::RoomAccommodate); the double
/// penalty is intentional.
#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidAssignments;

impl ConflictRule for InvalidAssignments {
    fn conflict_type(&self) -> ConflictType {
        ConflictType::InvalidAssignments
    }

    fn evaluate(&self, _: &Catalog, timetable: &Timetable, marks: &mut ConflictMarks) -> u32 {
        let mut invalid = 0;
        for (i, lesson) in timetable.lessons().iter().enumerate() {
            if lesson.teacher().subject != lesson.subject() {
                marks.mark(i);
                invalid += 1;
            }
            if !lesson.classroom().can_accommodate(lesson.subject()) {
                marks.mark(i);
                invalid += 1;
            }
        }
        invalid
    }
}
