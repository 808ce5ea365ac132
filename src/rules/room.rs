//! Classroom rules.

use std::collections::HashSet;

use super::{ConflictMarks, ConflictRule, ConflictType};
use crate::catalog::Catalog;
use crate::models::{TimeSlot, Timetable};

/// Counts double-bookings of a classroom.
///
/// N lessons in the same room at the same slot contribute N − 1. The
/// second and later bookings are marked.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomConflicts;

impl ConflictRule for RoomConflicts {
    fn conflict_type(&self) -> ConflictType {
        ConflictType::RoomConflicts
    }

    fn evaluate(&self, _: &Catalog, timetable: &Timetable, marks: &mut ConflictMarks) -> u32 {
        let mut booked: HashSet<(TimeSlot, u32)> = HashSet::with_capacity(timetable.len());
        let mut conflicts = 0;
        for (i, lesson) in timetable.lessons().iter().enumerate() {
            if !booked.insert((lesson.time_slot(), lesson.classroom().id)) {
                marks.mark(i);
                conflicts += 1;
            }
        }
        conflicts
    }
}

/// Counts lessons held in a classroom not equipped for their subject.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomAccommodate;

impl ConflictRule for RoomAccommodate {
    fn conflict_type(&self) -> ConflictType {
        ConflictType::RoomAccommodate
    }

    fn evaluate(&self, _: &Catalog, timetable: &Timetable, marks: &mut ConflictMarks) -> u32 {
        let mut count = 0;
        for (i, lesson) in timetable.lessons().iter().enumerate() {
            if !lesson.classroom().can_accommodate(lesson.subject()) {
                marks.mark(i);
                count += 1;
            }
        }
        count
    }
}
