//! Double-booking rules for groups and teachers.

use std::collections::BTreeMap;

use super::{ConflictMarks, ConflictRule, ConflictType, DayBuckets};
use crate::catalog::Catalog;
use crate::models::Timetable;

/// Counts group lessons sharing a period beyond the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupCollisions;

impl ConflictRule for GroupCollisions {
    fn conflict_type(&self) -> ConflictType {
        ConflictType::GroupCollisions
    }

    fn evaluate(&self, catalog: &Catalog, timetable: &Timetable, marks: &mut ConflictMarks) -> u32 {
        let buckets = DayBuckets::by_group(timetable);
        let mut total = 0;
        for group in catalog.groups() {
            for day in catalog.calendar().days() {
                total += collisions_in_day(timetable, buckets.get(group.id, day), marks);
            }
        }
        total
    }
}

/// Counts teacher lessons sharing a period beyond the first.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeacherCollisions;

impl ConflictRule for TeacherCollisions {
    fn conflict_type(&self) -> ConflictType {
        ConflictType::TeacherCollisions
    }

    fn evaluate(&self, catalog: &Catalog, timetable: &Timetable, marks: &mut ConflictMarks) -> u32 {
        let buckets = DayBuckets::by_teacher(timetable);
        let mut total = 0;
        for teacher in catalog.teachers() {
            for day in catalog.calendar().days() {
                total += collisions_in_day(timetable, buckets.get(teacher.id, day), marks);
            }
        }
        total
    }
}

/// N lessons in one period contribute N − 1; every lesson in a collided
/// period is marked.
fn collisions_in_day(timetable: &Timetable, day: &[usize], marks: &mut ConflictMarks) -> u32 {
    if day.len() <= 1 {
        return 0;
    }
    let lessons = timetable.lessons();
    let mut per_period: BTreeMap<u8, u32> = BTreeMap::new();
    for &i in day {
        *per_period.entry(lessons[i].period()).or_default() += 1;
    }

    let collisions = per_period.values().filter(|&&n| n > 1).map(|n| n - 1).sum();
    if marks.is_enabled() {
        for &i in day {
            if per_period[&lessons[i].period()] > 1 {
                marks.mark(i);
            }
        }
    }
    collisions
}
