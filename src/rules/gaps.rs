//! "No gaps" rules: a day's lessons must be contiguous.

use super::{ConflictMarks, ConflictRule, ConflictType, DayBuckets};
use crate::catalog::Catalog;
use crate::models::Timetable;

/// Counts empty periods between a group's first and last lesson of each day.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupGaps;

impl ConflictRule for GroupGaps {
    fn conflict_type(&self) -> ConflictType {
        ConflictType::GroupGaps
    }

    fn evaluate(&self, catalog: &Catalog, timetable: &Timetable, marks: &mut ConflictMarks) -> u32 {
        let buckets = DayBuckets::by_group(timetable);
        let mut total = 0;
        for group in catalog.groups() {
            for day in catalog.calendar().days() {
                total += gaps_in_day(timetable, buckets.get(group.id, day), marks);
            }
        }
        total
    }
}

/// Counts empty periods between a teacher's first and last lesson of each day.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeacherGaps;

impl ConflictRule for TeacherGaps {
    fn conflict_type(&self) -> ConflictType {
        ConflictType::TeacherGaps
    }

    fn evaluate(&self, catalog: &Catalog, timetable: &Timetable, marks: &mut ConflictMarks) -> u32 {
        let buckets = DayBuckets::by_teacher(timetable);
        let mut total = 0;
        for teacher in catalog.teachers() {
            for day in catalog.calendar().days() {
                total += gaps_in_day(timetable, buckets.get(teacher.id, day), marks);
            }
        }
        total
    }
}

/// Sums empty periods in a period-sorted day. The lesson after each gap is
/// marked.
fn gaps_in_day(timetable: &Timetable, day: &[usize], marks: &mut ConflictMarks) -> u32 {
    let lessons = timetable.lessons();
    let mut gaps = 0;
    for pair in day.windows(2) {
        let prev = lessons[pair[0]].period() as u32;
        let cur = lessons[pair[1]].period() as u32;
        if cur > prev + 1 {
            marks.mark(pair[1]);
            gaps += cur - prev - 1;
        }
    }
    gaps
}
