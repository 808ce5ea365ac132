//! Per-day shape rules for groups.

use super::{ConflictMarks, ConflictRule, ConflictType, DayBuckets};
use crate::catalog::Catalog;
use crate::models::{Subject, Timetable};

/// Counts a group's lessons beyond the daily period ceiling.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaxLessonsPerDay;

impl ConflictRule for MaxLessonsPerDay {
    fn conflict_type(&self) -> ConflictType {
        ConflictType::MaxLessonsPerDay
    }

    fn evaluate(&self, catalog: &Catalog, timetable: &Timetable, marks: &mut ConflictMarks) -> u32 {
        let ceiling = catalog.calendar().periods_per_day as usize;
        let buckets = DayBuckets::by_group(timetable);
        let mut violations = 0;
        for group in catalog.groups() {
            for day in catalog.calendar().days() {
                let lessons = buckets.get(group.id, day);
                if lessons.len() > ceiling {
                    for &i in &lessons[ceiling..] {
                        marks.mark(i);
                    }
                    violations += (lessons.len() - ceiling) as u32;
                }
            }
        }
        violations
    }
}

/// Physical Culture must close the day.
///
/// For every group/day containing Physical Culture, counts the empty
/// periods between consecutive Physical Culture lessons plus the periods
/// between the last Physical Culture lesson and the day's final lesson.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastLesson;

impl ConflictRule for LastLesson {
    fn conflict_type(&self) -> ConflictType {
        ConflictType::LastLesson
    }

    fn evaluate(&self, catalog: &Catalog, timetable: &Timetable, marks: &mut ConflictMarks) -> u32 {
        let buckets = DayBuckets::by_group(timetable);
        let mut total = 0;
        for group in catalog.groups() {
            for day in catalog.calendar().days() {
                total += last_lesson_in_day(timetable, buckets.get(group.id, day), marks);
            }
        }
        total
    }
}

fn last_lesson_in_day(timetable: &Timetable, day: &[usize], marks: &mut ConflictMarks) -> u32 {
    let lessons = timetable.lessons();
    let pe: Vec<usize> = day
        .iter()
        .copied()
        .filter(|&i| lessons[i].subject() == Subject::PhysicalCulture)
        .collect();
    let (Some(&last_pe), Some(&last)) = (pe.last(), day.last()) else {
        return 0;
    };

    let mut violations = 0;
    let mut split = false;
    for pair in pe.windows(2) {
        let gap = lessons[pair[1]].period().saturating_sub(lessons[pair[0]].period());
        if gap > 1 {
            split = true;
            violations += (gap - 1) as u32;
        }
    }
    if split {
        for &i in &pe {
            marks.mark(i);
        }
    }

    let trailing = lessons[last].period().saturating_sub(lessons[last_pe].period());
    if trailing > 0 {
        marks.mark(last);
        violations += trailing as u32;
    }
    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogSpec, SchoolCalendar};
    use crate::test_support::{lesson, small_catalog};

    #[test]
    fn test_max_lessons_per_day() {
        let mut spec = CatalogSpec::school_default();
        spec.groups.truncate(1);
        spec.calendar = SchoolCalendar {
            working_days: 5,
            periods_per_day: 2,
        };
        let catalog = Catalog::new(spec).unwrap();
        let timetable = Timetable::new(vec![
            lesson(&catalog, Subject::Math, 1, 1, 0, 0),
            lesson(&catalog, Subject::Math, 1, 1, 0, 1),
            lesson(&catalog, Subject::Physics, 1, 4, 0, 1),
            lesson(&catalog, Subject::Physics, 1, 4, 0, 0),
            lesson(&catalog, Subject::Math, 1, 1, 1, 0),
        ]);
        assert_eq!(MaxLessonsPerDay.calculate_conflicts(&catalog, &timetable), 2);
    }

    #[test]
    fn test_pe_at_end_is_clean() {
        let catalog = small_catalog();
        let timetable = Timetable::new(vec![
            lesson(&catalog, Subject::Math, 1, 1, 0, 0),
            lesson(&catalog, Subject::PhysicalCulture, 1, 2, 0, 1),
            lesson(&catalog, Subject::PhysicalCulture, 1, 2, 0, 2),
        ]);
        assert_eq!(LastLesson.calculate_conflicts(&catalog, &timetable), 0);
    }

    #[test]
    fn test_trailing_lesson_after_pe() {
        let catalog = small_catalog();
        let timetable = Timetable::new(vec![
            lesson(&catalog, Subject::PhysicalCulture, 1, 2, 0, 1),
            lesson(&catalog, Subject::Math, 1, 1, 0, 4),
        ]);
        let mut marks = ConflictMarks::for_timetable(&timetable);
        assert_eq!(LastLesson.evaluate(&catalog, &timetable, &mut marks), 3);
        assert_eq!(marks.into_flags(), vec![false, true]);
    }

    #[test]
    fn test_split_pe_lessons() {
        let catalog = small_catalog();
        let timetable = Timetable::new(vec![
            lesson(&catalog, Subject::PhysicalCulture, 1, 2, 0, 0),
            lesson(&catalog, Subject::Math, 1, 1, 0, 1),
            lesson(&catalog, Subject::PhysicalCulture, 1, 2, 0, 3),
        ]);
        let mut marks = ConflictMarks::for_timetable(&timetable);
        // PE at 0 and 3 -> 2 empty periods between them, PE closes the day
        assert_eq!(LastLesson.evaluate(&catalog, &timetable, &mut marks), 2);
        assert_eq!(marks.into_flags(), vec![true, false, true]);
    }

    #[test]
    fn test_day_without_pe_is_ignored() {
        let catalog = small_catalog();
        let timetable = Timetable::new(vec![
            lesson(&catalog, Subject::Math, 1, 1, 0, 0),
            lesson(&catalog, Subject::Physics, 1, 4, 0, 5),
        ]);
        assert_eq!(LastLesson.calculate_conflicts(&catalog, &timetable), 0);
    }

    #[test]
    fn test_pe_sharing_a_period_is_not_negative() {
        let catalog = small_catalog();
        let timetable = Timetable::new(vec![
            lesson(&catalog, Subject::Math, 1, 1, 0, 4),
            lesson(&catalog, Subject::PhysicalCulture, 1, 2, 0, 3),
            lesson(&catalog, Subject::PhysicalCulture, 1, 3, 0, 3),
        ]);
        // only the trailing Math lesson counts
        assert_eq!(LastLesson.calculate_conflicts(&catalog, &timetable), 1);
    }
}
