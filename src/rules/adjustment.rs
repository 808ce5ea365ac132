//! Weekly quota rule.

use super::{ConflictMarks, ConflictRule, ConflictType};
use crate::catalog::Catalog;
use crate::models::{Lesson, Subject, Timetable};

/// Distance between each group's lesson counts and the weekly quotas.
///
/// For every group, sums `|quota(subject) − count(subject)|` over all
/// subjects. The only rule satisfied by adding lessons, so it keeps the
/// lesson count right through crossover and repair churn.
#[derive(Debug, Clone, Copy, Default)]
pub struct Adjustment;

impl ConflictRule for Adjustment {
    fn conflict_type(&self) -> ConflictType {
        ConflictType::Adjustment
    }

    fn evaluate(&self, catalog: &Catalog, timetable: &Timetable, _: &mut ConflictMarks) -> u32 {
        catalog
            .groups()
            .iter()
            .map(|group| {
                group_adjustment(catalog, timetable.lessons_for_group(group).map(|(_, l)| l))
            })
            .sum()
    }
}

/// Adjustment for one group's lessons.
pub fn group_adjustment<'a>(catalog: &Catalog, lessons: impl IntoIterator<Item = &'a Lesson>) -> u32 {
    let mut counts = [0u32; Subject::ALL.len()];
    for lesson in lessons {
        counts[lesson.subject() as usize] += 1;
    }
    Subject::ALL
        .iter()
        .zip(counts)
        .map(|(&subject, actual)| catalog.weekly_quota(subject).abs_diff(actual))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::lesson;

    #[test]
    fn test_single_math_lesson() {
        // quotas: Math 5, Physics 4, Informatics 3, Physical Culture 2
        let catalog = Catalog::school_default();
        let timetable = Timetable::new(vec![lesson(&catalog, Subject::Math, 1, 1, 0, 0)]);
        let group = &catalog.groups()[0];
        let adjustment =
            group_adjustment(&catalog, timetable.lessons_for_group(group).map(|(_, l)| l));
        assert_eq!(adjustment, 4 + 4 + 3 + 2);
    }

    #[test]
    fn test_surplus_counts_too() {
        let catalog = crate::test_support::small_catalog();
        let timetable = Timetable::new(vec![
            lesson(&catalog, Subject::Math, 1, 1, 0, 0),
            lesson(&catalog, Subject::Math, 1, 1, 0, 1),
            lesson(&catalog, Subject::Math, 1, 1, 0, 2),
            lesson(&catalog, Subject::Physics, 1, 4, 0, 3),
            lesson(&catalog, Subject::Informatics, 1, 5, 0, 4),
            lesson(&catalog, Subject::PhysicalCulture, 1, 2, 0, 5),
        ]);
        assert_eq!(Adjustment.calculate_conflicts(&catalog, &timetable), 2);
    }

    #[test]
    fn test_empty_timetable_owes_every_quota() {
        let catalog = Catalog::school_default();
        let empty = Timetable::default();
        assert_eq!(Adjustment.calculate_conflicts(&catalog, &empty), 4 * 14);
    }
}
