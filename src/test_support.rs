//! Fixtures shared by unit tests.

use crate::catalog::{Catalog, CatalogSpec, SubjectQuotas};
use crate::models::{Lesson, Subject, TimeSlot, Timetable};

/// Default teachers and rooms, one group, one lesson per subject per week.
pub(crate) fn small_catalog() -> Catalog {
    let mut spec = CatalogSpec::school_default();
    spec.groups.truncate(1);
    spec.quotas = SubjectQuotas::new(Subject::ALL.map(|s| (s, 1)));
    Catalog::new(spec).expect("small catalog is valid")
}

/// A lesson taught by the subject's catalog teacher.
pub(crate) fn lesson(
    catalog: &Catalog,
    subject: Subject,
    group_id: u32,
    room_id: u32,
    day: u8,
    period: u8,
) -> Lesson {
    let teacher = catalog.teacher_for(subject).expect("teacher").id;
    lesson_taught_by(catalog, subject, teacher, group_id, room_id, day, period)
}

/// A lesson with an explicit teacher, which may not teach `subject`.
pub(crate) fn lesson_taught_by(
    catalog: &Catalog,
    subject: Subject,
    teacher_id: u32,
    group_id: u32,
    room_id: u32,
    day: u8,
    period: u8,
) -> Lesson {
    let teacher = catalog
        .teachers()
        .iter()
        .find(|t| t.id == teacher_id)
        .unwrap_or_else(|| panic!("no teacher with id {teacher_id}"));
    let room = catalog
        .classrooms()
        .iter()
        .find(|c| c.id == room_id)
        .unwrap_or_else(|| panic!("no classroom with id {room_id}"));
    let group = catalog
        .groups()
        .iter()
        .find(|g| g.id == group_id)
        .unwrap_or_else(|| panic!("no group with id {group_id}"));
    Lesson::new(
        subject,
        teacher.clone(),
        room.clone(),
        TimeSlot::new(day, period),
        group.clone(),
    )
}

/// A zero-conflict timetable for [`small_catalog`]: Monday periods 0-3,
/// Physical Culture last.
pub(crate) fn feasible_timetable(catalog: &Catalog) -> Timetable {
    Timetable::new(vec![
        lesson(catalog, Subject::Math, 1, 1, 0, 0),
        lesson(catalog, Subject::Physics, 1, 4, 0, 1),
        lesson(catalog, Subject::Informatics, 1, 5, 0, 2),
        lesson(catalog, Subject::PhysicalCulture, 1, 2, 0, 3),
    ])
}
