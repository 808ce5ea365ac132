//! Reference data: teachers, classrooms, groups, weekly quotas and the
//! shape of the school week.
//!
//! A [`Catalog`] is built once per run, validated on construction, and
//! passed by shared reference to every component that needs it.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TimetableError};
use crate::models::{Classroom, Group, Subject, Teacher};

/// Number of lessons per week each group must receive for each subject.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct SubjectQuotas(BTreeMap<Subject, u32>);

impl SubjectQuotas {
    /// Quota used for a subject with no configured entry.
    pub const FALLBACK: u32 = 1;

    pub fn new(quotas: impl IntoIterator<Item = (Subject, u32)>) -> Self {
        Self(quotas.into_iter().collect())
    }

    /// Weekly lessons required for `subject`.
    pub fn weekly(&self, subject: Subject) -> u32 {
        self.0.get(&subject).copied().unwrap_or(Self::FALLBACK)
    }

    /// Sets the quota for one subject.
    pub fn with(mut self, subject: Subject, weekly: u32) -> Self {
        self.0.insert(subject, weekly);
        self
    }

    /// Weekly lessons per group across all subjects.
    pub fn total(&self) -> u32 {
        Subject::ALL.iter().map(|&s| self.weekly(s)).sum()
    }
}

impl Default for SubjectQuotas {
    fn default() -> Self {
        Self::new([
            (Subject::Math, 5),
            (Subject::Physics, 4),
            (Subject::Informatics, 3),
            (Subject::PhysicalCulture, 2),
        ])
    }
}

/// Dimensions of the weekly grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchoolCalendar {
    /// Working days per week.
    pub working_days: u8,
    /// Maximum class periods per day. Also the daily lesson ceiling per group.
    pub periods_per_day: u8,
}

impl Default for SchoolCalendar {
    fn default() -> Self {
        Self {
            working_days: 5,
            periods_per_day: 6,
        }
    }
}

impl SchoolCalendar {
    /// Iterates day indices.
    pub fn days(&self) -> std::ops::Range<u8> {
        0..self.working_days
    }

    /// Number of cells in the weekly grid.
    pub fn slot_count(&self) -> usize {
        self.working_days as usize * self.periods_per_day as usize
    }
}

/// Plain-data description of a catalog, suitable for configuration files.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CatalogSpec {
    pub teachers: Vec<Teacher>,
    pub classrooms: Vec<Classroom>,
    pub groups: Vec<Group>,
    pub quotas: SubjectQuotas,
    pub calendar: SchoolCalendar,
}

/// Validated, read-only reference data for a timetable run.
///
/// # Invariants
///
/// - Every subject has at least one teacher and one capable classroom.
/// - Teacher, classroom and group ids are unique within their kind.
/// - The calendar has at least one day and one period.
#[derive(Debug, Clone)]
pub struct Catalog {
    teachers: Vec<Arc<Teacher>>,
    classrooms: Vec<Arc<Classroom>>,
    groups: Vec<Arc<Group>>,
    quotas: SubjectQuotas,
    calendar: SchoolCalendar,
    teacher_by_subject: BTreeMap<Subject, usize>,
    classrooms_by_subject: BTreeMap<Subject, Vec<usize>>,
}

impl Catalog {
    /// Builds and validates a catalog.
    ///
    /// # Errors
    ///
    /// [`TimetableError::NoTeacher`] / [`TimetableError::NoClassroom`] when a
    /// subject cannot be staffed or housed, [`TimetableError::InvalidCatalog`]
    /// for duplicate ids, no groups, or an empty calendar.
    pub fn new(spec: CatalogSpec) -> Result<Self> {
        let CatalogSpec {
            teachers,
            classrooms,
            groups,
            quotas,
            calendar,
        } = spec;

        if calendar.working_days == 0 || calendar.periods_per_day == 0 {
            return Err(TimetableError::InvalidCatalog(
                "calendar needs at least one day and one period".into(),
            ));
        }
        if groups.is_empty() {
            return Err(TimetableError::InvalidCatalog("no groups defined".into()));
        }
        check_unique("teacher", teachers.iter().map(|t| t.id))?;
        check_unique("classroom", classrooms.iter().map(|c| c.id))?;
        check_unique("group", groups.iter().map(|g| g.id))?;

        let mut teacher_by_subject = BTreeMap::new();
        let mut classrooms_by_subject = BTreeMap::new();
        for subject in Subject::ALL {
            // first listed teacher owns the subject
            let teacher = teachers
                .iter()
                .position(|t| t.subject == subject)
                .ok_or(TimetableError::NoTeacher(subject))?;
            teacher_by_subject.insert(subject, teacher);

            let rooms: Vec<usize> = classrooms
                .iter()
                .enumerate()
                .filter(|(_, c)| c.can_accommodate(subject))
                .map(|(i, _)| i)
                .collect();
            if rooms.is_empty() {
                return Err(TimetableError::NoClassroom(subject));
            }
            classrooms_by_subject.insert(subject, rooms);
        }

        Ok(Self {
            teachers: teachers.into_iter().map(Arc::new).collect(),
            classrooms: classrooms.into_iter().map(Arc::new).collect(),
            groups: groups.into_iter().map(Arc::new).collect(),
            quotas,
            calendar,
            teacher_by_subject,
            classrooms_by_subject,
        })
    }

    /// The reference school: four subjects, four groups, five teachers,
    /// three general rooms and two labs.
    pub fn school_default() -> Self {
        Self::new(CatalogSpec::school_default())
            .unwrap_or_else(|e| unreachable!("built-in catalog is valid: {e}"))
    }

    pub fn teachers(&self) -> &[Arc<Teacher>] {
        &self.teachers
    }

    pub fn classrooms(&self) -> &[Arc<Classroom>] {
        &self.classrooms
    }

    pub fn groups(&self) -> &[Arc<Group>] {
        &self.groups
    }

    pub fn quotas(&self) -> &SubjectQuotas {
        &self.quotas
    }

    pub fn calendar(&self) -> SchoolCalendar {
        self.calendar
    }

    /// Weekly lessons required for `subject`.
    pub fn weekly_quota(&self, subject: Subject) -> u32 {
        self.quotas.weekly(subject)
    }

    /// The teacher responsible for `subject`.
    pub fn teacher_for(&self, subject: Subject) -> Result<&Arc<Teacher>> {
        self.teacher_by_subject
            .get(&subject)
            .map(|&i| &self.teachers[i])
            .ok_or(TimetableError::NoTeacher(subject))
    }

    /// Classrooms able to host `subject`, never empty on success.
    pub fn classrooms_for(&self, subject: Subject) -> Result<Vec<&Arc<Classroom>>> {
        self.classrooms_by_subject
            .get(&subject)
            .filter(|rooms| !rooms.is_empty())
            .map(|rooms| rooms.iter().map(|&i| &self.classrooms[i]).collect())
            .ok_or(TimetableError::NoClassroom(subject))
    }

    /// Number of capable classrooms for `subject`.
    pub(crate) fn classroom_count_for(&self, subject: Subject) -> usize {
        self.classrooms_by_subject
            .get(&subject)
            .map_or(0, Vec::len)
    }

    /// The `n`-th capable classroom for `subject`.
    pub(crate) fn nth_classroom_for(&self, subject: Subject, n: usize) -> Result<&Arc<Classroom>> {
        self.classrooms_by_subject
            .get(&subject)
            .and_then(|rooms| rooms.get(n))
            .map(|&i| &self.classrooms[i])
            .ok_or(TimetableError::NoClassroom(subject))
    }

    /// Lessons a structurally complete timetable contains.
    pub fn lessons_per_timetable(&self) -> usize {
        self.groups.len() * self.quotas.total() as usize
    }
}

impl TryFrom<CatalogSpec> for Catalog {
    type Error = TimetableError;

    fn try_from(spec: CatalogSpec) -> Result<Self> {
        Self::new(spec)
    }
}

impl CatalogSpec {
    /// Plain data of [`Catalog::school_default`].
    pub fn school_default() -> Self {
        let general: Vec<Subject> = Subject::ALL
            .into_iter()
            .filter(|&s| s != Subject::Informatics)
            .collect();

        Self {
            teachers: vec![
                Teacher::new(1, "Mr. Smith", Subject::Math),
                Teacher::new(2, "Ms. Johnson", Subject::Physics),
                Teacher::new(3, "Dr. Brown", Subject::Informatics),
                Teacher::new(4, "Mrs. Davis", Subject::PhysicalCulture),
                Teacher::new(5, "Mr. Wilson", Subject::Math),
            ],
            classrooms: vec![
                Classroom::new(1, "Room 101", general.clone()),
                Classroom::new(2, "Room 102", general.clone()),
                Classroom::new(3, "Room 103", general),
                Classroom::new(4, "Physics Lab", [Subject::Physics]),
                Classroom::new(5, "Computer Lab", [Subject::Informatics]),
            ],
            groups: (1..=4)
                .map(|i| Group::new(i, format!("Group {i}")).with_student_count(25))
                .collect(),
            quotas: SubjectQuotas::default(),
            calendar: SchoolCalendar::default(),
        }
    }
}

fn check_unique(kind: &str, ids: impl Iterator<Item = u32>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(TimetableError::InvalidCatalog(format!(
                "duplicate {kind} id: {id}"
            )));
        }
    }
    Ok(())
}
