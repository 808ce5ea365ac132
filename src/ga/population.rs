//! Random initial population.
//!
//! Every generated timetable is structurally complete (each group gets
//! exactly its weekly quota of every subject, taught by the subject's
//! teacher in a capable room) but its time slots are uniform over the
//! whole week, so collisions and gaps are expected. Selection pressure
//! does the rest.

use std::sync::Arc;

use rand::Rng;

use crate::catalog::Catalog;
use crate::error::{Result, TimetableError};
use crate::models::{Classroom, Group, Lesson, Subject, TimeSlot, Timetable};

/// Builds random timetables from a catalog.
#[derive(Debug, Clone, Copy)]
pub struct PopulationGenerator<'c> {
    catalog: &'c Catalog,
}

impl<'c> PopulationGenerator<'c> {
    pub fn new(catalog: &'c Catalog) -> Self {
        Self { catalog }
    }

    /// `size` independent random timetables.
    ///
    /// # Errors
    /// [`TimetableError::NoTeacher`] or [`TimetableError::NoClassroom`] if a
    /// subject cannot be staffed or housed.
    pub fn initialize_population<R: Rng>(&self, size: usize, rng: &mut R) -> Result<Vec<Timetable>> {
        (0..size).map(|_| self.random_timetable(rng)).collect()
    }

    /// One timetable: for every group and subject, `weekly_quota` lessons.
    pub fn random_timetable<R: Rng>(&self, rng: &mut R) -> Result<Timetable> {
        let mut lessons = Vec::with_capacity(self.catalog.lessons_per_timetable());
        for group in self.catalog.groups() {
            for subject in Subject::ALL {
                for _ in 0..self.catalog.weekly_quota(subject) {
                    lessons.push(self.random_lesson(subject, group, rng)?);
                }
            }
        }
        Ok(Timetable::new(lessons))
    }

    /// A lesson of `subject` for `group` at a random slot in a random
    /// capable room.
    pub fn random_lesson<R: Rng>(
        &self,
        subject: Subject,
        group: &Arc<Group>,
        rng: &mut R,
    ) -> Result<Lesson> {
        let teacher = self.catalog.teacher_for(subject)?;
        let classroom = self.random_classroom(subject, rng)?;
        Ok(Lesson::new(
            subject,
            Arc::clone(teacher),
            classroom,
            self.random_time_slot(rng),
            Arc::clone(group),
        ))
    }

    /// Uniform over the catalog's day × period grid.
    pub fn random_time_slot<R: Rng>(&self, rng: &mut R) -> TimeSlot {
        let calendar = self.catalog.calendar();
        TimeSlot::new(
            rng.random_range(0..calendar.working_days),
            rng.random_range(0..calendar.periods_per_day),
        )
    }

    /// Uniform over the classrooms able to host `subject`.
    ///
    /// # Errors
    /// [`TimetableError::NoClassroom`] if there are none.
    pub fn random_classroom<R: Rng>(&self, subject: Subject, rng: &mut R) -> Result<Arc<Classroom>> {
        let count = self.catalog.classroom_count_for(subject);
        if count == 0 {
            return Err(TimetableError::NoClassroom(subject));
        }
        self.catalog
            .nth_classroom_for(subject, rng.random_range(0..count))
            .map(Arc::clone)
    }
}
