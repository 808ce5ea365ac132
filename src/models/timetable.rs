//! The GA chromosome: a full week of lessons.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Classroom, Group, Lesson, Teacher};

/// A candidate weekly timetable.
///
/// Not necessarily feasible: the engine's job is to drive its lesson set
/// toward zero conflicts. `fitness` is written by the evaluator and
/// `generation` by the runner when the timetable becomes the best of a
/// generation.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Timetable {
    lessons: Vec<Lesson>,
    pub fitness: f64,
    pub generation: usize,
}

impl Timetable {
    pub fn new(lessons: Vec<Lesson>) -> Self {
        Self {
            lessons,
            fitness: 0.0,
            generation: 0,
        }
    }

    /// Sets the recorded fitness.
    pub fn with_fitness(mut self, fitness: f64) -> Self {
        self.fitness = fitness;
        self
    }

    pub fn lessons(&self) -> &[Lesson] {
        &self.lessons
    }

    pub fn into_lessons(self) -> Vec<Lesson> {
        self.lessons
    }

    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    pub fn add_lesson(&mut self, lesson: Lesson) {
        self.lessons.push(lesson);
    }

    /// Lessons of `group`, with their positions in the chromosome.
    pub fn lessons_for_group(&self, group: &Group) -> impl Iterator<Item = (usize, &Lesson)> + '_ {
        let id = group.id;
        self.indexed().filter(move |(_, lesson)| lesson.group().id == id)
    }

    /// Lessons taught by `teacher`, with their positions.
    pub fn lessons_for_teacher(
        &self,
        teacher: &Teacher,
    ) -> impl Iterator<Item = (usize, &Lesson)> + '_ {
        let id = teacher.id;
        self.indexed().filter(move |(_, lesson)| lesson.teacher().id == id)
    }

    /// Lessons held in `classroom`, with their positions.
    pub fn lessons_for_classroom(
        &self,
        classroom: &Classroom,
    ) -> impl Iterator<Item = (usize, &Lesson)> + '_ {
        let id = classroom.id;
        self.indexed().filter(move |(_, lesson)| lesson.classroom().id == id)
    }

    /// Lessons of `group` on `day`, sorted by period.
    ///
    /// Lessons sharing a period keep their chromosome order.
    pub fn lessons_on_day_for_group(&self, group: &Group, day: u8) -> Vec<(usize, &Lesson)> {
        on_day_sorted(self.lessons_for_group(group), day)
    }

    /// Lessons of `teacher` on `day`, sorted by period.
    pub fn lessons_on_day_for_teacher(&self, teacher: &Teacher, day: u8) -> Vec<(usize, &Lesson)> {
        on_day_sorted(self.lessons_for_teacher(teacher), day)
    }

    /// Lessons in `classroom` on `day`, sorted by period.
    pub fn lessons_on_day_for_classroom(
        &self,
        classroom: &Classroom,
        day: u8,
    ) -> Vec<(usize, &Lesson)> {
        on_day_sorted(self.lessons_for_classroom(classroom), day)
    }

    fn indexed(&self) -> impl Iterator<Item = (usize, &Lesson)> {
        self.lessons.iter().enumerate()
    }
}

impl From<Vec<Lesson>> for Timetable {
    fn from(lessons: Vec<Lesson>) -> Self {
        Self::new(lessons)
    }
}

fn on_day_sorted<'a>(
    lessons: impl Iterator<Item = (usize, &'a Lesson)>,
    day: u8,
) -> Vec<(usize, &'a Lesson)> {
    let mut day_lessons: Vec<_> = lessons.filter(|(_, l)| l.day() == day).collect();
    // stable: equal periods keep chromosome order
    day_lessons.sort_by_key(|(_, l)| l.period());
    day_lessons
}
