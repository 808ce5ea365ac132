//! A single scheduled lesson.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::{Classroom, Group, Subject, Teacher, TimeSlot};

/// One scheduled occurrence of a subject for a group.
///
/// Lessons are immutable; mutation operators build a new lesson with
/// [`with_time_slot`](Self::with_time_slot) or
/// [`with_classroom`](Self::with_classroom). Reference entities are shared,
/// so cloning a lesson is cheap.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Lesson {
    subject: Subject,
    teacher: Arc<Teacher>,
    classroom: Arc<Classroom>,
    time_slot: TimeSlot,
    group: Arc<Group>,
}

impl Lesson {
    pub fn new(
        subject: Subject,
        teacher: Arc<Teacher>,
        classroom: Arc<Classroom>,
        time_slot: TimeSlot,
        group: Arc<Group>,
    ) -> Self {
        Self {
            subject,
            teacher,
            classroom,
            time_slot,
            group,
        }
    }

    pub fn subject(&self) -> Subject {
        self.subject
    }

    pub fn teacher(&self) -> &Arc<Teacher> {
        &self.teacher
    }

    pub fn classroom(&self) -> &Arc<Classroom> {
        &self.classroom
    }

    pub fn time_slot(&self) -> TimeSlot {
        self.time_slot
    }

    pub fn group(&self) -> &Arc<Group> {
        &self.group
    }

    pub fn day(&self) -> u8 {
        self.time_slot.day
    }

    pub fn period(&self) -> u8 {
        self.time_slot.period
    }

    /// Returns a copy scheduled at `time_slot`.
    pub fn with_time_slot(&self, time_slot: TimeSlot) -> Self {
        Self {
            time_slot,
            ..self.clone()
        }
    }

    /// Returns a copy held in `classroom`.
    pub fn with_classroom(&self, classroom: Arc<Classroom>) -> Self {
        Self {
            classroom,
            ..self.clone()
        }
    }
}

impl fmt::Display for Lesson {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} - {}", self.subject, self.teacher, self.classroom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn math_lesson() -> Lesson {
        Lesson::new(
            Subject::Math,
            Arc::new(Teacher::new(1, "Mr. Smith", Subject::Math)),
            Arc::new(Classroom::new(1, "Room 101", [Subject::Math])),
            TimeSlot::new(0, 0),
            Arc::new(Group::new(1, "Group 1")),
        )
    }

    #[test]
    fn test_with_time_slot_keeps_other_fields() {
        let lesson = math_lesson();
        let moved = lesson.with_time_slot(TimeSlot::new(3, 4));
        assert_eq!(moved.time_slot(), TimeSlot::new(3, 4));
        assert_eq!(moved.classroom(), lesson.classroom());
        assert_eq!(moved.teacher(), lesson.teacher());
        assert_eq!(lesson.time_slot(), TimeSlot::new(0, 0));
    }

    #[test]
    fn test_with_classroom() {
        let lesson = math_lesson();
        let room = Arc::new(Classroom::new(2, "Room 102", [Subject::Math]));
        let moved = lesson.with_classroom(room);
        assert_eq!(moved.classroom().id, 2);
        assert_eq!(moved.time_slot(), lesson.time_slot());
    }

    #[test]
    fn test_display() {
        assert_eq!(math_lesson().to_string(), "Mathematics - Mr. Smith - Room 101");
    }
}
