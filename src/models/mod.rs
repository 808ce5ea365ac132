//! Domain model for weekly school timetables.
//!
//! Reference entities ([`Teacher`], [`Classroom`], [`Group`]) are created
//! once per run and shared by `Arc`. A [`Lesson`] is the gene of the GA
//! and a [`Timetable`] the chromosome.

mod lesson;
mod resource;
mod subject;
mod time_slot;
mod timetable;

pub use lesson::Lesson;
pub use resource::{Classroom, Group, Teacher};
pub use subject::Subject;
pub use time_slot::TimeSlot;
pub use timetable::Timetable;
