//! Reference entities: teachers, classrooms and student groups.
//!
//! Identity is the numeric `id`; two values with the same id compare equal
//! regardless of their other fields.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::Subject;

/// A teacher. Teaches exactly one subject.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Teacher {
    pub id: u32,
    pub name: String,
    pub subject: Subject,
}

impl Teacher {
    pub fn new(id: u32, name: impl Into<String>, subject: Subject) -> Self {
        Self {
            id,
            name: name.into(),
            subject,
        }
    }
}

/// A classroom and the subjects it is equipped for.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Classroom {
    pub id: u32,
    pub name: String,
    pub allowed_subjects: BTreeSet<Subject>,
}

impl Classroom {
    pub fn new(
        id: u32,
        name: impl Into<String>,
        allowed_subjects: impl IntoIterator<Item = Subject>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            allowed_subjects: allowed_subjects.into_iter().collect(),
        }
    }

    /// Whether `subject` can be taught in this room.
    pub fn can_accommodate(&self, subject: Subject) -> bool {
        self.allowed_subjects.contains(&subject)
    }
}

/// A class of students that needs a full weekly timetable.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Group {
    pub id: u32,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub student_count: u32,
}

impl Group {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            student_count: 0,
        }
    }

    /// Sets the number of students.
    pub fn with_student_count(mut self, count: u32) -> Self {
        self.student_count = count;
        self
    }
}

macro_rules! identity_by_id {
    ($($ty:ty),*) => {$(
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                self.id == other.id
            }
        }

        impl Eq for $ty {}

        impl Hash for $ty {
            fn hash<H: Hasher>(&self, state: &mut H) {
                self.id.hash(state);
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.name)
            }
        }
    )*};
}

identity_by_id!(Teacher, Classroom, Group);
