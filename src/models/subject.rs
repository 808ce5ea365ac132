//! Teaching subjects.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A subject taught at the school.
///
/// The set is fixed; weekly quotas live in
/// [`SubjectQuotas`](crate::catalog::SubjectQuotas), not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Subject {
    Math,
    Physics,
    Informatics,
    PhysicalCulture,
}

impl Subject {
    /// All subjects in declaration order.
    pub const ALL: [Subject; 4] = [
        Subject::Math,
        Subject::Physics,
        Subject::Informatics,
        Subject::PhysicalCulture,
    ];

    /// Human-readable name.
    pub fn display_name(self) -> &'static str {
        match self {
            Subject::Math => "Mathematics",
            Subject::Physics => "Physics",
            Subject::Informatics => "Informatics",
            Subject::PhysicalCulture => "Physical Culture",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
