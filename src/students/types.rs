//! Record types and errors shared by the store and the HTTP surface.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Store-assigned identifier of a student record.
pub type StudentId = i64;

/// A student entry held by the [`crate::students::StudentStore`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Identifier assigned on creation; never changes afterwards.
    pub id: StudentId,
    /// Display name of the student.
    pub name: String,
    /// Age in years.
    pub age: i64,
    /// Contact email address.
    pub email: String,
}

/// Student fields accepted on create and update, i.e. a record without its id.
///
/// Missing fields decode to empty/zero values so validation can report them with a precise
/// message. A client-supplied `id` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewStudent {
    /// Display name of the student.
    #[serde(default)]
    pub name: String,
    /// Age in years.
    #[serde(default)]
    pub age: i64,
    /// Contact email address.
    #[serde(default)]
    pub email: String,
}

impl NewStudent {
    pub(crate) fn into_record(self, id: StudentId) -> StudentRecord {
        StudentRecord {
            id,
            name: self.name,
            age: self.age,
            email: self.email,
        }
    }
}

/// Errors returned by store lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record carries the requested identifier.
    #[error("Student {0} not found")]
    NotFound(StudentId),
}
