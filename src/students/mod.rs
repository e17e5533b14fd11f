//! In-memory student record management.

mod store;
mod types;

pub use store::StudentStore;
pub use types::{NewStudent, StoreError, StudentId, StudentRecord};
