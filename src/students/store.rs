//! Ordered in-memory collection of student records.

use tokio::sync::RwLock;

use super::types::{NewStudent, StoreError, StudentId, StudentRecord};

/// Owns the student collection and hands out snapshots to callers.
///
/// Records keep insertion order. Identifiers come from a monotonically increasing counter, so an
/// id freed by a deletion is never handed out again. Every operation holds the internal lock for
/// its full duration, which makes each single-record write atomic under concurrent requests.
#[derive(Debug, Default)]
pub struct StudentStore {
    inner: RwLock<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    records: Vec<StudentRecord>,
    next_id: StudentId,
}

impl Default for StoreInner {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            next_id: 1,
        }
    }
}

impl StoreInner {
    fn position(&self, id: StudentId) -> Result<usize, StoreError> {
        self.records
            .iter()
            .position(|record| record.id == id)
            .ok_or(StoreError::NotFound(id))
    }
}

impl StudentStore {
    /// Create an empty store whose first record receives id `1`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with the demo students served on first start.
    pub fn with_seed_data() -> Self {
        let records = vec![
            StudentRecord {
                id: 1,
                name: "Rahul".into(),
                age: 22,
                email: "rahul@gmail.com".into(),
            },
            StudentRecord {
                id: 2,
                name: "Alice".into(),
                age: 23,
                email: "alice@gmail.com".into(),
            },
            StudentRecord {
                id: 3,
                name: "Rob".into(),
                age: 24,
                email: "rob@gmail.com".into(),
            },
        ];
        let next_id = records.len() as StudentId + 1;
        Self {
            inner: RwLock::new(StoreInner { records, next_id }),
        }
    }

    /// Snapshot of every record in insertion order.
    pub async fn list(&self) -> Vec<StudentRecord> {
        self.inner.read().await.records.clone()
    }

    /// Fetch a single record by id.
    pub async fn get(&self, id: StudentId) -> Result<StudentRecord, StoreError> {
        let inner = self.inner.read().await;
        let index = inner.position(id)?;
        Ok(inner.records[index].clone())
    }

    /// Append a record built from `student` and return it with its freshly assigned id.
    pub async fn create(&self, student: NewStudent) -> StudentRecord {
        let mut inner = self.inner.write().await;
        let id = inner.next_id;
        inner.next_id += 1;
        let record = student.into_record(id);
        inner.records.push(record.clone());
        tracing::debug!(id, total = inner.records.len(), "Stored student record");
        record
    }

    /// Overwrite name, age, and email of an existing record; the id is left untouched.
    pub async fn update(&self, id: StudentId, student: NewStudent) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let index = inner.position(id)?;
        let NewStudent { name, age, email } = student;
        let record = &mut inner.records[index];
        record.name = name;
        record.age = age;
        record.email = email;
        Ok(())
    }

    /// Remove a record, keeping the relative order of the remaining ones.
    pub async fn delete(&self, id: StudentId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        let index = inner.position(id)?;
        inner.records.remove(index);
        Ok(())
    }

    /// Number of records currently stored.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    /// Whether the store holds no records.
    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.records.is_empty()
    }
}
