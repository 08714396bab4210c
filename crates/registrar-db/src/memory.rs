use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use registrar_models::{NewStudent, Student, StudentChanges};

use crate::store::{StoreError, StudentStore};

#[derive(Default)]
struct Inner {
    last_id: i32,
    rows: BTreeMap<i32, Student>,
}

/// Student store held in process memory. Ids are assigned sequentially from 1
/// and are never reused. Password hashes are not kept: nothing reads them back.
#[derive(Default)]
pub struct InMemoryStudentStore {
    inner: RwLock<Inner>,
}

impl InMemoryStudentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StudentStore for InMemoryStudentStore {
    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.rows.values().cloned().collect())
    }

    async fn get(&self, id: i32) -> Result<Student, StoreError> {
        let inner = self.inner.read().await;
        inner
            .rows
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn insert(&self, student: NewStudent) -> Result<Student, StoreError> {
        let mut inner = self.inner.write().await;
        inner.last_id += 1;
        let id = inner.last_id;
        let now = Utc::now();

        let created = Student {
            id,
            name: student.name,
            course: student.course,
            grade: student.grade,
            created_by: student.created_by.clone(),
            created_on: now,
            updated_by: student.created_by,
            updated_on: now,
        };

        inner.rows.insert(id, created.clone());

        Ok(created)
    }

    async fn update(&self, id: i32, changes: StudentChanges) -> Result<Student, StoreError> {
        let mut inner = self.inner.write().await;
        let student = inner.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;

        if let Some(name) = changes.name {
            student.name = name;
        }
        if let Some(course) = changes.course {
            student.course = course;
        }
        if let Some(grade) = changes.grade {
            student.grade = grade;
        }
        student.updated_by = changes.updated_by;
        student.updated_on = Utc::now();

        Ok(student.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
