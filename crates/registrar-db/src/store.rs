use async_trait::async_trait;
use thiserror::Error;

use registrar_models::{NewStudent, Student, StudentChanges};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("student with id {0} does not exist")]
    NotFound(i32),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// CRUD over student records keyed by integer id.
///
/// Implementations are shared across request tasks behind an `Arc`.
#[async_trait]
pub trait StudentStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Student>, StoreError>;

    async fn get(&self, id: i32) -> Result<Student, StoreError>;

    async fn insert(&self, student: NewStudent) -> Result<Student, StoreError>;

    async fn update(&self, id: i32, changes: StudentChanges) -> Result<Student, StoreError>;

    async fn delete(&self, id: i32) -> Result<(), StoreError>;

    /// Readiness check.
    async fn ping(&self) -> Result<(), StoreError>;
}
