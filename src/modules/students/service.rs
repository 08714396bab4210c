use anyhow::anyhow;
use tracing::instrument;

use registrar_core::{AppError, hash_password};
use registrar_db::{StoreError, StudentStore};
use registrar_models::{CreateStudentDto, NewStudent, Student, StudentChanges, UpdateStudentDto};

pub struct StudentService;

fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound(id) => AppError::not_found(anyhow!("Student {} not found", id)),
        StoreError::Database(e) => AppError::database(e),
    }
}

impl StudentService {
    #[instrument(skip(store))]
    pub async fn get_students(store: &dyn StudentStore) -> Result<Vec<Student>, AppError> {
        store.list().await.map_err(store_error)
    }

    #[instrument(skip(store))]
    pub async fn get_student(store: &dyn StudentStore, id: i32) -> Result<Student, AppError> {
        store.get(id).await.map_err(store_error)
    }

    /// Hashes the password and stores a new record attributed to `created_by`.
    #[instrument(skip(store, dto), fields(name = %dto.name))]
    pub async fn create_student(
        store: &dyn StudentStore,
        dto: CreateStudentDto,
        created_by: &str,
    ) -> Result<Student, AppError> {
        let password_hash = hash_password(&dto.password)?;

        store
            .insert(NewStudent {
                name: dto.name,
                password_hash,
                course: dto.course,
                grade: dto.grade,
                created_by: created_by.to_string(),
            })
            .await
            .map_err(store_error)
    }

    #[instrument(skip(store, dto))]
    pub async fn update_student(
        store: &dyn StudentStore,
        id: i32,
        dto: UpdateStudentDto,
        updated_by: &str,
    ) -> Result<Student, AppError> {
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        store
            .update(
                id,
                StudentChanges {
                    name: dto.name,
                    password_hash,
                    course: dto.course,
                    grade: dto.grade,
                    updated_by: updated_by.to_string(),
                },
            )
            .await
            .map_err(store_error)
    }

    #[instrument(skip(store))]
    pub async fn delete_student(store: &dyn StudentStore, id: i32) -> Result<(), AppError> {
        store.delete(id).await.map_err(store_error)
    }

    pub async fn ping(store: &dyn StudentStore) -> Result<(), AppError> {
        store.ping().await.map_err(AppError::unavailable)
    }
}
