use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use registrar_models::{NewStudent, Student, StudentChanges};

use crate::store::{StoreError, StudentStore};

#[derive(Clone, Debug)]
pub struct PgStudentStore {
    pool: PgPool,
}

impl PgStudentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StudentStore for PgStudentStore {
    #[instrument(skip(self))]
    async fn list(&self) -> Result<Vec<Student>, StoreError> {
        let students = sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, course, grade, created_by, created_on, updated_by, updated_on
            FROM students
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(students)
    }

    #[instrument(skip(self))]
    async fn get(&self, id: i32) -> Result<Student, StoreError> {
        sqlx::query_as::<_, Student>(
            r#"
            SELECT id, name, course, grade, created_by, created_on, updated_by, updated_on
            FROM students
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self, student))]
    async fn insert(&self, student: NewStudent) -> Result<Student, StoreError> {
        let created = sqlx::query_as::<_, Student>(
            r#"
            INSERT INTO students (password, name, course, grade, created_by, updated_by)
            VALUES ($1, $2, $3, $4, $5, $5)
            RETURNING id, name, course, grade, created_by, created_on, updated_by, updated_on
            "#,
        )
        .bind(&student.password_hash)
        .bind(&student.name)
        .bind(&student.course)
        .bind(&student.grade)
        .bind(&student.created_by)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    #[instrument(skip(self, changes))]
    async fn update(&self, id: i32, changes: StudentChanges) -> Result<Student, StoreError> {
        sqlx::query_as::<_, Student>(
            r#"
            UPDATE students
            SET name = COALESCE($1, name),
                password = COALESCE($2, password),
                course = COALESCE($3, course),
                grade = COALESCE($4, grade),
                updated_by = $5,
                updated_on = NOW()
            WHERE id = $6
            RETURNING id, name, course, grade, created_by, created_on, updated_by, updated_on
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.password_hash)
        .bind(&changes.course)
        .bind(&changes.grade)
        .bind(&changes.updated_by)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound(id))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
