use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::database::models::StoredConsultation;
use crate::error::{AppError, Result};
use crate::models::NewConsultation;

/// Write side of consultation persistence.
#[async_trait]
pub trait ConsultationStore: Send + Sync {
    /// Inserts one record and returns its generated id.
    async fn insert(&self, record: &NewConsultation) -> Result<i64>;
}

#[derive(Clone)]
pub struct ConsultationRepository {
    pool: SqlitePool,
}

impl ConsultationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<StoredConsultation>> {
        sqlx::query_as::<_, StoredConsultation>(
            r#"
            SELECT id, name, email, phone, practice_area, message, appointment_datetime, created_at
            FROM consultation_requests
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    pub async fn count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) as count FROM consultation_requests")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        row.try_get("count").map_err(AppError::from)
    }
}

#[async_trait]
impl ConsultationStore for ConsultationRepository {
    async fn insert(&self, record: &NewConsultation) -> Result<i64> {
        let row = sqlx::query(
            r#"
            INSERT INTO consultation_requests
                (name, email, phone, practice_area, message, appointment_datetime, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.phone)
        .bind(&record.practice_area)
        .bind(&record.message)
        .bind(&record.appointment_datetime)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(AppError::from)?;

        row.try_get("id").map_err(AppError::from)
    }
}
