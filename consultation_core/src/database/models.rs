use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted consultation request. Rows are insert-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredConsultation {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub practice_area: String,
    pub message: String,
    pub appointment_datetime: String,
    pub created_at: DateTime<Utc>,
}
