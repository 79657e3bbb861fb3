//! Modelo de Feedback

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Feedback de un usuario sobre un coche - mapea a la tabla feedback
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Feedback {
    pub id: Uuid,
    pub car_id: Uuid,
    pub author_email: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}
