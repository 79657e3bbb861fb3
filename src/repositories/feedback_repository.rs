use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::feedback::Feedback;
use crate::utils::errors::AppError;

pub struct FeedbackRepository {
    pool: PgPool,
}

impl FeedbackRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        car_id: Uuid,
        author_email: &str,
        rating: i32,
        comment: String,
    ) -> Result<Feedback, AppError> {
        let id = Uuid::new_v4();

        let feedback = sqlx::query_as::<_, Feedback>(
            r#"
            INSERT INTO feedback (id, car_id, author_email, rating, comment, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(car_id)
        .bind(author_email)
        .bind(rating)
        .bind(comment)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(feedback)
    }

    pub async fn find_by_car(&self, car_id: Uuid) -> Result<Vec<Feedback>, AppError> {
        let feedback = sqlx::query_as::<_, Feedback>(
            "SELECT * FROM feedback WHERE car_id = $1 ORDER BY created_at DESC",
        )
        .bind(car_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(feedback)
    }
}
