use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::ApiResponse;
use crate::dto::feedback_dto::{CreateFeedbackRequest, FeedbackResponse};
use crate::repositories::car_repository::CarRepository;
use crate::repositories::feedback_repository::FeedbackRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::parse_uuid;

pub struct FeedbackController {
    repository: FeedbackRepository,
    cars: CarRepository,
}

impl FeedbackController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: FeedbackRepository::new(pool.clone()),
            cars: CarRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        author_email: &str,
        request: CreateFeedbackRequest,
    ) -> Result<ApiResponse<FeedbackResponse>, AppError> {
        request.validate()?;
        let car_id = parse_uuid("car_id", &request.car_id)?;

        self.cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Coche no encontrado".to_string()))?;

        let feedback = self
            .repository
            .create(car_id, author_email, request.rating, request.comment)
            .await?;

        Ok(ApiResponse::success_with_message(
            feedback.into(),
            "Feedback registrado exitosamente".to_string(),
        ))
    }

    pub async fn list_for_car(&self, car_id: Uuid) -> Result<Vec<FeedbackResponse>, AppError> {
        self.cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Coche no encontrado".to_string()))?;

        let feedback = self.repository.find_by_car(car_id).await?;
        Ok(feedback.into_iter().map(FeedbackResponse::from).collect())
    }
}
