use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::feedback::Feedback;

/// Request para dejar feedback sobre un coche
#[derive(Debug, Deserialize, Validate)]
pub struct CreateFeedbackRequest {
    pub car_id: String,

    #[validate(range(min = 1, max = 5))]
    pub rating: i32,

    #[validate(length(min = 1, max = 2000))]
    pub comment: String,
}

/// Response de feedback para la API
#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub id: String,
    pub car_id: String,
    pub author_email: String,
    pub rating: i32,
    pub comment: String,
    pub created_at: String,
}

impl From<Feedback> for FeedbackResponse {
    fn from(feedback: Feedback) -> Self {
        Self {
            id: feedback.id.to_string(),
            car_id: feedback.car_id.to_string(),
            author_email: feedback.author_email,
            rating: feedback.rating,
            comment: feedback.comment,
            created_at: feedback.created_at.to_rfc3339(),
        }
    }
}
