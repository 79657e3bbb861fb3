use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::feedback_controller::FeedbackController;
use crate::dto::auth_dto::ApiResponse;
use crate::dto::feedback_dto::{CreateFeedbackRequest, FeedbackResponse};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_feedback_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(create_feedback))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/car/:car_id", get(list_feedback_for_car))
        .merge(protected)
}

async fn create_feedback(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateFeedbackRequest>,
) -> Result<Json<ApiResponse<FeedbackResponse>>, AppError> {
    let controller = FeedbackController::new(state.pool.clone());
    let response = controller.create(&user.email, request).await?;
    Ok(Json(response))
}

async fn list_feedback_for_car(
    State(state): State<AppState>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<Vec<FeedbackResponse>>, AppError> {
    let controller = FeedbackController::new(state.pool.clone());
    let response = controller.list_for_car(car_id).await?;
    Ok(Json(response))
}
