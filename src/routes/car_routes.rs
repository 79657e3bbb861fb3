use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{delete, get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::car_controller::CarController;
use crate::dto::auth_dto::ApiResponse;
use crate::dto::car_dto::{
    AvailableCarResponse, CarResponse, CreateCarRequest, SearchQuery, UpdateCarRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::models::location::{Location, LOCATIONS};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router(state: AppState) -> Router<AppState> {
    // Mutaciones solo para el dueño autenticado; lectura pública
    let protected = Router::new()
        .route("/", post(create_car))
        .route("/:id", put(update_car))
        .route("/:id", delete(delete_car))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/locations", get(list_locations))
        .route("/search", get(search_available))
        .route("/", get(list_cars))
        .route("/:id", get(get_car))
        .merge(protected)
}

async fn create_car(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateCarRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.create(&user.email, request).await?;
    Ok(Json(response))
}

async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<CarResponse>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn list_cars(
    State(state): State<AppState>,
) -> Result<Json<Vec<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn update_car(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateCarRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.update(id, &user.email, request).await?;
    Ok(Json(response))
}

async fn delete_car(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = CarController::new(state.pool.clone());
    controller.delete(id, &user.email).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Coche eliminado exitosamente"
    })))
}

async fn search_available(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<AvailableCarResponse>>, AppError> {
    let controller = CarController::new(state.pool.clone());
    let response = controller.search_available(query).await?;
    Ok(Json(response))
}

async fn list_locations() -> Json<Vec<Location>> {
    Json(LOCATIONS.to_vec())
}
