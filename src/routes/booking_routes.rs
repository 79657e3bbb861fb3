use axum::{
    extract::{Path, Query, State},
    middleware,
    routing::{get, post, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::booking_controller::BookingController;
use crate::dto::auth_dto::ApiResponse;
use crate::dto::booking_dto::{
    AvailabilityQuery, AvailabilityResponse, BookedRangeResponse, BookedRangesQuery,
    BookingResponse, CreateBookingRequest, ModifyBookingRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_booking_router(state: AppState) -> Router<AppState> {
    // Disponibilidad y rangos son lectura pública; el resto exige dueño
    let protected = Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_my_bookings))
        .route("/:id", get(get_booking))
        .route("/:id", put(modify_booking))
        .route("/:id/confirm", put(confirm_booking))
        .route("/:id/cancel", put(cancel_booking))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/car/:car_id", get(list_bookings_for_car))
        .route("/car/:car_id/availability", get(check_availability))
        .route("/car/:car_id/ranges", get(booked_ranges))
        .merge(protected)
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.car_locks.clone());
    let response = controller.create(&user.email, request).await?;
    Ok(Json(response))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.car_locks.clone());
    let response = controller.get_by_id(id, &user.email).await?;
    Ok(Json(response))
}

async fn list_my_bookings(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.car_locks.clone());
    let response = controller.list_mine(&user.email).await?;
    Ok(Json(response))
}

async fn confirm_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.car_locks.clone());
    let response = controller.confirm(id, &user.email).await?;
    Ok(Json(response))
}

async fn modify_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<ModifyBookingRequest>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.car_locks.clone());
    let response = controller.modify(id, &user.email, request).await?;
    Ok(Json(response))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.car_locks.clone());
    let response = controller.cancel(id, &user.email).await?;
    Ok(Json(response))
}

async fn check_availability(
    State(state): State<AppState>,
    Path(car_id): Path<Uuid>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.car_locks.clone());
    let response = controller.check_availability(car_id, query).await?;
    Ok(Json(response))
}

async fn booked_ranges(
    State(state): State<AppState>,
    Path(car_id): Path<Uuid>,
    Query(query): Query<BookedRangesQuery>,
) -> Result<Json<Vec<BookedRangeResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.car_locks.clone());
    let response = controller.booked_ranges(car_id, query).await?;
    Ok(Json(response))
}

async fn list_bookings_for_car(
    State(state): State<AppState>,
    Path(car_id): Path<Uuid>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let controller = BookingController::new(state.pool.clone(), state.car_locks.clone());
    let response = controller.list_for_car(car_id).await?;
    Ok(Json(response))
}
