//! Backend de reservas de alquiler de coches
//!
//! API REST sobre PostgreSQL: coches, reservas y feedback, con checks de
//! propiedad por JWT. El núcleo es el motor de solape y precio de reservas
//! (ver `services`).

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{response::Json, routing::get, Router};
use serde_json::json;

use middleware::cors::cors_layer;
use state::AppState;

/// Construir el router completo de la aplicación
pub fn build_app(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origins);

    Router::new()
        .route("/health", get(health))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .nest("/api/car", routes::car_routes::create_car_router(state.clone()))
        .nest(
            "/api/booking",
            routes::booking_routes::create_booking_router(state.clone()),
        )
        .nest(
            "/api/feedback",
            routes::feedback_routes::create_feedback_router(state.clone()),
        )
        .layer(cors)
        .with_state(state)
}

/// Health check simple
async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "service": "rental-booking",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
