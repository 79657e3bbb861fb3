//! Modelo de Car
//!
//! Este módulo contiene el struct Car que mapea exactamente a la tabla
//! cars del schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Car principal - mapea exactamente a la tabla cars
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub owner_email: String,
    pub model: String,
    pub daily_price: Decimal,
    pub images: Vec<String>,
    pub location: String,
    pub booking_count: i32,
    pub created_at: DateTime<Utc>,
}

impl Car {
    /// Primera imagen del coche, usada como snapshot al crear una reserva
    pub fn first_image(&self) -> Option<String> {
        self.images.first().cloned()
    }
}
