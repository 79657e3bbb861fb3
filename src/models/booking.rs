//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking, su enum de estado (mapea al
//! ENUM booking_status de PostgreSQL) y el rango reservado que expone
//! el Availability Checker.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de la reserva - mapea al ENUM booking_status
///
/// Transiciones permitidas: pending -> confirmed, pending -> cancelled,
/// confirmed -> cancelled. No hay transición que salga de cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    /// Las reservas activas (pending o confirmed) son las únicas que
    /// cuentan para la ocupación de un coche.
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

/// Booking principal - mapea exactamente a la tabla bookings
///
/// car_model y car_image son snapshots tomados del coche en el momento
/// de crear la reserva; no se actualizan si el coche cambia después.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub car_id: Uuid,
    pub owner_email: String,
    pub car_model: String,
    pub car_image: Option<String>,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub total_price: Decimal,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// Rango de fechas ocupado por una reserva activa
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct BookedRange {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_bookings_are_not_active() {
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }
}
