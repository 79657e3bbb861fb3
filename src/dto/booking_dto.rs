use serde::{Deserialize, Serialize};

use crate::models::booking::{BookedRange, Booking};

/// Request para crear una reserva
///
/// Las fechas llegan como string y se validan antes de tocar el store:
/// una fecha malformada es un ValidationError, nunca un error de SQL.
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub car_id: String,
    pub start_date: String,
    pub end_date: String,
}

/// Request para modificar las fechas de una reserva existente
#[derive(Debug, Deserialize)]
pub struct ModifyBookingRequest {
    pub start_date: String,
    pub end_date: String,
}

/// Response de reserva para la API
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub car_id: String,
    pub owner_email: String,
    pub car_model: String,
    pub car_image: Option<String>,
    pub start_date: String,
    pub end_date: String,
    pub total_price: String,
    pub status: String,
    pub created_at: String,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            car_id: booking.car_id.to_string(),
            owner_email: booking.owner_email,
            car_model: booking.car_model,
            car_image: booking.car_image,
            start_date: booking.start_date.to_rfc3339(),
            end_date: booking.end_date.to_rfc3339(),
            total_price: booking.total_price.to_string(),
            status: booking.status.as_str().to_string(),
            created_at: booking.created_at.to_rfc3339(),
        }
    }
}

/// Query params del chequeo de disponibilidad
#[derive(Debug, Deserialize)]
pub struct AvailabilityQuery {
    pub start: String,
    pub end: String,
}

/// Response del chequeo de disponibilidad
#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub car_id: String,
    pub available: bool,
}

/// Query params opcionales al listar rangos reservados
#[derive(Debug, Deserialize)]
pub struct BookedRangesQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Rango reservado de un coche
#[derive(Debug, Serialize)]
pub struct BookedRangeResponse {
    pub start_date: String,
    pub end_date: String,
}

impl From<BookedRange> for BookedRangeResponse {
    fn from(range: BookedRange) -> Self {
        Self {
            start_date: range.start_date.to_rfc3339(),
            end_date: range.end_date.to_rfc3339(),
        }
    }
}
