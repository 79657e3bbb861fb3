use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::car::Car;

/// Request para publicar un nuevo coche
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 2, max = 100))]
    pub model: String,

    /// Precio diario como string decimal, p. ej. "50" o "49.99"
    pub daily_price: String,

    pub images: Vec<String>,

    /// Código de sucursal del listado estático
    #[validate(length(min = 2, max = 10))]
    pub location: String,
}

/// Request para actualizar un coche existente
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(length(min = 2, max = 100))]
    pub model: Option<String>,

    pub daily_price: Option<String>,

    pub images: Option<Vec<String>>,

    #[validate(length(min = 2, max = 10))]
    pub location: Option<String>,
}

/// Response de coche para la API
#[derive(Debug, Serialize)]
pub struct CarResponse {
    pub id: String,
    pub owner_email: String,
    pub model: String,
    pub daily_price: String,
    pub images: Vec<String>,
    pub location: String,
    pub booking_count: i32,
    pub created_at: String,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        Self {
            id: car.id.to_string(),
            owner_email: car.owner_email,
            model: car.model,
            daily_price: car.daily_price.to_string(),
            images: car.images,
            location: car.location,
            booking_count: car.booking_count,
            created_at: car.created_at.to_rfc3339(),
        }
    }
}

/// Query params de la búsqueda por ventana de fechas
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub from: String,
    pub to: String,
}

/// Coche disponible en una ventana, con el precio total ya calculado
#[derive(Debug, Serialize)]
pub struct AvailableCarResponse {
    #[serde(flatten)]
    pub car: CarResponse,
    pub rental_days: i64,
    pub total_price: String,
}
