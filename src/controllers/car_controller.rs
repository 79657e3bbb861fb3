use rust_decimal::Decimal;
use sqlx::PgPool;
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

use crate::dto::auth_dto::ApiResponse;
use crate::dto::car_dto::{
    AvailableCarResponse, CarResponse, CreateCarRequest, SearchQuery, UpdateCarRequest,
};
use crate::models::location::is_valid_location;
use crate::repositories::car_repository::CarRepository;
use crate::services::availability_service::AvailabilityService;
use crate::services::booking_service::{rental_days, total_price};
use crate::utils::errors::{validation_error, AppError};
use crate::utils::validation::{parse_instant, validate_not_empty};

pub struct CarController {
    repository: CarRepository,
    availability: AvailabilityService,
}

impl CarController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: CarRepository::new(pool.clone()),
            availability: AvailabilityService::new(pool),
        }
    }

    pub async fn create(
        &self,
        owner_email: &str,
        request: CreateCarRequest,
    ) -> Result<ApiResponse<CarResponse>, AppError> {
        request.validate()?;
        validate_not_empty("model", &request.model)?;

        if !is_valid_location(&request.location) {
            return Err(validation_error("location", "unknown branch code"));
        }

        let daily_price = parse_price(&request.daily_price)?;

        let car = self
            .repository
            .create(
                owner_email,
                request.model,
                daily_price,
                request.images,
                request.location,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            car.into(),
            "Coche publicado exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<CarResponse, AppError> {
        let car = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Coche no encontrado".to_string()))?;

        Ok(car.into())
    }

    pub async fn list(&self) -> Result<Vec<CarResponse>, AppError> {
        let cars = self.repository.find_all().await?;
        Ok(cars.into_iter().map(CarResponse::from).collect())
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_email: &str,
        request: UpdateCarRequest,
    ) -> Result<ApiResponse<CarResponse>, AppError> {
        request.validate()?;

        if let Some(ref location) = request.location {
            if !is_valid_location(location) {
                return Err(validation_error("location", "unknown branch code"));
            }
        }

        let daily_price = match request.daily_price {
            Some(ref raw) => Some(parse_price(raw)?),
            None => None,
        };

        let car = self
            .repository
            .update(
                id,
                owner_email,
                request.model,
                daily_price,
                request.images,
                request.location,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            car.into(),
            "Coche actualizado exitosamente".to_string(),
        ))
    }

    pub async fn delete(&self, id: Uuid, owner_email: &str) -> Result<(), AppError> {
        self.repository.delete(id, owner_email).await
    }

    /// Búsqueda por ventana de fechas: coches libres en [from, to] con el
    /// precio de la ventana calculado con la tarifa listada de cada coche.
    pub async fn search_available(
        &self,
        query: SearchQuery,
    ) -> Result<Vec<AvailableCarResponse>, AppError> {
        let from = parse_instant("from", &query.from)?;
        let to = parse_instant("to", &query.to)?;

        let cars = self.availability.search_available_cars(from, to).await?;

        let days = rental_days(from, to);
        let results = cars
            .into_iter()
            .map(|car| {
                let window_total = total_price(days, car.daily_price);
                AvailableCarResponse {
                    car: car.into(),
                    rental_days: days,
                    total_price: window_total.to_string(),
                }
            })
            .collect();

        Ok(results)
    }
}

fn parse_price(raw: &str) -> Result<Decimal, AppError> {
    let price = Decimal::from_str(raw)
        .map_err(|_| validation_error("daily_price", "must be a decimal number"))?;

    if price <= Decimal::ZERO {
        return Err(validation_error("daily_price", "must be greater than zero"));
    }

    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_price_accepts_decimals() {
        assert_eq!(parse_price("50").unwrap(), Decimal::from(50));
        assert_eq!(parse_price("49.99").unwrap().to_string(), "49.99");
    }

    #[test]
    fn parse_price_rejects_non_positive_and_garbage() {
        assert!(parse_price("0").is_err());
        assert!(parse_price("-5").is_err());
        assert!(parse_price("fifty").is_err());
    }
}
