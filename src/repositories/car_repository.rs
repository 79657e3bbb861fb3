use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::car::Car;
use crate::utils::errors::AppError;

pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        owner_email: &str,
        model: String,
        daily_price: Decimal,
        images: Vec<String>,
        location: String,
    ) -> Result<Car, AppError> {
        let id = Uuid::new_v4();

        let car = sqlx::query_as::<_, Car>(
            r#"
            INSERT INTO cars (id, owner_email, model, daily_price, images, location, booking_count, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 0, $7)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(owner_email)
        .bind(model)
        .bind(daily_price)
        .bind(images)
        .bind(location)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Car>, AppError> {
        let car = sqlx::query_as::<_, Car>("SELECT * FROM cars WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(car)
    }

    pub async fn find_all(&self) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>("SELECT * FROM cars ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(cars)
    }

    pub async fn update(
        &self,
        id: Uuid,
        owner_email: &str,
        model: Option<String>,
        daily_price: Option<Decimal>,
        images: Option<Vec<String>>,
        location: Option<String>,
    ) -> Result<Car, AppError> {
        let current = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        if current.owner_email != owner_email {
            return Err(AppError::Forbidden(
                "Car does not belong to this user".to_string(),
            ));
        }

        let car = sqlx::query_as::<_, Car>(
            r#"
            UPDATE cars
            SET model = $2, daily_price = $3, images = $4, location = $5
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(model.unwrap_or(current.model))
        .bind(daily_price.unwrap_or(current.daily_price))
        .bind(images.unwrap_or(current.images))
        .bind(location.unwrap_or(current.location))
        .fetch_one(&self.pool)
        .await?;

        Ok(car)
    }

    pub async fn delete(&self, id: Uuid, owner_email: &str) -> Result<(), AppError> {
        let car = self
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        if car.owner_email != owner_email {
            return Err(AppError::Forbidden(
                "Car does not belong to this user".to_string(),
            ));
        }

        sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Incremento atómico del contador de reservas.
    ///
    /// Se ejecuta después del insert de la reserva; el par no es una
    /// transacción única y existe una ventana estrecha en la que la reserva
    /// ya existe con el contador sin actualizar. El contador es de display,
    /// no participa en ningún chequeo de disponibilidad.
    pub async fn increment_booking_count(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("UPDATE cars SET booking_count = booking_count + 1 WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Coches sin ninguna reserva activa que solape la ventana [from, to].
    ///
    /// El predicado SQL es el mismo solape inclusivo que usa el Availability
    /// Checker: start_date <= $to AND end_date >= $from.
    pub async fn search_available(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Car>, AppError> {
        let cars = sqlx::query_as::<_, Car>(
            r#"
            SELECT c.* FROM cars c
            WHERE NOT EXISTS (
                SELECT 1 FROM bookings b
                WHERE b.car_id = c.id
                  AND b.status IN ('pending', 'confirmed')
                  AND b.start_date <= $2
                  AND b.end_date >= $1
            )
            ORDER BY c.created_at DESC
            "#,
        )
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(cars)
    }
}
