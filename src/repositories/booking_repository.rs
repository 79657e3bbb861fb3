use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{BookedRange, Booking};
use crate::models::car::Car;
use crate::utils::errors::AppError;

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        car: &Car,
        owner_email: &str,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        total_price: Decimal,
    ) -> Result<Booking, AppError> {
        let id = Uuid::new_v4();

        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (id, car_id, owner_email, car_model, car_image, start_date, end_date, total_price, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', $9)
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(car.id)
        .bind(owner_email)
        .bind(&car.model)
        .bind(car.first_image())
        .bind(start_date)
        .bind(end_date)
        .bind(total_price)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(booking)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(booking)
    }

    pub async fn find_by_owner(&self, owner_email: &str) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            "SELECT * FROM bookings WHERE owner_email = $1 ORDER BY created_at DESC",
        )
        .bind(owner_email)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// Reservas activas (pending o confirmed) de un coche
    pub async fn find_active_by_car(&self, car_id: Uuid) -> Result<Vec<Booking>, AppError> {
        let bookings = sqlx::query_as::<_, Booking>(
            r#"
            SELECT * FROM bookings
            WHERE car_id = $1 AND status IN ('pending', 'confirmed')
            ORDER BY start_date
            "#,
        )
        .bind(car_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(bookings)
    }

    /// ¿Existe alguna reserva activa del coche que solape [start, end]?
    ///
    /// Solape inclusivo: extremos iguales cuentan como conflicto. El
    /// predicado SQL replica exactamente `ranges_overlap` del Availability
    /// Checker. `exclude` permite omitir la propia reserva al modificarla.
    pub async fn has_overlap(
        &self,
        car_id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        exclude: Option<Uuid>,
    ) -> Result<bool, AppError> {
        let result: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM bookings
                WHERE car_id = $1
                  AND status IN ('pending', 'confirmed')
                  AND start_date <= $3
                  AND end_date >= $2
                  AND ($4::uuid IS NULL OR id <> $4)
            )
            "#,
        )
        .bind(car_id)
        .bind(start_date)
        .bind(end_date)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await?;

        Ok(result.0)
    }

    /// Rangos ocupados de un coche, ordenados por fecha de inicio.
    /// La ventana opcional filtra a rangos que la intersectan.
    pub async fn list_booked_ranges(
        &self,
        car_id: Uuid,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<BookedRange>, AppError> {
        let (from, to) = match window {
            Some((from, to)) => (Some(from), Some(to)),
            None => (None, None),
        };

        let ranges = sqlx::query_as::<_, BookedRange>(
            r#"
            SELECT start_date, end_date FROM bookings
            WHERE car_id = $1
              AND status IN ('pending', 'confirmed')
              AND ($2::timestamptz IS NULL OR (start_date <= $3 AND end_date >= $2))
            ORDER BY start_date
            "#,
        )
        .bind(car_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(ranges)
    }

    /// pending -> confirmed, con la guarda de estado en el propio UPDATE.
    ///
    /// Devuelve None si el estado ya no era pending al ejecutarse: así un
    /// Cancel que gane la carrera no puede ser pisado por este Confirm.
    pub async fn confirm_pending(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = 'confirmed'
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// pending/confirmed -> cancelled. Devuelve None si la reserva ya
    /// estaba cancelada (el UPDATE no toca filas terminales).
    pub async fn cancel_active(&self, id: Uuid) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings SET status = 'cancelled'
            WHERE id = $1 AND status IN ('pending', 'confirmed')
            RETURNING *
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }

    /// Cambiar fechas y total de una reserva activa. Devuelve None si la
    /// reserva se canceló entre la lectura del servicio y este UPDATE.
    pub async fn update_dates(
        &self,
        id: Uuid,
        start_date: DateTime<Utc>,
        end_date: DateTime<Utc>,
        total_price: Decimal,
    ) -> Result<Option<Booking>, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET start_date = $2, end_date = $3, total_price = $4
            WHERE id = $1 AND status <> 'cancelled'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(start_date)
        .bind(end_date)
        .bind(total_price)
        .fetch_optional(&self.pool)
        .await?;

        Ok(booking)
    }
}
