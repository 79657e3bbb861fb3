//! Booking Lifecycle Manager
//!
//! Crea, confirma, modifica y cancela reservas, usando el chequeo de
//! disponibilidad como precondición y calculando/recalculando el precio.
//!
//! Máquina de estados: pending -> confirmed, pending -> cancelled,
//! confirmed -> cancelled. Una reserva cancelada es terminal: no se
//! confirma ni se modifica, y su rango queda liberado.
//!
//! El chequeo de solape y el insert/update que le sigue se serializan
//! por coche con los locks de `CarLocks`: sin eso, dos Create concurrentes
//! con rangos solapados pueden pasar ambos el chequeo antes de que ninguno
//! escriba y producir doble reserva.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::booking::{Booking, BookingStatus};
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::car_repository::CarRepository;
use crate::state::CarLocks;
use crate::utils::errors::{validation_error, AppError};

const MS_PER_DAY: i64 = 86_400_000;

/// Días facturables del rango [start, end]: ceil sobre días completos,
/// mínimo 1 (un alquiler de mismo día cuenta como un día).
pub fn rental_days(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let ms = (end - start).num_milliseconds();
    if ms <= 0 {
        return 1;
    }
    (ms + MS_PER_DAY - 1) / MS_PER_DAY
}

/// Precio total: días * tarifa diaria
pub fn total_price(days: i64, daily_rate: Decimal) -> Decimal {
    Decimal::from(days) * daily_rate
}

/// Operación del ciclo de vida que pide cambiar el estado de una reserva.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleOp {
    Confirm,
    Modify,
    Cancel,
}

/// Decisión de transición de la máquina de estados, como función pura.
///
/// - `Ok(Some(nuevo))`: persistir la transición.
/// - `Ok(None)`: no hay nada que escribir (re-confirmar una confirmada y
///   re-cancelar una cancelada son idempotentes; Modify no cambia estado).
/// - `Err(Conflict)`: transición prohibida (cancelled es terminal).
pub fn next_status(
    current: BookingStatus,
    op: LifecycleOp,
) -> Result<Option<BookingStatus>, AppError> {
    match (current, op) {
        (BookingStatus::Pending, LifecycleOp::Confirm) => Ok(Some(BookingStatus::Confirmed)),
        (BookingStatus::Confirmed, LifecycleOp::Confirm) => Ok(None),
        (BookingStatus::Cancelled, LifecycleOp::Confirm) => Err(AppError::Conflict(
            "Cancelled booking cannot be confirmed".to_string(),
        )),
        (BookingStatus::Pending | BookingStatus::Confirmed, LifecycleOp::Modify) => Ok(None),
        (BookingStatus::Cancelled, LifecycleOp::Modify) => Err(AppError::Conflict(
            "Cancelled booking cannot be modified".to_string(),
        )),
        (BookingStatus::Pending | BookingStatus::Confirmed, LifecycleOp::Cancel) => {
            Ok(Some(BookingStatus::Cancelled))
        }
        (BookingStatus::Cancelled, LifecycleOp::Cancel) => Ok(None),
    }
}

/// Tarifa diaria pactada originalmente en una reserva existente.
///
/// Al modificar fechas se recalcula sobre total_price / días originales,
/// NO sobre el precio actual del coche: la tarifa quedó fijada al crear
/// la reserva y protege al cliente de subidas posteriores.
pub fn locked_daily_rate(booking: &Booking) -> Decimal {
    let original_days = rental_days(booking.start_date, booking.end_date);
    booking.total_price / Decimal::from(original_days)
}

pub struct BookingService {
    bookings: BookingRepository,
    cars: CarRepository,
    locks: CarLocks,
}

impl BookingService {
    pub fn new(pool: PgPool, locks: CarLocks) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            cars: CarRepository::new(pool),
            locks,
        }
    }

    /// Crear una reserva en estado pending.
    ///
    /// Orden de comprobaciones: fechas válidas, coche existente, ausencia
    /// de solape con reservas activas. El insert y el incremento del
    /// contador del coche son dos sentencias; la ventana entre ambas solo
    /// afecta a un contador de display.
    pub async fn create(
        &self,
        car_id: Uuid,
        owner_email: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        if end < start {
            return Err(validation_error(
                "end_date",
                "end date must not be before start date",
            ));
        }

        let car = self
            .cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car with id '{}' not found", car_id)))?;

        // Sección crítica por coche: chequeo de solape + insert serializados
        let lock = self.locks.lock_for(car_id).await;
        let _guard = lock.lock().await;

        if self.bookings.has_overlap(car_id, start, end, None).await? {
            return Err(AppError::Conflict(
                "Car is already booked for the requested dates".to_string(),
            ));
        }

        let days = rental_days(start, end);
        let total = total_price(days, car.daily_price);

        let booking = self
            .bookings
            .create(&car, owner_email, start, end, total)
            .await?;

        self.cars.increment_booking_count(car_id).await?;

        info!(
            "📅 Reserva {} creada: coche {}, {} días, total {}",
            booking.id, car_id, days, total
        );

        Ok(booking)
    }

    /// Confirmar una reserva pendiente.
    ///
    /// Re-confirmar una reserva ya confirmada es idempotente: no cambia
    /// fechas ni precio y no es error. Confirmar una cancelada es Conflict.
    pub async fn confirm(&self, booking_id: Uuid, requester_email: &str) -> Result<Booking, AppError> {
        let booking = self.owned_booking(booking_id, requester_email).await?;

        if next_status(booking.status, LifecycleOp::Confirm)?.is_none() {
            return Ok(booking);
        }

        if let Some(confirmed) = self.bookings.confirm_pending(booking_id).await? {
            return Ok(confirmed);
        }

        // El estado cambió entre la lectura y el UPDATE guardado:
        // re-resolver contra el estado actual.
        let current = self.refetch(booking_id).await?;
        match next_status(current.status, LifecycleOp::Confirm)? {
            None => Ok(current),
            Some(_) => Err(AppError::Conflict(
                "Booking state changed concurrently".to_string(),
            )),
        }
    }

    /// Modificar las fechas de una reserva no cancelada.
    ///
    /// El solape se re-chequea contra las demás reservas activas del mismo
    /// coche, excluyendo la propia. La tarifa diaria se conserva del
    /// momento de la creación (ver `locked_daily_rate`).
    pub async fn modify(
        &self,
        booking_id: Uuid,
        requester_email: &str,
        new_start: DateTime<Utc>,
        new_end: DateTime<Utc>,
    ) -> Result<Booking, AppError> {
        if new_end < new_start {
            return Err(validation_error(
                "end_date",
                "end date must not be before start date",
            ));
        }

        let booking = self.owned_booking(booking_id, requester_email).await?;

        // Modify no cambia el estado, pero sí exige uno no terminal
        next_status(booking.status, LifecycleOp::Modify)?;

        let rate = locked_daily_rate(&booking);

        let lock = self.locks.lock_for(booking.car_id).await;
        let _guard = lock.lock().await;

        if self
            .bookings
            .has_overlap(booking.car_id, new_start, new_end, Some(booking_id))
            .await?
        {
            return Err(AppError::Conflict(
                "Car is already booked for the requested dates".to_string(),
            ));
        }

        let new_days = rental_days(new_start, new_end);
        let new_total = total_price(new_days, rate);

        self.bookings
            .update_dates(booking_id, new_start, new_end, new_total)
            .await?
            .ok_or_else(|| {
                AppError::Conflict("Booking state changed concurrently".to_string())
            })
    }

    /// Cancelar una reserva, desde pending o desde confirmed.
    ///
    /// El rango vuelve a estar disponible inmediatamente. Cancelar una
    /// reserva ya cancelada es idempotente.
    pub async fn cancel(&self, booking_id: Uuid, requester_email: &str) -> Result<Booking, AppError> {
        let booking = self.owned_booking(booking_id, requester_email).await?;

        if next_status(booking.status, LifecycleOp::Cancel)?.is_none() {
            return Ok(booking);
        }

        if let Some(cancelled) = self.bookings.cancel_active(booking_id).await? {
            return Ok(cancelled);
        }

        // Ya la canceló otra petición concurrente: mismo resultado
        self.refetch(booking_id).await
    }

    pub async fn list_for_owner(&self, owner_email: &str) -> Result<Vec<Booking>, AppError> {
        self.bookings.find_by_owner(owner_email).await
    }

    pub async fn list_active_for_car(&self, car_id: Uuid) -> Result<Vec<Booking>, AppError> {
        self.cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car with id '{}' not found", car_id)))?;

        self.bookings.find_active_by_car(car_id).await
    }

    pub async fn get_owned(&self, booking_id: Uuid, requester_email: &str) -> Result<Booking, AppError> {
        self.owned_booking(booking_id, requester_email).await
    }

    /// Resolver la reserva y verificar propiedad. NotFound y Forbidden
    /// se reportan por separado: no existe no es lo mismo que no es tuya.
    async fn owned_booking(&self, booking_id: Uuid, requester_email: &str) -> Result<Booking, AppError> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Booking with id '{}' not found", booking_id))
            })?;

        if booking.owner_email != requester_email {
            return Err(AppError::Forbidden(
                "Booking does not belong to this user".to_string(),
            ));
        }

        Ok(booking)
    }

    /// Releer una reserva que acabamos de resolver; si desapareció en
    /// medio, se reporta como NotFound.
    async fn refetch(&self, booking_id: Uuid) -> Result<Booking, AppError> {
        self.bookings.find_by_id(booking_id).await?.ok_or_else(|| {
            AppError::NotFound(format!("Booking with id '{}' not found", booking_id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn date(s: &str) -> DateTime<Utc> {
        use chrono::NaiveDate;
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
    }

    fn datetime(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn two_whole_days() {
        assert_eq!(rental_days(date("2024-01-01"), date("2024-01-03")), 2);
    }

    #[test]
    fn same_day_rental_counts_as_one_day() {
        assert_eq!(rental_days(date("2024-01-01"), date("2024-01-01")), 1);
    }

    #[test]
    fn partial_day_rounds_up() {
        // 36 horas -> 2 días
        assert_eq!(
            rental_days(datetime("2024-01-01T00:00:00Z"), datetime("2024-01-02T12:00:00Z")),
            2
        );
        // 1 milisegundo por encima de un día -> 2 días
        assert_eq!(
            rental_days(
                datetime("2024-01-01T00:00:00Z"),
                datetime("2024-01-02T00:00:00.001Z")
            ),
            2
        );
    }

    #[test]
    fn exact_day_boundary_does_not_round_up() {
        assert_eq!(
            rental_days(datetime("2024-01-01T00:00:00Z"), datetime("2024-01-04T00:00:00Z")),
            3
        );
    }

    #[test]
    fn pricing_scenario_from_listing() {
        // Coche con tarifa 50: [2024-01-01, 2024-01-03] -> 2 días, total 100
        let days = rental_days(date("2024-01-01"), date("2024-01-03"));
        assert_eq!(days, 2);
        assert_eq!(total_price(days, dec(50)), dec(100));

        // [2024-01-04, 2024-01-05] -> 1 día, total 50
        let days = rental_days(date("2024-01-04"), date("2024-01-05"));
        assert_eq!(days, 1);
        assert_eq!(total_price(days, dec(50)), dec(50));
    }

    #[test]
    fn locked_rate_survives_modification() {
        let booking = Booking {
            id: Uuid::new_v4(),
            car_id: Uuid::new_v4(),
            owner_email: "renter@example.com".to_string(),
            car_model: "Swift".to_string(),
            car_image: None,
            start_date: date("2024-01-01"),
            end_date: date("2024-01-03"),
            total_price: dec(100),
            status: BookingStatus::Pending,
            created_at: Utc::now(),
        };

        // Tarifa original: 100 / 2 días = 50, aunque el coche haya
        // cambiado de precio después.
        let rate = locked_daily_rate(&booking);
        assert_eq!(rate, dec(50));

        let new_days = rental_days(date("2024-02-01"), date("2024-02-06"));
        assert_eq!(new_days, 5);
        assert_eq!(total_price(new_days, rate), dec(250));
    }

    #[test]
    fn locked_rate_on_single_day_booking() {
        let booking = Booking {
            id: Uuid::new_v4(),
            car_id: Uuid::new_v4(),
            owner_email: "renter@example.com".to_string(),
            car_model: "Swift".to_string(),
            car_image: None,
            start_date: date("2024-01-04"),
            end_date: date("2024-01-04"),
            total_price: dec(50),
            status: BookingStatus::Confirmed,
            created_at: Utc::now(),
        };

        assert_eq!(locked_daily_rate(&booking), dec(50));
    }

    fn is_conflict(result: Result<Option<BookingStatus>, AppError>) -> bool {
        matches!(result, Err(AppError::Conflict(_)))
    }

    #[test]
    fn confirm_moves_pending_to_confirmed() {
        assert_eq!(
            next_status(BookingStatus::Pending, LifecycleOp::Confirm).unwrap(),
            Some(BookingStatus::Confirmed)
        );
    }

    #[test]
    fn reconfirm_is_idempotent() {
        // Nada que escribir: fechas y precio quedan intactos
        assert_eq!(
            next_status(BookingStatus::Confirmed, LifecycleOp::Confirm).unwrap(),
            None
        );
    }

    #[test]
    fn confirm_of_cancelled_is_conflict() {
        assert!(is_conflict(next_status(
            BookingStatus::Cancelled,
            LifecycleOp::Confirm
        )));
    }

    #[test]
    fn modify_keeps_status_of_active_bookings() {
        assert_eq!(
            next_status(BookingStatus::Pending, LifecycleOp::Modify).unwrap(),
            None
        );
        assert_eq!(
            next_status(BookingStatus::Confirmed, LifecycleOp::Modify).unwrap(),
            None
        );
    }

    #[test]
    fn modify_of_cancelled_is_conflict() {
        assert!(is_conflict(next_status(
            BookingStatus::Cancelled,
            LifecycleOp::Modify
        )));
    }

    #[test]
    fn cancel_works_from_pending_and_confirmed() {
        assert_eq!(
            next_status(BookingStatus::Pending, LifecycleOp::Cancel).unwrap(),
            Some(BookingStatus::Cancelled)
        );
        assert_eq!(
            next_status(BookingStatus::Confirmed, LifecycleOp::Cancel).unwrap(),
            Some(BookingStatus::Cancelled)
        );
    }

    #[test]
    fn cancel_twice_is_idempotent() {
        assert_eq!(
            next_status(BookingStatus::Cancelled, LifecycleOp::Cancel).unwrap(),
            None
        );
    }
}
