//! Availability Checker
//!
//! Lógica de lectura pura sobre el store de reservas: decide si un rango
//! de fechas de un coche entra en conflicto con reservas activas. Solo
//! cuentan las reservas en estado pending o confirmed; una reserva
//! cancelada libera su rango de forma permanente.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::booking::{BookedRange, BookingStatus};
use crate::models::car::Car;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::car_repository::CarRepository;
use crate::utils::errors::{validation_error, AppError};

/// Predicado de solape inclusivo: `[s1, e1]` solapa `[s2, e2]` si
/// `s2 <= e1 AND e2 >= s1`. Los extremos que se tocan cuentan como
/// conflicto; es una política deliberada del negocio, no un redondeo.
pub fn ranges_overlap(
    s1: DateTime<Utc>,
    e1: DateTime<Utc>,
    s2: DateTime<Utc>,
    e2: DateTime<Utc>,
) -> bool {
    s2 <= e1 && e2 >= s1
}

/// ¿Bloquea una reserva con este estado y rango el rango candidato?
///
/// Forma canónica del predicado de ocupación: reserva activa Y solape
/// inclusivo. Los WHERE de `has_overlap` y `search_available` replican
/// exactamente esta función.
pub fn booking_blocks_range(
    status: BookingStatus,
    booked_start: DateTime<Utc>,
    booked_end: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    status.is_active() && ranges_overlap(start, end, booked_start, booked_end)
}

pub struct AvailabilityService {
    bookings: BookingRepository,
    cars: CarRepository,
}

impl AvailabilityService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            cars: CarRepository::new(pool),
        }
    }

    /// ¿Está el coche libre en [start, end]?
    ///
    /// El coche debe existir (NotFound si no) y `start <= end`
    /// (ValidationError si no, antes de tocar el store de reservas).
    pub async fn is_available(
        &self,
        car_id: Uuid,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<bool, AppError> {
        if end < start {
            return Err(validation_error(
                "end",
                "end date must not be before start date",
            ));
        }

        self.resolve_car(car_id).await?;

        let overlapping = self.bookings.has_overlap(car_id, start, end, None).await?;
        Ok(!overlapping)
    }

    /// Rangos ocupados de un coche, ordenados por inicio, opcionalmente
    /// recortados a una ventana.
    pub async fn list_booked_ranges(
        &self,
        car_id: Uuid,
        window: Option<(DateTime<Utc>, DateTime<Utc>)>,
    ) -> Result<Vec<BookedRange>, AppError> {
        if let Some((from, to)) = window {
            if to < from {
                return Err(validation_error(
                    "to",
                    "window end must not be before window start",
                ));
            }
        }

        self.resolve_car(car_id).await?;

        self.bookings.list_booked_ranges(car_id, window).await
    }

    /// Búsqueda batch: coches sin ninguna reserva activa que solape
    /// la ventana [from, to]. El precio de la ventana se calcula encima,
    /// en el controller.
    pub async fn search_available_cars(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<Car>, AppError> {
        if to < from {
            return Err(validation_error(
                "to",
                "window end must not be before window start",
            ));
        }

        self.cars.search_available(from, to).await
    }

    async fn resolve_car(&self, car_id: Uuid) -> Result<Car, AppError> {
        self.cars
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Car with id '{}' not found", car_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> DateTime<Utc> {
        use chrono::NaiveDate;
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            .and_utc()
    }

    #[test]
    fn disjoint_ranges_do_not_overlap() {
        assert!(!ranges_overlap(
            date("2024-01-01"),
            date("2024-01-03"),
            date("2024-01-04"),
            date("2024-01-05"),
        ));
        assert!(!ranges_overlap(
            date("2024-01-04"),
            date("2024-01-05"),
            date("2024-01-01"),
            date("2024-01-03"),
        ));
    }

    #[test]
    fn touching_endpoints_conflict() {
        // Política inclusiva: el día de devolución coincide con el de
        // recogida de la otra reserva y eso es conflicto.
        assert!(ranges_overlap(
            date("2024-01-01"),
            date("2024-01-03"),
            date("2024-01-03"),
            date("2024-01-04"),
        ));
        assert!(ranges_overlap(
            date("2024-01-03"),
            date("2024-01-04"),
            date("2024-01-01"),
            date("2024-01-03"),
        ));
    }

    #[test]
    fn contained_range_conflicts() {
        assert!(ranges_overlap(
            date("2024-01-01"),
            date("2024-01-10"),
            date("2024-01-03"),
            date("2024-01-05"),
        ));
        assert!(ranges_overlap(
            date("2024-01-03"),
            date("2024-01-05"),
            date("2024-01-01"),
            date("2024-01-10"),
        ));
    }

    #[test]
    fn partial_overlap_conflicts() {
        assert!(ranges_overlap(
            date("2024-01-01"),
            date("2024-01-05"),
            date("2024-01-04"),
            date("2024-01-08"),
        ));
    }

    #[test]
    fn identical_ranges_conflict() {
        assert!(ranges_overlap(
            date("2024-01-01"),
            date("2024-01-03"),
            date("2024-01-01"),
            date("2024-01-03"),
        ));
    }

    #[test]
    fn single_instant_ranges() {
        let d = date("2024-01-01");
        assert!(ranges_overlap(d, d, d, d));
        assert!(!ranges_overlap(d, d, date("2024-01-02"), date("2024-01-02")));
    }

    #[test]
    fn cancelled_booking_releases_its_range() {
        let (s, e) = (date("2024-02-02"), date("2024-02-03"));
        let (from, to) = (date("2024-02-01"), date("2024-02-04"));

        // Mientras la reserva está activa, el rango queda ocupado
        assert!(booking_blocks_range(BookingStatus::Pending, s, e, from, to));
        assert!(booking_blocks_range(BookingStatus::Confirmed, s, e, from, to));

        // Tras cancelar, el mismo rango deja de bloquear
        assert!(!booking_blocks_range(BookingStatus::Cancelled, s, e, from, to));
    }

    #[test]
    fn search_window_excludes_only_cars_with_blocking_bookings() {
        // Coche A con reserva [2024-02-02, 2024-02-03], coche B sin
        // reservas; ventana [2024-02-01, 2024-02-04] -> solo B disponible.
        let car_a = Uuid::new_v4();
        let car_b = Uuid::new_v4();
        let bookings = vec![(
            car_a,
            BookingStatus::Pending,
            date("2024-02-02"),
            date("2024-02-03"),
        )];
        let (from, to) = (date("2024-02-01"), date("2024-02-04"));

        let available: Vec<Uuid> = [car_a, car_b]
            .into_iter()
            .filter(|car| {
                !bookings
                    .iter()
                    .any(|(c, status, s, e)| c == car && booking_blocks_range(*status, *s, *e, from, to))
            })
            .collect();

        assert_eq!(available, vec![car_b]);
    }
}
