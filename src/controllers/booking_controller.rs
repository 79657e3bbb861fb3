use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::auth_dto::ApiResponse;
use crate::dto::booking_dto::{
    AvailabilityQuery, AvailabilityResponse, BookedRangeResponse, BookedRangesQuery,
    BookingResponse, CreateBookingRequest, ModifyBookingRequest,
};
use crate::services::availability_service::AvailabilityService;
use crate::services::booking_service::BookingService;
use crate::state::CarLocks;
use crate::utils::errors::AppError;
use crate::utils::validation::{parse_instant, parse_uuid};

pub struct BookingController {
    service: BookingService,
    availability: AvailabilityService,
}

impl BookingController {
    pub fn new(pool: PgPool, locks: CarLocks) -> Self {
        Self {
            service: BookingService::new(pool.clone(), locks),
            availability: AvailabilityService::new(pool),
        }
    }

    pub async fn create(
        &self,
        requester_email: &str,
        request: CreateBookingRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        // Validación de entrada antes de cualquier acceso al store
        let car_id = parse_uuid("car_id", &request.car_id)?;
        let start = parse_instant("start_date", &request.start_date)?;
        let end = parse_instant("end_date", &request.end_date)?;

        let booking = self.service.create(car_id, requester_email, start, end).await?;

        Ok(ApiResponse::success_with_message(
            booking.into(),
            "Reserva creada exitosamente".to_string(),
        ))
    }

    pub async fn get_by_id(
        &self,
        booking_id: Uuid,
        requester_email: &str,
    ) -> Result<BookingResponse, AppError> {
        let booking = self.service.get_owned(booking_id, requester_email).await?;
        Ok(booking.into())
    }

    pub async fn list_mine(&self, requester_email: &str) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = self.service.list_for_owner(requester_email).await?;
        Ok(bookings.into_iter().map(BookingResponse::from).collect())
    }

    pub async fn confirm(
        &self,
        booking_id: Uuid,
        requester_email: &str,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        let booking = self.service.confirm(booking_id, requester_email).await?;

        Ok(ApiResponse::success_with_message(
            booking.into(),
            "Reserva confirmada".to_string(),
        ))
    }

    pub async fn modify(
        &self,
        booking_id: Uuid,
        requester_email: &str,
        request: ModifyBookingRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        let start = parse_instant("start_date", &request.start_date)?;
        let end = parse_instant("end_date", &request.end_date)?;

        let booking = self
            .service
            .modify(booking_id, requester_email, start, end)
            .await?;

        Ok(ApiResponse::success_with_message(
            booking.into(),
            "Reserva modificada exitosamente".to_string(),
        ))
    }

    pub async fn cancel(
        &self,
        booking_id: Uuid,
        requester_email: &str,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        let booking = self.service.cancel(booking_id, requester_email).await?;

        Ok(ApiResponse::success_with_message(
            booking.into(),
            "Reserva cancelada".to_string(),
        ))
    }

    pub async fn check_availability(
        &self,
        car_id: Uuid,
        query: AvailabilityQuery,
    ) -> Result<AvailabilityResponse, AppError> {
        let start = parse_instant("start", &query.start)?;
        let end = parse_instant("end", &query.end)?;

        let available = self.availability.is_available(car_id, start, end).await?;

        Ok(AvailabilityResponse {
            car_id: car_id.to_string(),
            available,
        })
    }

    pub async fn booked_ranges(
        &self,
        car_id: Uuid,
        query: BookedRangesQuery,
    ) -> Result<Vec<BookedRangeResponse>, AppError> {
        let window = match (query.from, query.to) {
            (Some(from), Some(to)) => Some((
                parse_instant("from", &from)?,
                parse_instant("to", &to)?,
            )),
            (None, None) => None,
            _ => {
                return Err(crate::utils::errors::validation_error(
                    "window",
                    "from and to must be provided together",
                ))
            }
        };

        let ranges = self.availability.list_booked_ranges(car_id, window).await?;
        Ok(ranges.into_iter().map(BookedRangeResponse::from).collect())
    }

    pub async fn list_for_car(&self, car_id: Uuid) -> Result<Vec<BookingResponse>, AppError> {
        let bookings = self.service.list_active_for_car(car_id).await?;
        Ok(bookings.into_iter().map(BookingResponse::from).collect())
    }
}
