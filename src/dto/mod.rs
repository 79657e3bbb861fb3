pub mod auth_dto;
pub mod booking_dto;
pub mod car_dto;
pub mod feedback_dto;
