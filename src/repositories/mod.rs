pub mod booking_repository;
pub mod car_repository;
pub mod feedback_repository;
pub mod user_repository;
