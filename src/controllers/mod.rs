pub mod auth_controller;
pub mod booking_controller;
pub mod car_controller;
pub mod feedback_controller;
