pub mod auth_routes;
pub mod booking_routes;
pub mod car_routes;
pub mod feedback_routes;
