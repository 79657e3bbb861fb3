//! Servicios del sistema
//!
//! El núcleo del backend: el Availability Checker (lectura pura) y el
//! Booking Lifecycle Manager (estados y precio de las reservas).

pub mod availability_service;
pub mod booking_service;
