//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos. Toda validación falla ANTES de tocar la base
//! de datos: un id o fecha malformados nunca llegan al repositorio.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use uuid::Uuid;

use crate::utils::errors::{validation_error, AppError};

/// Validar y convertir string a UUID
pub fn parse_uuid(field: &'static str, value: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(value).map_err(|_| validation_error(field, "must be a valid UUID"))
}

/// Validar y convertir string a instante UTC.
///
/// Acepta fechas `YYYY-MM-DD` (interpretadas como medianoche UTC)
/// o timestamps RFC3339 completos.
pub fn parse_instant(field: &'static str, value: &str) -> Result<DateTime<Utc>, AppError> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| validation_error(field, "expected YYYY-MM-DD or RFC3339 timestamp"))
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(validation_error(field, "must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parse_uuid_accepts_canonical_form() {
        let id = parse_uuid("car_id", "550e8400-e29b-41d4-a716-446655440000").unwrap();
        assert_eq!(id.to_string(), "550e8400-e29b-41d4-a716-446655440000");
    }

    #[test]
    fn parse_uuid_rejects_garbage() {
        assert!(parse_uuid("car_id", "not-a-uuid").is_err());
    }

    #[test]
    fn parse_instant_accepts_plain_date() {
        let instant = parse_instant("start_date", "2024-01-01").unwrap();
        assert_eq!(instant.hour(), 0);
        assert_eq!(instant.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn parse_instant_accepts_rfc3339() {
        let instant = parse_instant("start_date", "2024-01-01T15:30:00Z").unwrap();
        assert_eq!(instant.hour(), 15);
    }

    #[test]
    fn parse_instant_rejects_malformed_date() {
        assert!(parse_instant("start_date", "01/01/2024").is_err());
        assert!(parse_instant("start_date", "2024-13-99").is_err());
    }

    #[test]
    fn validate_not_empty_rejects_blank() {
        assert!(validate_not_empty("model", "   ").is_err());
        assert!(validate_not_empty("model", "Swift").is_ok());
    }
}
