//! Listado estático de sucursales
//!
//! Las sucursales no viven en la base de datos: son una lista fija que
//! valida el campo location de los coches.

use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct Location {
    pub code: &'static str,
    pub city: &'static str,
}

pub const LOCATIONS: &[Location] = &[
    Location { code: "BLR", city: "Bengaluru" },
    Location { code: "MAA", city: "Chennai" },
    Location { code: "DEL", city: "Delhi" },
    Location { code: "HYD", city: "Hyderabad" },
    Location { code: "BOM", city: "Mumbai" },
    Location { code: "PNQ", city: "Pune" },
];

/// Verificar que un código de sucursal pertenece al listado
pub fn is_valid_location(code: &str) -> bool {
    LOCATIONS.iter().any(|l| l.code == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_are_valid() {
        assert!(is_valid_location("BLR"));
        assert!(is_valid_location("PNQ"));
    }

    #[test]
    fn unknown_codes_are_rejected() {
        assert!(!is_valid_location("XXX"));
        assert!(!is_valid_location("blr"));
    }
}
