//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use crate::config::environment::EnvironmentConfig;

/// Mapa de locks por coche.
///
/// El chequeo de solape y el insert/update posterior NO son una transacción
/// atómica en el store; sin serialización, dos Create concurrentes sobre el
/// mismo coche pueden pasar ambos el chequeo y producir doble reserva.
/// Serializar la sección crítica por `car_id` cierra esa ventana.
#[derive(Clone, Default)]
pub struct CarLocks {
    inner: Arc<RwLock<HashMap<Uuid, Arc<Mutex<()>>>>>,
}

impl CarLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obtener el lock asociado a un coche, creándolo si no existe.
    /// Devuelve siempre el mismo Arc para el mismo id.
    pub async fn lock_for(&self, car_id: Uuid) -> Arc<Mutex<()>> {
        {
            let locks = self.inner.read().await;
            if let Some(lock) = locks.get(&car_id) {
                return lock.clone();
            }
        }

        let mut locks = self.inner.write().await;
        locks
            .entry(car_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub car_locks: CarLocks,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        Self {
            pool,
            config,
            car_locks: CarLocks::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lock_for_returns_same_lock_per_car() {
        let locks = CarLocks::new();
        let car_id = Uuid::new_v4();

        let a = locks.lock_for(car_id).await;
        let b = locks.lock_for(car_id).await;
        assert!(Arc::ptr_eq(&a, &b));

        let other = locks.lock_for(Uuid::new_v4()).await;
        assert!(!Arc::ptr_eq(&a, &other));
    }

    #[tokio::test]
    async fn lock_serializes_critical_section() {
        let locks = CarLocks::new();
        let car_id = Uuid::new_v4();

        let lock = locks.lock_for(car_id).await;
        let guard = lock.lock().await;

        let second = locks.lock_for(car_id).await;
        assert!(second.try_lock().is_err());

        drop(guard);
        assert!(second.try_lock().is_ok());
    }
}
