//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::config::EnvironmentConfig;
use crate::utils::errors::AppError;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub login_guard: LoginGuard,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let login_guard = LoginGuard::new(
            config.lockout_threshold,
            Duration::from_secs(config.lockout_cooloff),
        );
        Self {
            pool,
            config,
            login_guard,
        }
    }
}

/// Intentos fallidos acumulados para una clave usuario:ip
#[derive(Debug, Clone)]
struct FailureInfo {
    failures: u32,
    window_start: Instant,
}

/// Protección contra fuerza bruta en el login: cuenta fallos por
/// usuario:ip y bloquea la clave cuando supera el umbral dentro de la
/// ventana de cooloff. Un login exitoso limpia la cuenta.
#[derive(Clone)]
pub struct LoginGuard {
    attempts: Arc<RwLock<HashMap<String, FailureInfo>>>,
    threshold: u32,
    cooloff: Duration,
}

impl LoginGuard {
    pub fn new(threshold: u32, cooloff: Duration) -> Self {
        Self {
            attempts: Arc::new(RwLock::new(HashMap::new())),
            threshold,
            cooloff,
        }
    }

    fn key(username: &str, ip: &str) -> String {
        format!("{}:{}", username, ip)
    }

    /// Verificar si la clave está bloqueada antes de intentar el login
    pub async fn check(&self, username: &str, ip: &str) -> Result<(), AppError> {
        let mut attempts = self.attempts.write().await;
        let now = Instant::now();

        // Limpiar entradas cuya ventana ya expiró
        attempts.retain(|_, info| now.duration_since(info.window_start) < self.cooloff);

        match attempts.get(&Self::key(username, ip)) {
            Some(info) if info.failures >= self.threshold => Err(AppError::LockedOut),
            _ => Ok(()),
        }
    }

    /// Registrar un intento fallido
    pub async fn record_failure(&self, username: &str, ip: &str) {
        let mut attempts = self.attempts.write().await;
        let now = Instant::now();

        let info = attempts
            .entry(Self::key(username, ip))
            .or_insert(FailureInfo {
                failures: 0,
                window_start: now,
            });

        if now.duration_since(info.window_start) >= self.cooloff {
            info.failures = 0;
            info.window_start = now;
        }
        info.failures += 1;
    }

    /// Limpiar la cuenta tras un login exitoso
    pub async fn reset(&self, username: &str, ip: &str) {
        self.attempts.write().await.remove(&Self::key(username, ip));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn locks_after_threshold_failures() {
        let guard = LoginGuard::new(3, Duration::from_secs(300));

        for _ in 0..3 {
            assert!(guard.check("ana", "10.0.0.1").await.is_ok());
            guard.record_failure("ana", "10.0.0.1").await;
        }

        assert!(matches!(
            guard.check("ana", "10.0.0.1").await,
            Err(AppError::LockedOut)
        ));
        // Otra IP no comparte el bloqueo
        assert!(guard.check("ana", "10.0.0.2").await.is_ok());
    }

    #[tokio::test]
    async fn successful_login_resets_counter() {
        let guard = LoginGuard::new(2, Duration::from_secs(300));

        guard.record_failure("ana", "10.0.0.1").await;
        guard.reset("ana", "10.0.0.1").await;
        guard.record_failure("ana", "10.0.0.1").await;

        assert!(guard.check("ana", "10.0.0.1").await.is_ok());
    }

    #[tokio::test]
    async fn cooloff_expires_the_lock() {
        let guard = LoginGuard::new(1, Duration::from_millis(20));

        guard.record_failure("ana", "10.0.0.1").await;
        assert!(guard.check("ana", "10.0.0.1").await.is_err());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(guard.check("ana", "10.0.0.1").await.is_ok());
    }
}
