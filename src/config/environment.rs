//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub secret_key: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    // Límites para endpoints públicos (requests por ventana, por IP)
    pub search_rate_limit: u32,
    pub checkout_rate_limit: u32,
    pub rate_limit_window: u64,
    // Protección contra fuerza bruta en el login
    pub lockout_threshold: u32,
    pub lockout_cooloff: u64,
}

impl EnvironmentConfig {
    /// Leer la configuración desde variables de entorno. `SECRET_KEY` es
    /// obligatoria; el resto tiene defaults de desarrollo.
    pub fn from_env() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            secret_key: env::var("SECRET_KEY").expect("SECRET_KEY must be set"),
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "28800".to_string())
                .parse()
                .expect("JWT_EXPIRATION must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_default()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            search_rate_limit: env::var("SEARCH_RATE_LIMIT")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("SEARCH_RATE_LIMIT must be a valid number"),
            checkout_rate_limit: env::var("CHECKOUT_RATE_LIMIT")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .expect("CHECKOUT_RATE_LIMIT must be a valid number"),
            rate_limit_window: env::var("RATE_LIMIT_WINDOW")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .expect("RATE_LIMIT_WINDOW must be a valid number"),
            lockout_threshold: env::var("LOCKOUT_THRESHOLD")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .expect("LOCKOUT_THRESHOLD must be a valid number"),
            lockout_cooloff: env::var("LOCKOUT_COOLOFF")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .expect("LOCKOUT_COOLOFF must be a valid number"),
        }
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la dirección del servidor
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Configuración fija para tests, sin tocar el entorno del proceso.
    pub fn for_tests() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            secret_key: "test-secret-key".to_string(),
            jwt_expiration: 3600,
            cors_origins: vec![],
            search_rate_limit: 60,
            checkout_rate_limit: 10,
            rate_limit_window: 60,
            lockout_threshold: 3,
            lockout_cooloff: 300,
        }
    }
}
