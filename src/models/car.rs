//! Modelo de Car
//!
//! Un vehículo de la flota. El campo `status` es una bandera operativa
//! (p. ej. mantenimiento); la disponibilidad para reservar se decide
//! únicamente contra las reservas existentes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado operativo del vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "car_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CarStatus {
    Available,
    Reserved,
    Rented,
    Maintenance,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub status: CarStatus,
    pub daily_rate: Decimal,
    pub color: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    /// "Marca Modelo Color - Placa", como aparece en listados y exportes.
    pub fn display_name(&self) -> String {
        format!("{} {} {} - {}", self.make, self.model, self.color, self.license_plate)
    }
}
