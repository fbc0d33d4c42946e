//! Modelo de Reservation
//!
//! Una reserva asocia un vehículo y un cliente en un rango de fechas
//! [start_date, end_date). Las reservas nunca se borran: cancelar es un
//! cambio de estado, y solo las reservas no canceladas cuentan para la
//! disponibilidad.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado del ciclo de vida de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Booked,
    InProgress,
    Completed,
    Cancelled,
}

impl ReservationStatus {
    pub fn display_es(&self) -> &'static str {
        match self {
            ReservationStatus::Booked => "Reservado",
            ReservationStatus::InProgress => "En curso",
            ReservationStatus::Completed => "Completado",
            ReservationStatus::Cancelled => "Cancelado",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Reservation {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    pub total_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
