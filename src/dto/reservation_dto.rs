use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::reservation::{Reservation, ReservationStatus};
use crate::services::booking::Quote;

// Request del CRM para registrar una reserva
#[derive(Debug, Deserialize)]
pub struct CreateReservationRequest {
    pub customer_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: Option<ReservationStatus>,
}

// Request del CRM para editar una reserva; el cambio de estado (incluida la
// cancelación) va por aquí.
#[derive(Debug, Deserialize)]
pub struct UpdateReservationRequest {
    pub customer_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
}

// Filtros del listado de reservas. Las fechas llegan como texto y se
// parsean tolerantemente: un filtro malformado se ignora.
#[derive(Debug, Deserialize)]
pub struct ReservationFilters {
    pub q: Option<String>,
    pub status: Option<ReservationStatus>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// Fila de reserva con los datos del carro y del cliente ya unidos
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReservationDetail {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    pub total_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub customer_first_name: String,
    pub customer_last_name: String,
    pub customer_email: String,
    pub car_make: String,
    pub car_model: String,
    pub car_year: i32,
    pub car_color: String,
    pub car_license_plate: String,
}

impl ReservationDetail {
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.customer_first_name, self.customer_last_name)
    }

    pub fn car_name(&self) -> String {
        format!(
            "{} {} {} - {}",
            self.car_make, self.car_model, self.car_color, self.car_license_plate
        )
    }
}

// Response de reserva creada/actualizada, con su desglose de precio
#[derive(Debug, Serialize)]
pub struct ReservationResponse {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub car_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: ReservationStatus,
    pub total_cost: Decimal,
    pub quote: Option<Quote>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReservationResponse {
    pub fn from_reservation(reservation: Reservation, quote: Option<Quote>) -> Self {
        Self {
            id: reservation.id,
            customer_id: reservation.customer_id,
            car_id: reservation.car_id,
            start_date: reservation.start_date,
            end_date: reservation.end_date,
            status: reservation.status,
            total_cost: reservation.total_cost,
            quote,
            created_at: reservation.created_at,
            updated_at: reservation.updated_at,
        }
    }
}

// Evento para el calendario del CRM (formato FullCalendar)
#[derive(Debug, Serialize)]
pub struct CalendarEvent {
    pub title: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(rename = "backgroundColor")]
    pub background_color: String,
    #[serde(rename = "borderColor")]
    pub border_color: String,
    pub url: String,
}
