use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::reservation_dto::ReservationDetail;
use crate::models::car::{Car, CarStatus};
use crate::services::booking::Quote;

// Filtros de la búsqueda pública. Todo llega como texto desde el query
// string; valores malformados se ignoran en lugar de fallar.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub pickup: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    // Enlace directo "Reservar" desde el home
    pub car_id: Option<Uuid>,
    // Marcas separadas por coma: ?makes=Toyota,Kia
    pub makes: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
}

// Carro en los resultados de búsqueda, con cotización si hay fechas
#[derive(Debug, Serialize)]
pub struct SearchCar {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub color: String,
    pub license_plate: String,
    pub daily_rate: Decimal,
    pub status: CarStatus,
    pub name: String,
    pub quote: Option<Quote>,
}

impl SearchCar {
    pub fn from_car(car: Car, quote: Option<Quote>) -> Self {
        Self {
            id: car.id,
            name: format!("{} {} {}", car.make, car.model, car.year),
            make: car.make,
            model: car.model,
            year: car.year,
            color: car.color,
            license_plate: car.license_plate,
            daily_rate: car.daily_rate,
            status: car.status,
            quote,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub cars: Vec<SearchCar>,
    pub makes: Vec<String>,
    pub pickup: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub nights: Option<i64>,
}

// Query del formulario de checkout: carro elegido y fechas tentativas
#[derive(Debug, Deserialize)]
pub struct CheckoutParams {
    pub car_id: Uuid,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

// Contexto del formulario: el carro y la cotización si ya hay fechas
#[derive(Debug, Serialize)]
pub struct CheckoutContext {
    pub car: SearchCar,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// Checkout público
#[derive(Debug, Deserialize, Validate)]
pub struct PublicReservationRequest {
    pub car_id: Uuid,
    #[validate(length(min = 1, max = 50))]
    pub first_name: String,
    #[validate(length(min = 1, max = 50))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 20))]
    pub phone: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub accept_terms: bool,
}

#[derive(Debug, Serialize)]
pub struct PublicReservationResponse {
    pub reservation_id: Uuid,
    pub car: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub quote: Quote,
}

// Query del confirmation page
#[derive(Debug, Deserialize)]
pub struct SuccessParams {
    pub rid: Uuid,
}

// Confirmación de una reserva ya persistida. El total sale de la fila de
// la reserva, no se recalcula: una edición posterior de la tarifa del
// carro no cambia lo que el cliente ya reservó.
#[derive(Debug, Serialize)]
pub struct ReservationConfirmation {
    pub reservation_id: Uuid,
    pub car: String,
    pub customer: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub nights: i64,
    pub total_cost: Decimal,
}

impl ReservationConfirmation {
    pub fn from_detail(detail: &ReservationDetail) -> Self {
        Self {
            reservation_id: detail.id,
            car: detail.car_name(),
            customer: detail.customer_name(),
            email: detail.customer_email.clone(),
            start_date: detail.start_date,
            end_date: detail.end_date,
            nights: (detail.end_date - detail.start_date).num_days(),
            total_cost: detail.total_cost,
        }
    }
}

// Contrato de alquiler público (/contrato)
#[derive(Debug, Serialize)]
pub struct ContractSection {
    pub heading: &'static str,
    pub body: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ContractResponse {
    pub title: &'static str,
    pub company: &'static str,
    pub sections: Vec<ContractSection>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reservation::ReservationStatus;
    use std::str::FromStr;

    #[test]
    fn confirmation_reports_the_persisted_total() {
        let detail = ReservationDetail {
            id: Uuid::nil(),
            customer_id: Uuid::nil(),
            car_id: Uuid::nil(),
            start_date: NaiveDate::from_ymd_opt(2026, 9, 10).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2026, 9, 13).unwrap(),
            status: ReservationStatus::Booked,
            // Total guardado al reservar, distinto de lo que daría la
            // tarifa actual del carro
            total_cost: Decimal::from_str("160.50").unwrap(),
            created_at: chrono::Utc::now(),
            updated_at: chrono::Utc::now(),
            customer_first_name: "Ana".to_string(),
            customer_last_name: "Pérez".to_string(),
            customer_email: "ana@example.com".to_string(),
            car_make: "Toyota".to_string(),
            car_model: "Yaris".to_string(),
            car_year: 2022,
            car_color: "Rojo".to_string(),
            car_license_plate: "ABC-123".to_string(),
        };

        let confirmation = ReservationConfirmation::from_detail(&detail);

        assert_eq!(confirmation.total_cost, Decimal::from_str("160.50").unwrap());
        assert_eq!(confirmation.nights, 3);
        assert_eq!(confirmation.customer, "Ana Pérez");
        assert_eq!(confirmation.email, "ana@example.com");
        assert_eq!(confirmation.car, "Toyota Yaris Rojo - ABC-123");
    }
}
