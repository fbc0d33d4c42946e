use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::car::{Car, CarStatus};

// Request para crear un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 50))]
    pub make: String,
    #[validate(length(min = 1, max = 50))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100))]
    pub year: i32,
    #[validate(length(min = 1, max = 20))]
    pub license_plate: String,
    pub status: Option<CarStatus>,
    pub daily_rate: Decimal,
    #[validate(length(min = 1, max = 30))]
    pub color: String,
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 50))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 50))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[validate(length(min = 1, max = 20))]
    pub license_plate: Option<String>,
    pub status: Option<CarStatus>,
    pub daily_rate: Option<Decimal>,
    #[validate(length(min = 1, max = 30))]
    pub color: Option<String>,
}

// Filtros del listado de flota en el CRM
#[derive(Debug, Deserialize)]
pub struct CarFilters {
    pub q: Option<String>,
    pub status: Option<CarStatus>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct CarResponse {
    pub id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub license_plate: String,
    pub status: CarStatus,
    pub daily_rate: Decimal,
    pub color: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Car> for CarResponse {
    fn from(car: Car) -> Self {
        let name = car.display_name();
        Self {
            id: car.id,
            make: car.make,
            model: car.model,
            year: car.year,
            license_plate: car.license_plate,
            status: car.status,
            daily_rate: car.daily_rate,
            color: car.color,
            name,
            created_at: car.created_at,
            updated_at: car.updated_at,
        }
    }
}
