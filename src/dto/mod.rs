//! DTOs de la API
//!
//! Requests y responses serializables, separados de los modelos de base
//! de datos.

pub mod auth_dto;
pub mod car_dto;
pub mod common;
pub mod customer_dto;
pub mod public_dto;
pub mod reservation_dto;
