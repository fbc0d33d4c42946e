//! Servicios de negocio
//!
//! La lógica que no es CRUD plano vive aquí: disponibilidad y precios de
//! reservas, agregados del dashboard y exportes.

pub mod booking;
pub mod dashboard;
pub mod export;
