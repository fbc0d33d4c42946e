//! Controladores
//!
//! La lógica de cada operación de la API. Los handlers de `routes/` los
//! instancian con el pool y delegan aquí.

pub mod auth_controller;
pub mod car_controller;
pub mod customer_controller;
pub mod public_controller;
pub mod reservation_controller;
